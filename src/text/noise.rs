// src/text/noise.rs
use regex::{Regex, RegexBuilder};

use super::similarity::RankedPair;

/// Rejects candidates that contain any listed word as a whole word,
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    pattern: Option<Regex>,
}

impl NoiseFilter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, regex::Error> {
        let alternation: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();

        if alternation.is_empty() {
            return Ok(Self { pattern: None });
        }

        // \b would never match around punctuation entries such as "–"
        let pattern = RegexBuilder::new(&format!(
            r"(?:^|[^\w])(?:{})(?:[^\w]|$)",
            alternation.join("|")
        ))
        .case_insensitive(true)
        .build()?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_noise(&self, candidate: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|re| re.is_match(candidate))
            .unwrap_or(false)
    }

    /// Drops noisy candidates, keeping the order of the rest.
    pub fn retain_signal(&self, ranked: Vec<RankedPair>) -> Vec<RankedPair> {
        ranked
            .into_iter()
            .filter(|(phrase, _)| !self.is_noise(phrase))
            .collect()
    }
}
