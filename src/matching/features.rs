// src/matching/features.rs - per-award discriminating keywords
use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::RoleKeywords;
use crate::models::core::Ceremony;
use crate::text::phrases::count_phrases_ordered;

pub const TELEVISION_FEATURE: &str = "(television|tv)";
pub const COMEDY_MUSICAL_FEATURE: &str = "(comedy|musical)";

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

fn feature_for(word: &str) -> String {
    if word == "television" {
        TELEVISION_FEATURE.to_string()
    } else {
        word.to_string()
    }
}

/// Assigns each title its rarest words across all titles, at most
/// `feature_max` per title.
///
/// Words are visited from least to most frequent (ties in the order they first
/// appear) and handed to every title that contains the capitalized word as a
/// whole space-separated token. Stops once every title is full.
pub fn extract_features<S: AsRef<str>>(titles: &[S], feature_max: usize) -> Vec<Vec<String>> {
    let mut features: Vec<Vec<String>> = vec![Vec::new(); titles.len()];
    if titles.is_empty() || feature_max == 0 {
        return features;
    }

    let mut by_rarity = count_phrases_ordered(titles, 1, None);
    by_rarity.sort_by_key(|(_, freq)| *freq);

    let title_words: Vec<Vec<&str>> = titles
        .iter()
        .map(|t| t.as_ref().split(' ').collect())
        .collect();

    for (word, freq) in by_rarity {
        if features.iter().all(|f| f.len() >= feature_max) {
            break;
        }
        let capitalized = capitalize(&word);
        for (i, words) in title_words.iter().enumerate() {
            if features[i].len() < feature_max && words.contains(&capitalized.as_str()) {
                debug!("Feature '{}' (freq {}) -> {}", word, freq, titles[i].as_ref());
                features[i].push(feature_for(&word));
            }
        }
    }

    features
}

/// Computes and stores the feature list of every award in the ceremony.
/// Returns how many awards received at least one feature.
pub fn build_award_features(ceremony: &Ceremony) -> usize {
    let titles = ceremony.award_titles();
    let features = extract_features(&titles, ceremony.config.feature_max);

    let mut with_features = 0;
    for (award, award_features) in ceremony.awards.iter().zip(features) {
        if !award_features.is_empty() {
            with_features += 1;
        } else {
            warn!("Award '{}' has no distinguishing words", award.title);
        }
        if award.set_features(award_features).is_err() {
            warn!("Features for '{}' were already set; keeping the first list", award.title);
        }
    }
    with_features
}

/// The feature list an award is matched with.
///
/// Broadcast awards get the TV alias first; `comedy` and `musical` collapse
/// into a single disjunctive feature; `golden` and `globe` are dropped because
/// every message about the ceremony carries them.
pub fn effective_features(title: &str, features: &[String], keywords: &RoleKeywords) -> Vec<String> {
    let mut effective = Vec::with_capacity(features.len() + 1);

    let is_tv = RegexBuilder::new(&keywords.tv)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(title))
        .unwrap_or(false);
    if is_tv {
        effective.push(keywords.tv_alias_feature.clone());
    }

    let mut genre_merged = false;
    for feature in features {
        match feature.as_str() {
            "golden" | "globe" => continue,
            "comedy" | "musical" | COMEDY_MUSICAL_FEATURE => {
                if !genre_merged {
                    effective.push(COMEDY_MUSICAL_FEATURE.to_string());
                    genre_merged = true;
                }
            }
            _ => effective.push(feature.clone()),
        }
    }

    effective
}

/// All-or-nothing test: a message belongs to an award only if it contains every
/// required feature, case-insensitively.
#[derive(Debug, Clone)]
pub struct FeatureGate {
    features: Vec<String>,
    patterns: Vec<Regex>,
}

impl FeatureGate {
    pub fn new(effective: &[String], required: usize) -> Result<Self, regex::Error> {
        let features: Vec<String> = effective.iter().take(required).cloned().collect();
        let patterns = features
            .iter()
            .map(|f| RegexBuilder::new(f).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features, patterns })
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// An empty gate matches nothing.
    pub fn matches(&self, message: &str) -> bool {
        !self.patterns.is_empty() && self.patterns.iter().all(|re| re.is_match(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CeremonyConfig;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rarest_words_first() {
        let titles = [
            "Best Actor – Motion Picture",
            "Best Director",
            "Best Television Series – Drama",
        ];
        let features = extract_features(&titles, 5);
        assert_eq!(features[0], strings(&["actor", "motion", "picture", "best"]));
        assert_eq!(features[1], strings(&["director", "best"]));
        assert_eq!(
            features[2],
            strings(&["(television|tv)", "series", "drama", "best"])
        );
    }

    #[test]
    fn test_feature_cap_is_respected() {
        let titles = [
            "Best Original Song Written For Any Motion Picture Today",
            "Best Original Score",
        ];
        let features = extract_features(&titles, 5);
        assert!(features.iter().all(|f| f.len() <= 5));
        assert_eq!(features[0].len(), 5);
        assert_eq!(features[0][0], "song");
    }

    #[test]
    fn test_lowercase_title_words_never_become_features() {
        let titles = ["Best Actress in a Motion Picture", "Best Actor"];
        let features = extract_features(&titles, 5);
        assert!(!features[0].contains(&"in".to_string()));
        assert!(!features[0].contains(&"a".to_string()));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let titles = ["Best Motion Picture – Drama", "Best Motion Picture – Musical or Comedy"];
        assert_eq!(extract_features(&titles, 5), extract_features(&titles, 5));
    }

    #[test]
    fn test_effective_features_normalizes_genres_and_noise() {
        let keywords = RoleKeywords::default();
        let features = strings(&["comedy", "musical", "golden", "actress", "globe"]);
        let effective = effective_features("Best Actress – Musical or Comedy", &features, &keywords);
        assert_eq!(effective, strings(&["(comedy|musical)", "actress"]));
    }

    #[test]
    fn test_effective_features_inserts_tv_alias_first() {
        let keywords = RoleKeywords::default();
        let features = strings(&["(television|tv)", "series", "drama"]);
        let effective = effective_features("Best Television Series – Drama", &features, &keywords);
        assert_eq!(effective[0], "(tele|tv)");
        assert_eq!(effective.len(), 4);
    }

    #[test]
    fn test_gate_requires_every_feature() {
        let gate = FeatureGate::new(&strings(&["actor", "motion", "picture", "best"]), 3).unwrap();
        assert_eq!(gate.features().len(), 3);
        assert!(gate.matches("Gary Oldman wins Best ACTOR in a Motion Picture"));
        assert!(!gate.matches("Gary Oldman wins Best Actor!! #goldenglobes"));
    }

    #[test]
    fn test_empty_gate_matches_nothing() {
        let gate = FeatureGate::new(&[], 3).unwrap();
        assert!(!gate.matches("anything at all"));
    }

    #[test]
    fn test_build_award_features_sets_each_award_once() {
        let mut ceremony = Ceremony::new(CeremonyConfig::default());
        ceremony.populate(vec!["Best Director", "Best Screenplay"], vec![]);
        assert_eq!(build_award_features(&ceremony), 2);
        assert_eq!(ceremony.awards[0].features(), &strings(&["director", "best"])[..]);
        // a second pass leaves the first lists in place
        build_award_features(&ceremony);
        assert_eq!(ceremony.awards[1].features(), &strings(&["screenplay", "best"])[..]);
    }
}
