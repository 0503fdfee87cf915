// src/models/results.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Best guesses for one award. Empty roles mean the corpus carried no usable signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardResult {
    pub award: String,
    pub winner: Option<String>,
    pub nominees: Vec<String>,
    pub presenters: Vec<String>,
}

impl AwardResult {
    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

impl fmt::Display for AwardResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "For award: {}", self.award)?;
        match &self.winner {
            Some(winner) => writeln!(f, "Winner is: {}", winner)?,
            None => writeln!(f, "Winner is: no winner determined")?,
        }
        writeln!(f, "Nominees are: {}", self.nominees.join(", "))?;
        write!(f, "Presenters are: {}", self.presenters.join(", "))
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub year: i32,
    pub description: Option<String>,
    pub total_awards: usize,
    pub total_hosts: usize,
    pub messages_loaded: usize,
    pub unique_messages: usize,
    pub matched_messages: usize,
    pub discarded_messages: usize,
    pub extraction_failures: usize,
    /// Distinct entries across every award's role tables.
    pub distinct_candidates: usize,
    /// Sum of all role table counts.
    pub candidate_mentions: usize,
    pub awards_without_winner: usize,
    pub scrape_time: f64,
    pub corpus_load_time: f64,
    pub feature_extraction_time: f64,
    pub classification_time: f64,
    pub synthesis_time: f64,
    pub total_processing_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reports_missing_winner() {
        let result = AwardResult {
            award: "Best Director".to_string(),
            winner: None,
            nominees: vec![],
            presenters: vec![],
        };
        let text = result.to_string();
        assert!(text.contains("no winner determined"));
        assert!(!result.has_winner());
    }

    #[test]
    fn test_display_lists_roles() {
        let result = AwardResult {
            award: "Best Motion Picture - Drama".to_string(),
            winner: Some("Three Billboards".to_string()),
            nominees: vec!["Dunkirk".to_string(), "The Post".to_string()],
            presenters: vec!["Emma Stone".to_string()],
        };
        let text = result.to_string();
        assert!(text.contains("Winner is: Three Billboards"));
        assert!(text.contains("Nominees are: Dunkirk, The Post"));
        assert!(text.contains("Presenters are: Emma Stone"));
    }
}
