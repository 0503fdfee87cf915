use crate::{config::CeremonyConfig, models::results::RunStats};
use chrono::Utc;
use log::info;
use uuid::Uuid;

pub fn create_initial_run(config: &CeremonyConfig, description: Option<&str>) -> RunStats {
    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now().naive_utc();

    info!("Created run {} for ceremony year {}", run_id, config.year);

    RunStats {
        run_id,
        run_timestamp,
        year: config.year,
        description: description.map(|s| s.to_string()),
        total_awards: 0,
        total_hosts: 0,
        messages_loaded: 0,
        unique_messages: 0,
        matched_messages: 0,
        discarded_messages: 0,
        extraction_failures: 0,
        distinct_candidates: 0,
        candidate_mentions: 0,
        awards_without_winner: 0,
        scrape_time: 0.0,
        corpus_load_time: 0.0,
        feature_extraction_time: 0.0,
        classification_time: 0.0,
        synthesis_time: 0.0,
        total_processing_time: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_run_is_zeroed() {
        let config = CeremonyConfig::default();
        let stats = create_initial_run(&config, Some("unit test"));
        assert_eq!(stats.year, 2018);
        assert_eq!(stats.description.as_deref(), Some("unit test"));
        assert_eq!(stats.matched_messages, 0);
        assert!(Uuid::parse_str(&stats.run_id).is_ok());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let config = CeremonyConfig::default();
        let a = create_initial_run(&config, None);
        let b = create_initial_run(&config, None);
        assert_ne!(a.run_id, b.run_id);
    }
}
