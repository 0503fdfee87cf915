// src/synthesis.rs - turns the per-award candidate tables into final answers
use anyhow::{Context, Result};
use log::debug;
use regex::RegexBuilder;

use crate::models::core::{Award, Ceremony, Role};
use crate::models::results::AwardResult;
use crate::text::similarity::{compact_top, consolidate_freqs, RankedPair, DEFAULT_CONSOLIDATION_ANCHORS};
use crate::text::{NoiseFilter, DEFAULT_SIMILARITY_THRESHOLD};
use crate::utils::logging::{PipelineLogger, Stage};

/// Similarity threshold for roles that are always people.
pub const PERSON_THRESHOLD: f64 = 0.5;
pub const NOMINEES_REPORTED: usize = 4;
pub const PRESENTERS_REPORTED: usize = 2;

/// Noise filters and award classification shared by every award of a ceremony.
pub struct Synthesizer {
    global_noise: NoiseFilter,
    person_noise: NoiseFilter,
    person_award: regex::Regex,
}

impl Synthesizer {
    pub fn new(ceremony: &Ceremony) -> Result<Self> {
        let config = &ceremony.config;

        let mut global_words = config.global_noise.clone();
        if config.noise_from_titles {
            global_words.extend(ceremony.derived_award_noise_words());
        }

        Ok(Self {
            global_noise: NoiseFilter::new(&global_words).context("invalid global noise word list")?,
            person_noise: NoiseFilter::new(&config.person_noise)
                .context("invalid person noise word list")?,
            person_award: RegexBuilder::new(&config.keywords.person)
                .case_insensitive(true)
                .build()
                .context("invalid person keyword pattern")?,
        })
    }

    fn rank(&self, award: &Award, role: Role, person_only: bool, threshold: f64) -> Vec<RankedPair> {
        let mut ranked = self.global_noise.retain_signal(award.table(role).ranked());
        if person_only {
            ranked = self.person_noise.retain_signal(ranked);
        }
        let consolidated = consolidate_freqs(&ranked, DEFAULT_CONSOLIDATION_ANCHORS);
        compact_top(&consolidated, threshold)
    }

    /// Top winner, nominees and presenters for one award. Roles with no
    /// surviving candidate come back empty.
    pub fn award_result(&self, award: &Award) -> AwardResult {
        let person = self.person_award.is_match(&award.title);

        let winners = self.rank(award, Role::Winner, person, PERSON_THRESHOLD);
        let nominee_threshold = if person {
            PERSON_THRESHOLD
        } else {
            DEFAULT_SIMILARITY_THRESHOLD
        };
        let nominees = self.rank(award, Role::Nominee, person, nominee_threshold);
        let presenters = self.rank(award, Role::Presenter, true, PERSON_THRESHOLD);

        debug!(
            "{}: {} winner, {} nominee, {} presenter clusters",
            award.title,
            winners.len(),
            nominees.len(),
            presenters.len()
        );

        AwardResult {
            award: award.title.clone(),
            winner: winners.into_iter().next().map(|(name, _)| name),
            nominees: nominees
                .into_iter()
                .take(NOMINEES_REPORTED)
                .map(|(name, _)| name)
                .collect(),
            presenters: presenters
                .into_iter()
                .take(PRESENTERS_REPORTED)
                .map(|(name, _)| name)
                .collect(),
        }
    }
}

/// One result per award, in award order.
pub fn build_results(ceremony: &Ceremony) -> Result<Vec<AwardResult>> {
    let logger = PipelineLogger::new(Stage::Synthesize);
    logger.log_start(&format!("{} awards", ceremony.awards.len()));

    let synthesizer = Synthesizer::new(ceremony)?;
    let results: Vec<AwardResult> = ceremony
        .awards
        .iter()
        .map(|award| synthesizer.award_result(award))
        .collect();

    for result in results.iter().filter(|r| !r.has_winner()) {
        logger.log_no_signal(&result.award, Role::Winner.as_str());
    }

    let decided = results.iter().filter(|r| r.has_winner()).count();
    logger.log_completion(&format!("{} of {} awards have a winner", decided, results.len()));
    Ok(results)
}
