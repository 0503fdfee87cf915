// src/utils/logging.rs - phase narration helpers for the pipeline stages
use log::{info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scrape,
    Corpus,
    Features,
    Classify,
    Synthesize,
}

#[derive(Clone)]
pub struct PipelineLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl PipelineLogger {
    pub fn new(stage: Stage) -> Self {
        let (stage_name, stage_emoji) = match stage {
            Stage::Scrape => ("SCRAPE", "🌐"),
            Stage::Corpus => ("CORPUS", "📨"),
            Stage::Features => ("FEATURES", "🔑"),
            Stage::Classify => ("CLASSIFY", "🧭"),
            Stage::Synthesize => ("RESULTS", "🏆"),
        };

        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, detail: &str) {
        info!(
            "[{}] {} 🚀 Starting {}: {}",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            detail
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str) {
        info!(
            "[{}] {} 📊 Loaded {} {}",
            self.stage_name, self.stage_emoji, count, data_type
        );
    }

    pub fn log_award_routing(&self, award: &str, matched: usize, discarded: usize, gate: &[String]) {
        info!(
            "[{}] {} 🎯 {}: {} matching messages ({} without role keywords) via {:?}",
            self.stage_name, self.stage_emoji, award, matched, discarded, gate
        );
    }

    pub fn log_no_signal(&self, award: &str, role: &str) {
        warn!(
            "[{}] {} ⚠️  {}: no {} candidate survived filtering",
            self.stage_name, self.stage_emoji, award, role
        );
    }

    pub fn log_extraction_failures(&self, failures: usize) {
        if failures > 0 {
            warn!(
                "[{}] {} ⚠️  {} messages could not be tagged and counted as no signal",
                self.stage_name, self.stage_emoji, failures
            );
        }
    }

    pub fn log_completion(&self, summary: &str) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED in {:.2?}: {}",
            self.stage_name, self.stage_emoji, duration, summary
        );
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
