// src/lib.rs
pub mod config;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod synthesis;
pub mod text;
pub mod utils;

pub use config::CeremonyConfig;
pub use models::core::{Award, Ceremony, Role};
pub use models::results::{AwardResult, RunStats};
pub use synthesis::build_results;
