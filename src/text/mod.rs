pub mod noise;
pub mod phrases;
pub mod similarity;

pub use noise::NoiseFilter;
pub use phrases::{count_phrases, count_phrases_ordered};
pub use similarity::{compact_top, consolidate_freqs, similar, DEFAULT_SIMILARITY_THRESHOLD};
