//! Run configuration for one ceremony analysis.
//! Everything the pipeline used to read from process-wide constants lives here
//! so several ceremonies (or tests) can run side by side in one process.

use log::{debug, info};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_YEAR: i32 = 2018;
pub const DEFAULT_FIRST_YEAR: i32 = 1944;
pub const DEFAULT_CORPUS_PATH: &str = "gg2018.json";
pub const DEFAULT_REFERENCE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";
pub const DEFAULT_FEATURE_MAX: usize = 5;
pub const DEFAULT_REQUIRED_FEATURES: usize = 3;
pub const DEFAULT_PROVENANCE_MARKER: &str = "awards_watch";

const GLOBAL_NOISE_WORDS: [&str; 18] = [
    "Best", "Golden", "Globe", "Actor", "Actress", "Picture", "Motion", "Award", "Year", "Film",
    "Animated", "Feature", "or", "Series", "comedy", "musical", "drama", "tv",
];

const PERSON_NOISE_WORDS: [&str; 9] = [
    "the", "or", "of", "Limited", "Role", "Supporting", "Series", "big", "little",
];

/// Case-insensitive regex alternations used to classify award titles and messages.
#[derive(Debug, Clone)]
pub struct RoleKeywords {
    /// Award titles naming an individual rather than a work
    pub person: String,
    pub nominee: String,
    pub presenter: String,
    pub winner: String,
    /// Award titles about broadcast categories
    pub tv: String,
    /// Feature inserted first for broadcast awards
    pub tv_alias_feature: String,
}

impl Default for RoleKeywords {
    fn default() -> Self {
        Self {
            person: r"(Actor|Actress|direct|cecil|score|screenplay)".to_string(),
            nominee: r"(nom|didnt|not|did not|didn't|should|wow|believe)".to_string(),
            presenter: r"(pres|intro|announce|gave)".to_string(),
            winner: r"(congr|win|won)".to_string(),
            tv: r"(tele)".to_string(),
            tv_alias_feature: r"(tele|tv)".to_string(),
        }
    }
}

/// Whether a role only fires when the message also carries the provenance marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RolePolicy {
    pub requires_provenance: bool,
}

/// Provenance requirements per role. Presenter claims are only trusted from one
/// source account by default; winner and nominee claims are trusted from anyone.
#[derive(Debug, Clone)]
pub struct ProvenancePolicy {
    pub marker: String,
    pub winner: RolePolicy,
    pub nominee: RolePolicy,
    pub presenter: RolePolicy,
}

impl Default for ProvenancePolicy {
    fn default() -> Self {
        Self {
            marker: DEFAULT_PROVENANCE_MARKER.to_string(),
            winner: RolePolicy::default(),
            nominee: RolePolicy::default(),
            presenter: RolePolicy {
                requires_provenance: true,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CeremonyConfig {
    pub year: i32,
    pub first_year: i32,
    pub corpus_path: PathBuf,
    pub reference_base_url: String,
    /// Name shared by the ceremony page and its award titles
    pub ceremony_name: String,
    pub award_title_prefix: String,
    /// Navigation entries at the end of the award list that are not categories
    pub trailing_awards_to_drop: usize,
    pub extra_awards: Vec<String>,
    pub feature_max: usize,
    pub required_features: usize,
    pub keywords: RoleKeywords,
    pub global_noise: Vec<String>,
    pub person_noise: Vec<String>,
    pub noise_from_titles: bool,
    pub provenance: ProvenancePolicy,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            first_year: DEFAULT_FIRST_YEAR,
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            reference_base_url: DEFAULT_REFERENCE_BASE_URL.to_string(),
            ceremony_name: "Golden Globe Awards".to_string(),
            award_title_prefix: "Golden Globe Award".to_string(),
            trailing_awards_to_drop: 3,
            extra_awards: vec!["Cecil B. DeMille Award".to_string()],
            feature_max: DEFAULT_FEATURE_MAX,
            required_features: DEFAULT_REQUIRED_FEATURES,
            keywords: RoleKeywords::default(),
            global_noise: GLOBAL_NOISE_WORDS.iter().map(|s| s.to_string()).collect(),
            person_noise: PERSON_NOISE_WORDS.iter().map(|s| s.to_string()).collect(),
            noise_from_titles: false,
            provenance: ProvenancePolicy::default(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl CeremonyConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let year = env_or("CEREMONY_YEAR", defaults.year);
        let first_year = env_or("CEREMONY_FIRST_YEAR", defaults.first_year);
        let corpus_path = env::var("CORPUS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.corpus_path);
        let reference_base_url =
            env::var("REFERENCE_BASE_URL").unwrap_or(defaults.reference_base_url);
        let feature_max = env_or("FEATURE_MAX", defaults.feature_max);
        let required_features = env_or("REQUIRED_FEATURES", defaults.required_features);
        let noise_from_titles = env_or("NOISE_FROM_TITLES", defaults.noise_from_titles);

        let mut provenance = defaults.provenance;
        if let Ok(marker) = env::var("PRESENTER_PROVENANCE_MARKER") {
            provenance.marker = marker.trim().to_string();
        }
        provenance.presenter.requires_provenance = env_or(
            "PRESENTER_REQUIRES_PROVENANCE",
            provenance.presenter.requires_provenance,
        );

        let mut config = Self {
            year,
            first_year,
            corpus_path,
            reference_base_url,
            feature_max,
            required_features,
            noise_from_titles,
            provenance,
            ..Self::default()
        };

        if let Ok(extra) = env::var("EXTRA_PERSON_NOISE") {
            config.add_person_noise_words(&extra);
        }

        debug!("Ceremony config from env: {:?}", config);
        config
    }

    /// Appends every space-separated word of `addition` to the person-noise filter.
    pub fn add_person_noise_words(&mut self, addition: &str) {
        self.person_noise
            .extend(addition.split_whitespace().map(|w| w.to_string()));
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("🏆 Ceremony year {} (first ceremony {})", self.year, self.first_year);
        info!("   Corpus: {}", self.corpus_path.display());
        info!("   Reference pages: {}", self.reference_base_url);
        info!(
            "   Features: up to {} per award, {} required per message",
            self.feature_max, self.required_features
        );
        if self.provenance.presenter.requires_provenance {
            info!(
                "   Presenter claims require provenance marker '{}'",
                self.provenance.marker
            );
        } else {
            info!("   Presenter claims accepted from any source");
        }
        if self.noise_from_titles {
            info!("   Noise list extended with award title words");
        }
    }
}
