pub mod entities;
pub mod features;
pub mod router;

pub use entities::{EntityExtractor, Extraction, HeuristicPersonTagger, PersonTagger};
pub use features::{build_award_features, effective_features, extract_features, FeatureGate};
pub use router::{classify_messages, AwardRouter, ClassificationStats, RoleClassifier, RoleFlags};
