// src/ingest/mod.rs - the two bulk inputs of a run: the reference page and the message corpus.
//
// Both are fatal when they fail; nothing downstream can proceed without the
// award list or the messages.
pub mod corpus;
pub mod scrape;

use std::path::PathBuf;
use thiserror::Error;

pub use corpus::{dedupe_messages, load_corpus, parse_corpus, MessageCorpus};
pub use scrape::{fetch_reference_page, parse_reference_page, reference_url, ReferencePage};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("reference page {source_url} has no {section} section")]
    MissingSection {
        section: &'static str,
        source_url: String,
    },

    #[error("invalid reference page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read corpus {}: {source}", .path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus {origin} ({detail}): {source}")]
    CorpusFormat {
        origin: String,
        detail: String,
        #[source]
        source: serde_json::Error,
    },
}
