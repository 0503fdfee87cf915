// src/ingest/corpus.rs
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::IngestError;

/// One message record. Only the text is used; every other field is ignored.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    text: String,
}

fn parse_record(
    value: serde_json::Value,
    origin: &str,
    index: usize,
) -> Result<String, IngestError> {
    serde_json::from_value::<CorpusRecord>(value)
        .map(|record| record.text)
        .map_err(|source| IngestError::CorpusFormat {
            origin: origin.to_string(),
            detail: format!("record {}", index),
            source,
        })
}

/// Message texts from a JSON array of records or from JSON Lines, in file order.
/// `origin` only labels errors.
pub fn parse_corpus(raw: &str, origin: &str) -> Result<Vec<String>, IngestError> {
    let trimmed = raw.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(trimmed).map_err(|source| IngestError::CorpusFormat {
                origin: origin.to_string(),
                detail: "top-level array".to_string(),
                source,
            })?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_record(value, origin, index))
            .collect();
    }

    let mut messages = Vec::new();
    for (index, line) in trimmed
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
    {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|source| IngestError::CorpusFormat {
                origin: origin.to_string(),
                detail: format!("record {}", index),
                source,
            })?;
        messages.push(parse_record(value, origin, index)?);
    }
    Ok(messages)
}

pub async fn load_corpus(path: &Path) -> Result<Vec<String>, IngestError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestError::CorpusRead {
            path: path.to_path_buf(),
            source,
        })?;
    let messages = parse_corpus(&raw, &path.display().to_string())?;
    info!("Read {} messages from {}", messages.len(), path.display());
    Ok(messages)
}

/// Distinct messages in first-occurrence order.
pub fn dedupe_messages(messages: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(messages.len());
    messages
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// The working set the classifier scans: every message exactly once.
#[derive(Debug, Clone, Default)]
pub struct MessageCorpus {
    messages: Vec<String>,
    loaded: usize,
}

impl MessageCorpus {
    pub fn from_messages<I: IntoIterator<Item = String>>(messages: I) -> Self {
        let raw: Vec<String> = messages.into_iter().collect();
        let loaded = raw.len();
        let messages = dedupe_messages(raw);
        debug!(
            "Corpus working set: {} unique of {} loaded",
            messages.len(),
            loaded
        );
        Self { messages, loaded }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages as read, duplicates included.
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}
