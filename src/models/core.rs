// src/models/core.rs
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;

use crate::config::CeremonyConfig;
use crate::text::similarity::{sort_ranked, RankedPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Winner,
    Nominee,
    Presenter,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Winner, Role::Nominee, Role::Presenter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Winner => "winner",
            Role::Nominee => "nominee",
            Role::Presenter => "presenter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrence counts per free-text candidate. Keys are kept exactly as
/// extracted, so different casings are different candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateTable {
    counts: HashMap<String, usize>,
}

impl CandidateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, candidate: &str) {
        *self.counts.entry(candidate.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, candidate: &str) -> usize {
        self.counts.get(candidate).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// All candidates, most frequent first.
    pub fn ranked(&self) -> Vec<RankedPair> {
        let mut pairs: Vec<RankedPair> = self
            .counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        sort_ranked(&mut pairs);
        pairs
    }
}

/// One award category and everything the corpus says about it.
#[derive(Debug, Clone)]
pub struct Award {
    pub title: String,
    features: OnceCell<Vec<String>>,
    pub winners: CandidateTable,
    pub nominees: CandidateTable,
    pub presenters: CandidateTable,
}

impl Award {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            features: OnceCell::new(),
            winners: CandidateTable::new(),
            nominees: CandidateTable::new(),
            presenters: CandidateTable::new(),
        }
    }

    /// Discriminating keywords, rarest first. Empty until features are extracted.
    pub fn features(&self) -> &[String] {
        self.features.get().map(|f| f.as_slice()).unwrap_or(&[])
    }

    /// False until features are set, and for titles that yielded none.
    pub fn has_features(&self) -> bool {
        !self.features().is_empty()
    }

    /// Stores the feature list. Features are fixed once set; a second call is
    /// refused and returns the rejected list.
    pub fn set_features(&self, features: Vec<String>) -> Result<(), Vec<String>> {
        self.features.set(features)
    }

    pub fn table(&self, role: Role) -> &CandidateTable {
        match role {
            Role::Winner => &self.winners,
            Role::Nominee => &self.nominees,
            Role::Presenter => &self.presenters,
        }
    }

    /// Distinct candidates and total counts across all three role tables.
    pub fn candidate_counts(&self) -> (usize, usize) {
        Role::ALL.iter().fold((0, 0), |(distinct, mentions), role| {
            let table = self.table(*role);
            (distinct + table.len(), mentions + table.total())
        })
    }

    pub fn table_mut(&mut self, role: Role) -> &mut CandidateTable {
        match role {
            Role::Winner => &mut self.winners,
            Role::Nominee => &mut self.nominees,
            Role::Presenter => &mut self.presenters,
        }
    }
}

/// English ordinal, e.g. 1st, 22nd, 75th, 111th.
pub fn ordinal(n: i32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// One analysis session over a single ceremony year.
#[derive(Debug, Clone)]
pub struct Ceremony {
    pub config: CeremonyConfig,
    pub awards: Vec<Award>,
    pub hosts: Vec<String>,
}

impl Ceremony {
    pub fn new(config: CeremonyConfig) -> Self {
        Self {
            config,
            awards: Vec::new(),
            hosts: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.config.year
    }

    /// Ordinal number of this ceremony, counting the first one as 1.
    pub fn edition(&self) -> i32 {
        self.config.year - self.config.first_year + 1
    }

    /// e.g. "75th Golden Globe Awards"
    pub fn display_name(&self) -> String {
        format!("{} {}", ordinal(self.edition()), self.config.ceremony_name)
    }

    /// Page slug of the reference article, e.g. "75th_Golden_Globe_Awards".
    pub fn reference_slug(&self) -> String {
        self.display_name().replace(' ', "_")
    }

    /// Replaces the award list and hosts with the scraped ones. Host names are
    /// kept once each, in page order.
    pub fn populate<I, S>(&mut self, award_titles: I, hosts: Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.awards = award_titles.into_iter().map(Award::new).collect();
        self.hosts.clear();
        for host in hosts {
            if !self.hosts.contains(&host) {
                self.hosts.push(host);
            }
        }
    }

    pub fn award_titles(&self) -> Vec<&str> {
        self.awards.iter().map(|a| a.title.as_str()).collect()
    }

    /// Every word used in any award title, minus connector words that also
    /// appear in real titles of works.
    pub fn derived_award_noise_words(&self) -> Vec<String> {
        const KEEPERS: [&str; 6] = ["the", "for", "-", "of", "or", "New"];
        let mut words: Vec<String> = Vec::new();
        for award in &self.awards {
            for word in award.title.split(' ') {
                if word.is_empty() || KEEPERS.contains(&word) {
                    continue;
                }
                if !words.iter().any(|w| w == word) {
                    words.push(word.to_string());
                }
            }
        }
        words
    }
}

impl fmt::Display for Ceremony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The {} held during {}", self.display_name(), self.year())
    }
}
