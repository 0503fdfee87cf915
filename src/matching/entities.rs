// src/matching/entities.rs - person and title candidates from a single message
//
// Two sources feed the candidate pools: a person-span tagger behind the
// `PersonTagger` seam, and a battery of capitalization/punctuation patterns
// that catch names and titles the tagger misses.
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Longest message (in tokens) the heuristic tagger will look at.
pub const MAX_TAGGED_TOKENS: usize = 400;

static CAPITALS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+(?:\s[A-Z][a-z]+)+").expect("valid capitals regex"));
// second word with an inner capital, e.g. Connor McGregor, Leonardo DiCaprio
static NAME_SPECIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+\s[A-Z][a-z]+[A-Z][A-Za-z]*").expect("valid name regex")
});
// e.g. The Shape of Water
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-z]+(?:\s[A-Z][a-z]+)+)(\s[a-z]+\s[A-Za-z]+)").expect("valid title regex")
});
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z]+)").expect("valid hashtag regex"));
static CAMEL_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][^A-Z]*").expect("valid camel-case regex"));
static PRESENTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:presented\s+by)\s+([A-Z][a-z]+(?:\s[A-Z][a-z]+)+)").expect("valid presented regex")
});

/// Capitalized words that start sentences or name the ceremony itself and
/// therefore never begin or continue a person span.
const NON_NAME_WORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "It", "He", "She", "We", "They", "I", "In",
    "On", "At", "To", "For", "From", "By", "With", "And", "But", "Or", "So", "If", "What", "Who",
    "Why", "How", "When", "Where", "Is", "Are", "Was", "Were", "Congrats", "Congratulations",
    "Wow", "Yes", "No", "Not", "Best", "Golden", "Globe", "Globes", "Award", "Awards", "Actor",
    "Actress", "Director", "Winner", "Wins", "Won", "Tonight", "Presenting", "Presented",
    "Nominee", "Nominees", "Nominated",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaggingError {
    #[error("message too long to tag ({0} tokens)")]
    TooLong(usize),
    #[error("tagger failed: {0}")]
    Failed(String),
}

/// Finds contiguous person-name token spans in free text.
pub trait PersonTagger: Send + Sync {
    fn person_spans(&self, text: &str) -> Result<Vec<Vec<String>>, TaggingError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The tagger ran but found no multi-token person span.
    NoPersonSpans,
    /// The tagger failed on this message; treated as no signal.
    TaggerFailed(String),
}

/// Outcome of best-effort name extraction on one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(Vec<String>),
    Empty(EmptyReason),
}

impl Extraction {
    pub fn names(&self) -> &[String] {
        match self {
            Extraction::Found(names) => names,
            Extraction::Empty(_) => &[],
        }
    }

    pub fn into_names(self) -> Vec<String> {
        match self {
            Extraction::Found(names) => names,
            Extraction::Empty(_) => Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Extraction::Empty(EmptyReason::TaggerFailed(_)))
    }
}

/// Capitalization-driven person tagger.
///
/// Splits the text the way a word tokenizer would (punctuation becomes its own
/// token, hashtags and mentions stay whole) and marks runs of capitalized,
/// mixed-case words as person spans. Middle initials such as `K.` continue a span.
#[derive(Debug, Clone)]
pub struct HeuristicPersonTagger {
    max_tokens: usize,
}

impl Default for HeuristicPersonTagger {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TAGGED_TOKENS,
        }
    }
}

impl HeuristicPersonTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self { max_tokens }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == '\'' || c == '’' || c == '-'
}

/// Word-tokenizer style split: punctuation runs are separate tokens, a
/// possessive `'s` is split off, `#tags` and `@handles` are single tokens.
fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        if chunk.starts_with('#') || chunk.starts_with('@') {
            tokens.push(chunk.to_string());
            continue;
        }

        let lead_end = chunk
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i)
            .unwrap_or(chunk.len());
        if lead_end > 0 {
            tokens.push(chunk[..lead_end].to_string());
        }
        let rest = &chunk[lead_end..];
        if rest.is_empty() {
            continue;
        }

        let core_end = rest
            .char_indices()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '\'' || *c == '’' || *c == '-')
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let mut core = &rest[..core_end];
        let mut trail = &rest[core_end..];

        // single-letter initial keeps its period: "K."
        if core.chars().count() == 1 && trail.starts_with('.') {
            tokens.push(format!("{}.", core));
            core = "";
            trail = &trail[1..];
        }

        if !core.is_empty() {
            let possessive = core
                .strip_suffix("'s")
                .or_else(|| core.strip_suffix("’s"))
                .filter(|stem| !stem.is_empty());
            match possessive {
                Some(stem) => {
                    tokens.push(stem.to_string());
                    tokens.push(core[stem.len()..].to_string());
                }
                None => tokens.push(core.to_string()),
            }
        }
        if !trail.is_empty() {
            tokens.push(trail.to_string());
        }
    }

    tokens
}

fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_uppercase()
    )
}

fn is_name_token(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_upper = chars.next().map(|c| c.is_uppercase()).unwrap_or(false);
    starts_upper
        && token.chars().all(is_name_char)
        && token.chars().any(|c| c.is_lowercase())
        && !NON_NAME_WORDS.contains(&token)
}

impl PersonTagger for HeuristicPersonTagger {
    fn person_spans(&self, text: &str) -> Result<Vec<Vec<String>>, TaggingError> {
        let tokens = word_tokenize(text);
        if tokens.len() > self.max_tokens {
            return Err(TaggingError::TooLong(tokens.len()));
        }

        let mut spans = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for token in tokens {
            let continues = is_name_token(&token) || (!current.is_empty() && is_initial(&token));
            if continues {
                current.push(token);
            } else if !current.is_empty() {
                spans.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            spans.push(current);
        }

        // a trailing initial is not part of a name
        for span in spans.iter_mut() {
            while span.last().map(|t| is_initial(t)).unwrap_or(false) {
                span.pop();
            }
        }
        spans.retain(|s| !s.is_empty());
        Ok(spans)
    }
}

/// Turns the tagger's person spans into candidate names.
pub struct EntityExtractor {
    tagger: Box<dyn PersonTagger>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(Box::new(HeuristicPersonTagger::default()))
    }
}

impl EntityExtractor {
    pub fn new(tagger: Box<dyn PersonTagger>) -> Self {
        Self { tagger }
    }

    /// Multi-token person spans joined with single spaces, each name once.
    /// Single-token spans are too noisy and are dropped. Tagger failures never
    /// propagate; they come back as `Extraction::Empty`.
    pub fn extract_people(&self, message: &str) -> Extraction {
        let spans = match self.tagger.person_spans(message) {
            Ok(spans) => spans,
            Err(e) => {
                debug!("Person tagging failed, treating as no signal: {}", e);
                return Extraction::Empty(EmptyReason::TaggerFailed(e.to_string()));
            }
        };

        let mut people: Vec<String> = Vec::new();
        for span in spans.into_iter().filter(|s| s.len() > 1) {
            let name = span.join(" ");
            if !people.contains(&name) {
                people.push(name);
            }
        }

        if people.is_empty() {
            Extraction::Empty(EmptyReason::NoPersonSpans)
        } else {
            Extraction::Found(people)
        }
    }
}

/// Runs of two or more capitalized words: `Lady Bird`, `Three Billboards Outside`.
pub fn capitalized_runs(message: &str) -> Vec<String> {
    CAPITALS_RE
        .find_iter(message)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A capitalized run followed by a lowercase connector and one more word:
/// `The Shape of Water`. Both groups are concatenated into one candidate.
pub fn subtitle_titles(message: &str) -> Vec<String> {
    TITLE_RE
        .captures_iter(message)
        .map(|caps| format!("{}{}", &caps[1], &caps[2]))
        .collect()
}

/// Hashtags split on uppercase letters: `#DunkirkMovie` gives `Dunkirk`, `Movie`.
pub fn hashtag_segments(message: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(message)
        .flat_map(|caps| {
            CAMEL_SEGMENT_RE
                .find_iter(&caps[1])
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Names whose second word has inner capitals: `Connor McGregor`.
pub fn mixed_case_names(message: &str) -> Vec<String> {
    NAME_SPECIAL_RE
        .find_iter(message)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Capitalized name runs following "presented by".
pub fn presented_by(message: &str) -> Vec<String> {
    PRESENTED_RE
        .captures_iter(message)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Title candidates for awards that name a work rather than a person.
pub fn work_candidates(message: &str) -> Vec<String> {
    let mut candidates = subtitle_titles(message);
    candidates.extend(hashtag_segments(message));
    candidates.extend(capitalized_runs(message));
    candidates
}
