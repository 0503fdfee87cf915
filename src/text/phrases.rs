// src/text/phrases.rs - n-gram frequency tables over short strings
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").expect("valid word regex"));

/// Splits a string into runs of ASCII letters, dropping everything else.
pub fn alphabetic_words(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Drops every word that appears (case-insensitively) as a substring of `stop_words`.
///
/// `stop_words` is one filter string, usually an alternation such as
/// `"(the|or|of)"`, so a word is removed when the filter text contains it.
pub fn remove_stop_words<'a>(words: Vec<&'a str>, stop_words: &str) -> Vec<&'a str> {
    let filter = stop_words.to_lowercase();
    words
        .into_iter()
        .filter(|word| !filter.contains(&word.to_lowercase()))
        .collect()
}

/// Counts every contiguous run of `phrase_length` words across `data`.
///
/// Phrases are lower-cased and space-joined. The result keeps the order in
/// which each phrase was first seen so callers that stable-sort it get a
/// reproducible tie order.
pub fn count_phrases_ordered<S: AsRef<str>>(
    data: &[S],
    phrase_length: usize,
    stop_words: Option<&str>,
) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<(String, usize)> = Vec::new();

    if phrase_length == 0 {
        return ordered;
    }

    for inst in data {
        let mut words = alphabetic_words(inst.as_ref());
        if let Some(stop) = stop_words {
            words = remove_stop_words(words, stop);
        }
        if words.len() < phrase_length {
            continue;
        }

        for window in words.windows(phrase_length) {
            let phrase = window
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            match index.get(&phrase) {
                Some(&pos) => ordered[pos].1 += 1,
                None => {
                    index.insert(phrase.clone(), ordered.len());
                    ordered.push((phrase, 1));
                }
            }
        }
    }

    ordered
}

/// Frequency table of `phrase_length`-word phrases. No ordering guarantee.
pub fn count_phrases<S: AsRef<str>>(
    data: &[S],
    phrase_length: usize,
    stop_words: Option<&str>,
) -> HashMap<String, usize> {
    count_phrases_ordered(data, phrase_length, stop_words)
        .into_iter()
        .collect()
}
