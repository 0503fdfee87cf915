// src/ingest/scrape.rs - award titles and hosts from the ceremony's reference page
//
// Tolerant scanning over raw markup: locate a known block, then walk the tags
// inside it. Attribute order, quoting style, tag case and whitespace do not
// matter.
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::time::Duration;
use url::Url;

use super::IngestError;
use crate::config::CeremonyConfig;
use crate::models::core::Ceremony;

static TD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("valid td regex"));
static LI_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid li regex"));
static LI_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?li\b").expect("valid li end regex"));
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("valid anchor regex"));
static TITLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\btitle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid title attribute regex")
});
static INFOBOX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<table\b[^>]*\bclass\s*=\s*["'][^"']*\binfobox vevent\b[^"']*["'][^>]*>"#)
        .expect("valid infobox regex")
});
static TR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid tr regex"));
static TH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<th\b[^>]*>(.*?)</th>").expect("valid th regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity regex")
});

const HOSTS_LABEL: &str = "Hosted by";

/// Award titles and hosts as listed on the reference page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePage {
    pub awards: Vec<String>,
    pub hosts: Vec<String>,
}

/// Decodes named and numeric character references; unknown names are left as is.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "ndash" => Some('–'),
                    "mdash" => Some('—'),
                    "eacute" => Some('é'),
                    _ => None,
                }
            };
            decoded
                .map(|c| c.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Visible text of a markup fragment, whitespace collapsed.
fn text_content(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inner markup of the element whose opening tag ends at `open_end`, found by
/// counting nested tags of the same name. An unclosed element runs to the end.
fn element_inner<'a>(html: &'a str, open_end: usize, tag: &str) -> &'a str {
    let tag_re = RegexBuilder::new(&format!(r"<(/?){}\b[^>]*?(/?)>", regex::escape(tag)))
        .case_insensitive(true)
        .build();
    let Ok(tag_re) = tag_re else {
        return &html[open_end..];
    };

    let mut depth = 1usize;
    for caps in tag_re.captures_iter(&html[open_end..]) {
        let closing = !caps[1].is_empty();
        let self_closing = !caps[2].is_empty();
        if closing {
            depth -= 1;
            if depth == 0 {
                let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
                return &html[open_end..open_end + whole];
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    &html[open_end..]
}

/// Opening tag carrying `aria-labelledby="<id>"`; returns (tag name, end of tag).
fn find_labelled_element(html: &str, label_id: &str) -> Option<(String, usize)> {
    let re = RegexBuilder::new(&format!(
        r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\baria-labelledby\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(label_id)
    ))
    .case_insensitive(true)
    .build()
    .ok()?;
    let caps = re.captures(html)?;
    let whole = caps.get(0)?;
    Some((caps[1].to_lowercase(), whole.end()))
}

fn anchor_title(fragment: &str) -> Option<String> {
    let anchor = ANCHOR_RE.captures(fragment)?;
    let attrs = TITLE_ATTR_RE.captures(&anchor[1])?;
    attrs
        .get(1)
        .or_else(|| attrs.get(2))
        .map(|m| decode_entities(m.as_str()))
}

/// The first anchor title of every list item inside a table cell, in page order.
fn listed_titles(section: &str) -> Vec<String> {
    let mut titles = Vec::new();
    for td in TD_RE.captures_iter(section) {
        let cell = &td[1];
        for li in LI_OPEN_RE.find_iter(cell) {
            let rest = &cell[li.end()..];
            let item_end = LI_END_RE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
            if let Some(title) = anchor_title(&rest[..item_end]) {
                titles.push(title);
            }
        }
    }
    titles
}

fn hosts_from_infobox(infobox: &str) -> Vec<String> {
    let mut hosts = Vec::new();
    for row in TR_RE.captures_iter(infobox) {
        let row = &row[1];
        let is_hosts_row = TH_RE
            .captures(row)
            .map(|th| text_content(&th[1]) == HOSTS_LABEL)
            .unwrap_or(false);
        if !is_hosts_row {
            continue;
        }
        for anchor in ANCHOR_RE.captures_iter(row) {
            let name = text_content(&anchor[2]);
            if !name.is_empty() {
                hosts.push(name);
            }
        }
    }
    hosts
}

/// Parses the award list and the hosts out of a reference page.
///
/// Award titles are the ones starting with the configured prefix, minus the
/// configured number of trailing entries, followed by the extra awards.
/// A missing awards block or infobox is a hard error.
pub fn parse_reference_page(
    html: &str,
    source_url: &str,
    config: &CeremonyConfig,
) -> Result<ReferencePage, IngestError> {
    let label_id = config.ceremony_name.replace(' ', "_");
    let (tag, open_end) =
        find_labelled_element(html, &label_id).ok_or_else(|| IngestError::MissingSection {
            section: "awards navigation",
            source_url: source_url.to_string(),
        })?;
    let section = element_inner(html, open_end, &tag);

    let mut awards: Vec<String> = listed_titles(section)
        .into_iter()
        .filter(|t| t.starts_with(&config.award_title_prefix))
        .collect();
    let keep = awards.len().saturating_sub(config.trailing_awards_to_drop);
    awards.truncate(keep);
    awards.extend(config.extra_awards.iter().cloned());

    let infobox_open = INFOBOX_RE
        .find(html)
        .ok_or_else(|| IngestError::MissingSection {
            section: "infobox",
            source_url: source_url.to_string(),
        })?;
    let infobox = element_inner(html, infobox_open.end(), "table");
    let hosts = hosts_from_infobox(infobox);

    if hosts.is_empty() {
        warn!("No '{}' row found on {}", HOSTS_LABEL, source_url);
    }

    Ok(ReferencePage { awards, hosts })
}

/// Address of the ceremony's reference page, e.g. `.../75th_Golden_Globe_Awards`.
pub fn reference_url(ceremony: &Ceremony) -> Result<Url, IngestError> {
    let mut base = ceremony.config.reference_base_url.clone();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join(&ceremony.reference_slug())?)
}

pub async fn fetch_reference_page(ceremony: &Ceremony) -> Result<ReferencePage, IngestError> {
    let url = reference_url(ceremony)?;
    let url_text = url.to_string();
    let fetch_err = |source: reqwest::Error| IngestError::Fetch {
        url: url_text.clone(),
        source,
    };

    info!("Fetching reference page {}", url_text);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_err)?;

    let html = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)?;

    parse_reference_page(&html, &url_text, &ceremony.config)
}
