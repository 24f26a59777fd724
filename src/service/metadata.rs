//! Metadata extraction
//!
//! Caller-supplied overrides win field by field; everything else is derived from the
//! text and source identifier. Extraction never fails: undetermined fields fall back to
//! `"unknown"` (or the fetch date, for the document date).

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::model::{Document, GovernmentLevel, Jurisdiction, Metadata, SourceType, UNKNOWN};
use crate::service::patterns;
use crate::service::text::truncate_chars;

const MIN_TITLE_CHARS: usize = 10;
const MAX_TITLE_CHARS: usize = 200;

static AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\b[Bb]y|\bAuthor:)\s+([A-Z][a-z]+\s+[A-Z][a-z]+)").expect("author pattern")
});

/// News outlets recognised by domain
const NEWS_DOMAINS: &[&str] = &[
    "cbc.ca",
    "thestar.com",
    "theglobeandmail.com",
    "globalnews.ca",
    "ctvnews.ca",
    "nationalpost.com",
    "cp24.com",
    "torontosun.com",
    "thecanadianpressnews.ca",
    "reuters.com",
    "apnews.com",
];

const SOCIAL_DOMAINS: &[&str] = &["twitter", "facebook"];

/// Content phrases checked in order when the URL is inconclusive
const CONTENT_HEURISTICS: &[(SourceType, &[&str])] = &[
    (
        SourceType::Foi,
        &["freedom of information", "access to information request", "foi request"],
    ),
    (
        SourceType::Report,
        &["annual report", "audit report", "executive summary", "findings and recommendations"],
    ),
    (
        SourceType::Official,
        &["news release", "government of ontario", "government of canada", "the minister announced"],
    ),
    (SourceType::Social, &["posted by", "retweet", "shared a post"]),
    (SourceType::News, &["staff reporter", "reported by", "told reporters"]),
];

/// Jurisdiction keywords, most specific level first
const JURISDICTIONS: &[(GovernmentLevel, &str, &[&str])] = &[
    (GovernmentLevel::City, "Toronto", &["toronto", "city of toronto"]),
    (GovernmentLevel::City, "Hamilton", &["hamilton"]),
    (GovernmentLevel::City, "Ottawa", &["city of ottawa", "ottawa city council"]),
    (GovernmentLevel::City, "Municipal", &["city council", "municipal"]),
    (
        GovernmentLevel::Province,
        "Ontario",
        &["ontario", "queen's park", "wsib", "odsp", "ontario works"],
    ),
    (
        GovernmentLevel::Federal,
        "Canada",
        &["federal", "parliament", "house of commons", "government of canada", "canada"],
    ),
];

/// Derive document metadata, preferring caller-supplied values
pub fn extract_metadata(doc: &Document) -> Metadata {
    let overrides = &doc.overrides;

    let title = overrides
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| extract_title(&doc.text));

    let date = overrides
        .date
        .clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| patterns::first_full_date(&doc.text))
        .unwrap_or_else(|| doc.fetched_at.date_naive().format("%Y-%m-%d").to_string());

    let author = overrides
        .author
        .clone()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| extract_author(&doc.text));

    let source_type = match doc.declared_type {
        SourceType::Unknown => classify_source(&doc.source, &doc.text),
        declared => declared,
    };

    let jurisdiction = match overrides.jurisdiction.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            detect_jurisdiction(name).unwrap_or_else(|| Jurisdiction {
                level: GovernmentLevel::Unknown,
                name: name.trim().to_string(),
            })
        }
        _ => detect_jurisdiction(&doc.text).unwrap_or_else(Jurisdiction::unknown),
    };

    Metadata {
        title,
        date,
        author,
        source_type,
        jurisdiction,
    }
}

/// First line longer than the minimum, truncated
fn extract_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > MIN_TITLE_CHARS)
        .map(|line| truncate_chars(line, MAX_TITLE_CHARS))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn extract_author(text: &str) -> String {
    AUTHOR
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Classify the source by domain first, then by content
///
/// For URLs only the host is inspected; other identifiers are matched whole.
pub fn classify_source(source: &str, text: &str) -> SourceType {
    let source = source_domain(source);

    if source.contains("gov") {
        return SourceType::Official;
    }
    if source.contains("foi") || source.contains("freedom") {
        return SourceType::Foi;
    }
    if NEWS_DOMAINS.iter().any(|domain| source.contains(domain)) {
        return SourceType::News;
    }
    if SOCIAL_DOMAINS.iter().any(|domain| source.contains(domain)) {
        return SourceType::Social;
    }

    let content = text.to_lowercase();
    CONTENT_HEURISTICS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| content.contains(phrase)))
        .map(|(source_type, _)| *source_type)
        .unwrap_or(SourceType::Unknown)
}

fn source_domain(source: &str) -> String {
    Url::parse(source.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| source.to_string())
        .to_lowercase()
}

fn detect_jurisdiction(text: &str) -> Option<Jurisdiction> {
    let content = text.to_lowercase();
    JURISDICTIONS
        .iter()
        .find(|(_, _, keywords)| keywords.iter().any(|k| content.contains(k)))
        .map(|(level, name, _)| Jurisdiction {
            level: *level,
            name: name.to_string(),
        })
}
