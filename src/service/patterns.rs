//! Regex tables shared by the extractors
//!
//! All patterns are literals compiled once on first use.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

pub static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("iso date pattern"));

pub static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("slash date pattern"));

pub static LONG_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({MONTHS})\s+(\d{{1,2}}),?\s+(\d{{4}})\b")).expect("long date pattern")
});

pub static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern"));

/// Dollar amount with optional scale word; group 1 is the number, group 2 the scale
pub static MONEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\s?((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)(?:\s+((?i:thousand|million|billion))\b)?")
        .expect("money pattern")
});

pub static DEFINITIVE_LANGUAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:confirmed|documented|proven|admitted|found that|ruled|evidence shows|according to records)\b",
    )
    .expect("definitive language pattern")
});

pub static SAFETY_LANGUAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:safety|unsafe|harm|harmed|harmful|injury|injuries|injured|death|deaths|died|danger|dangerous|hazard|hazardous)\b",
    )
    .expect("safety language pattern")
});

pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

pub fn contains_currency(text: &str) -> bool {
    text.contains(CURRENCY_SYMBOLS)
}

/// Date patterns in precedence order: ISO, slash, long-form
pub fn full_date_patterns() -> [&'static Regex; 3] {
    [&*ISO_DATE, &*SLASH_DATE, &*LONG_DATE]
}

/// First date in `text`, trying ISO, slash, then long-form; normalized when the date is valid
pub fn first_full_date(text: &str) -> Option<String> {
    full_date_patterns()
        .into_iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| normalize_date(m.as_str()))
}

/// First date of any kind in `text` by position, including bare years
pub fn first_date_mention(text: &str) -> Option<String> {
    full_date_patterns()
        .into_iter()
        .chain(std::iter::once(&*YEAR))
        .filter_map(|pattern| pattern.find(text))
        .min_by_key(|m| m.start())
        .map(|m| m.as_str().to_string())
}

/// Normalize a matched date to `YYYY-MM-DD`, leaving it unchanged if it is not a valid calendar date
pub fn normalize_date(raw: &str) -> String {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%B %d %Y"];
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&collapsed, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or(collapsed)
}

/// Four-digit year contained in a date string
pub fn year_of(date: &str) -> Option<i32> {
    YEAR.find(date).and_then(|m| m.as_str().parse().ok())
}
