// src/extractors/dates.rs
//! Permissive date recognition for free text.
//!
//! Finds the first date written as `September 30, 2015`, `Wednesday, Sept. 30th 2015`,
//! `30 September 2015`, `2015-09-30` or `2015/09/30` anywhere in the text.
//! A calendar-invalid match (e.g. `February 30, 2015`) is not a date.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static MONTH_DAY_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .expect("Failed to compile MONTH_DAY_YEAR_RE")
});

static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\.?,?\s+(\d{{4}})\b"
    ))
    .expect("Failed to compile DAY_MONTH_YEAR_RE")
});

static ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b").expect("Failed to compile ISO_RE")
});

/// Parses the first recognisable date in `text`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Earliest match wins, whichever form it is written in.
    let mut candidates: Vec<(usize, NaiveDate)> = Vec::new();

    for caps in MONTH_DAY_YEAR_RE.captures_iter(text) {
        if let Some(date) = build(&caps[3], month_number(&caps[1]), &caps[2]) {
            candidates.push((caps.get(0).map_or(0, |m| m.start()), date));
            break;
        }
    }
    for caps in DAY_MONTH_YEAR_RE.captures_iter(text) {
        if let Some(date) = build(&caps[3], month_number(&caps[2]), &caps[1]) {
            candidates.push((caps.get(0).map_or(0, |m| m.start()), date));
            break;
        }
    }
    for caps in ISO_RE.captures_iter(text) {
        if let Some(date) = build(&caps[1], caps[2].parse().ok(), &caps[3]) {
            candidates.push((caps.get(0).map_or(0, |m| m.start()), date));
            break;
        }
    }

    candidates
        .into_iter()
        .min_by_key(|(start, _)| *start)
        .map(|(_, date)| date)
}

fn build(year: &str, month: Option<u32>, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
