//! Per-skill usage estimates derived from employment descriptions.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::models::ResumeRecord;

/// Months credited to a skill for each role whose description mentions it.
pub const MONTHS_PER_MATCHING_ROLE: u32 = 12;

const RANGE_SEPARATOR: char = '\u{2013}';

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static NUMERIC_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(0?[1-9]|1[0-2])/(\d{4})\b").expect("Invalid MM/YYYY regex"));
static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("Invalid year regex"));

/// Skill name → accumulated months, in the order the skills were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationEstimate(Vec<(String, u32)>);

impl DurationEstimate {
    #[cfg(test)]
    pub fn get(&self, skill: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(name, _)| name == skill)
            .map(|(_, months)| *months)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, months)| (name.as_str(), *months))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DurationEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, months) in &self.0 {
            map.serialize_entry(name, months)?;
        }
        map.end()
    }
}

/// Credits [`MONTHS_PER_MATCHING_ROLE`] to every skill named (case-insensitive)
/// in a role's description. Skills never mentioned stay at 0.
pub fn estimate(record: &ResumeRecord, skills: &[String]) -> DurationEstimate {
    let today = Local::now().date_naive();
    let mut totals: Vec<(String, u32)> = Vec::with_capacity(skills.len());
    for skill in skills {
        if !totals.iter().any(|(name, _)| name == skill) {
            totals.push((skill.clone(), 0));
        }
    }

    for (employer, role) in record.employment_history.roles() {
        // TODO: credit `tenure` instead of the flat increment once the
        // "Technology Durations" column is agreed to mean calendar months.
        let tenure = parse_tenure(&role.duration, today);
        debug!(
            "Tenure for '{}' at '{}': {} months (unused)",
            role.role, employer.name, tenure
        );

        let description = role.description.to_lowercase();
        for (skill, months) in totals.iter_mut() {
            if description.contains(&skill.to_lowercase()) {
                *months += MONTHS_PER_MATCHING_ROLE;
            }
        }
    }

    DurationEstimate(totals)
}

/// Whole months between the two ends of an en-dash range such as
/// `"Jan 2019 – Mar 2022"`. `Present` / `Current` resolve to `today`.
///
/// Returns at least 1 when both ends parse, and 0 when the separator is
/// missing or either end is unreadable.
pub fn parse_tenure(duration: &str, today: NaiveDate) -> u32 {
    let Some((start, end)) = duration.split_once(RANGE_SEPARATOR) else {
        return 0;
    };
    let (Some(start), Some(end)) = (parse_point(start, today), parse_point(end, today)) else {
        return 0;
    };

    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    months.max(1) as u32
}

/// Fuzzy month/year reading of one end of a range. A bare year means January.
fn parse_point(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.trim().to_lowercase();
    if lower.contains("present") || lower.contains("current") {
        return Some(today);
    }

    if let Some(caps) = NUMERIC_MONTH_YEAR.captures(&lower) {
        let month = caps[1].parse().ok()?;
        let year = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let year: i32 = YEAR.captures(&lower)?[1].parse().ok()?;
    let month = month_from_name(&lower).unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Matches full month names and prefixes of at least three letters
/// ("Jan", "Sept").
fn month_from_name(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| word.len() >= 3)
        .find_map(|word| {
            MONTH_NAMES
                .iter()
                .position(|month| month.starts_with(word))
                .map(|idx| idx as u32 + 1)
        })
}
