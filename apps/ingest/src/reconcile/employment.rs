use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::raw::RawEmployment;
use crate::models::{Employer, EmploymentHistory, Role, NOT_SPECIFIED};
use crate::reconcile::normalize::normalize;

pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Summary characters carried into a synthesized role description.
const FALLBACK_SUMMARY_CHARS: usize = 250;

/// Employer names containing any of these are schools, not employers.
const EDUCATION_KEYWORDS: &[&str] = &["university", "college", "school", "institute"];

static DURATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*[\s\-–]*\d{2,4}",
        r"(?i)\d{4}\s*[-–to]+\s*(Present|\d{4})",
        r"\d{2}/\d{4}",
        r"(?i)Present|Current",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid duration pattern regex"))
    .collect()
});

/// True when `text` looks like a tenure: month + year, a year range,
/// `MM/YYYY`, or an open-ended `Present` / `Current`.
pub fn is_valid_duration(text: &str) -> bool {
    !text.trim().is_empty() && DURATION_PATTERNS.iter().any(|re| re.is_match(text))
}

pub fn is_education_institution(name: &str) -> bool {
    let lower = name.to_lowercase();
    EDUCATION_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Cleans the model's employment section.
///
/// Per role: drops entries with neither title nor duration, replaces
/// unrecognised durations and empty descriptions with the sentinel, truncates
/// long descriptions, and drops roles whose title + description mention a
/// known project title. Employers whose names normalize equal are merged and
/// their roles pass through [`dedup_roles`]. Employers with no letters, education
/// institutions, and employers left with no roles are dropped.
pub fn clean_employment(raw: RawEmployment, project_titles: &HashSet<String>) -> EmploymentHistory {
    let mut employers: Vec<Employer> = Vec::new();

    for (company, roles) in raw.0 {
        let name = company.trim();
        if !name.chars().any(|c| c.is_alphabetic()) {
            debug!("Dropping employer without alphabetic name: {company:?}");
            continue;
        }
        if is_education_institution(name) {
            debug!("Dropping education institution listed as employer: {name}");
            continue;
        }
        let company_key = normalize(name);

        let mut kept = Vec::new();
        for raw_role in roles {
            let title = raw_role.role.unwrap_or_default().trim().to_string();
            let duration = raw_role.duration.unwrap_or_default().trim().to_string();
            let description = raw_role.description.unwrap_or_default().trim().to_string();

            if title.is_empty() && duration.is_empty() {
                continue;
            }

            let duration = if is_valid_duration(&duration) {
                duration
            } else {
                NOT_SPECIFIED.to_string()
            };
            let description = if description.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                truncate_description(&description)
            };

            if !project_titles.is_empty() {
                let combined = normalize(&format!("{title} {description}"));
                if project_titles.iter().any(|t| combined.contains(t.as_str())) {
                    debug!("Role '{title}' at {name} restates a listed project; dropped");
                    continue;
                }
            }

            kept.push(Role {
                role: if title.is_empty() {
                    NOT_SPECIFIED.to_string()
                } else {
                    title
                },
                duration,
                description,
            });
        }

        if kept.is_empty() {
            continue;
        }
        match employers
            .iter_mut()
            .find(|e| normalize(&e.name) == company_key)
        {
            Some(existing) => existing.roles.extend(kept),
            None => employers.push(Employer {
                name: name.to_string(),
                roles: kept,
            }),
        }
    }

    dedup_roles(EmploymentHistory::new(employers))
}

/// Drops every role whose normalized (employer, role, duration, description)
/// key was already seen, then any employer left without roles.
pub fn dedup_roles(history: EmploymentHistory) -> EmploymentHistory {
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let employers = history
        .into_inner()
        .into_iter()
        .filter_map(|mut employer| {
            let company_key = normalize(&employer.name);
            employer.roles.retain(|r| {
                seen.insert((
                    company_key.clone(),
                    normalize(&r.role),
                    normalize(&r.duration),
                    normalize(&r.description),
                ))
            });
            (!employer.roles.is_empty()).then_some(employer)
        })
        .collect();
    EmploymentHistory::new(employers)
}

/// Builds a single-role history from the headline fields when the model
/// returned no usable employment. Sentinel values count as absent.
pub fn synthesize_fallback(
    recent_employer: &str,
    job_title: &str,
    summary: &str,
) -> Option<EmploymentHistory> {
    let employer = recent_employer.trim();
    let title = job_title.trim();
    if is_absent(employer) || is_absent(title) || !employer.chars().any(|c| c.is_alphabetic()) {
        return None;
    }

    let summary = summary.trim();
    let description = if is_absent(summary) {
        NOT_SPECIFIED.to_string()
    } else {
        summary.chars().take(FALLBACK_SUMMARY_CHARS).collect()
    };

    Some(EmploymentHistory::new(vec![Employer {
        name: employer.to_string(),
        roles: vec![Role {
            role: title.to_string(),
            duration: NOT_SPECIFIED.to_string(),
            description,
        }],
    }]))
}

/// Final pass: removes any employer whose name marks it as a school.
pub fn strip_education_employers(mut history: EmploymentHistory) -> EmploymentHistory {
    history.retain(|e| !is_education_institution(&e.name));
    history
}

pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut truncated: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        description.to_string()
    }
}

fn is_absent(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(NOT_SPECIFIED)
}
