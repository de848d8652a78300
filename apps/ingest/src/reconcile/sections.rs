use std::collections::HashSet;

use crate::models::raw::{
    RawCertification, RawEducation, RawLanguage, RawPersonalDetails, RawSkills,
};
use crate::models::{Certification, Education, PersonalDetails, Skills, NOT_SPECIFIED};
use crate::reconcile::normalize::normalize;

/// Minimum length (exclusive) for an education degree or institution.
const MIN_EDUCATION_FIELD_CHARS: usize = 2;

/// Trimmed text, or the sentinel when empty or absent.
pub fn text_or_sentinel(value: Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

pub fn clean_personal_details(raw: Option<RawPersonalDetails>) -> PersonalDetails {
    let raw = raw.unwrap_or_default();
    PersonalDetails {
        full_name: text_or_sentinel(raw.full_name),
        email: text_or_sentinel(raw.email),
        phone: text_or_sentinel(raw.phone),
        location: text_or_sentinel(raw.location),
    }
}

pub fn clean_skills(raw: Option<RawSkills>) -> Skills {
    let raw = raw.unwrap_or_default();
    Skills {
        hard: dedup_texts(raw.hard.unwrap_or_default()),
        soft: dedup_texts(raw.soft.unwrap_or_default()),
    }
}

pub fn clean_languages(raw: Option<Vec<RawLanguage>>) -> Vec<String> {
    let flattened = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|lang| match lang {
            RawLanguage::Plain(name) => Some(name),
            RawLanguage::Detailed { name, level } => {
                let name = name?.trim().to_string();
                match level.as_deref().map(str::trim) {
                    Some(level) if !level.is_empty() => Some(format!("{name} ({level})")),
                    _ => Some(name),
                }
            }
        })
        .collect();
    dedup_texts(flattened)
}

/// Certifications need a name; missing field or date become the sentinel.
pub fn clean_certifications(raw: Option<Vec<RawCertification>>) -> Vec<Certification> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|cert| {
            let (name, field, date) = match cert {
                RawCertification::Named(name) => (Some(name), None, None),
                RawCertification::Detailed { name, field, date } => (name, field, date),
            };
            let name = name.unwrap_or_default().trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Certification {
                name,
                field: text_or_sentinel(field),
                date: text_or_sentinel(date),
            })
        })
        .collect()
}

/// Keeps entries whose degree and institution are both longer than two characters.
pub fn clean_education(raw: Option<Vec<RawEducation>>) -> Vec<Education> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|entry| {
            let degree = entry.degree.unwrap_or_default().trim().to_string();
            let institution = entry.institution.unwrap_or_default().trim().to_string();
            if degree.chars().count() <= MIN_EDUCATION_FIELD_CHARS
                || institution.chars().count() <= MIN_EDUCATION_FIELD_CHARS
            {
                return None;
            }
            Some(Education {
                degree,
                institution,
                duration: text_or_sentinel(entry.duration),
            })
        })
        .collect()
}

/// Trims, drops empties, and keeps the first of any normalized duplicates.
fn dedup_texts(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(normalize(s)))
        .collect()
}
