//! Reconciliation: turns an untrusted model response into a `ResumeRecord`.
//!
//! Flow: clean projects → clean employment (dedup, project-title filter) →
//!       headline fallback → split project narratives out of roles →
//!       dedup the rewritten roles → clean remaining sections →
//!       education-employer guard.
//!
//! Every step is a pure function over owned data and never fails; malformed
//! sections degrade to their empty/sentinel form.

pub mod employment;
pub mod normalize;
pub mod projects;
pub mod sections;

use serde_json::Value;
use tracing::{debug, info};

use crate::models::{RawResume, ResumeRecord};

use employment::{clean_employment, dedup_roles, strip_education_employers, synthesize_fallback};
use projects::{clean_projects, dedup_projects, project_titles, split_projects};
use sections::{
    clean_certifications, clean_education, clean_languages, clean_personal_details, clean_skills,
    text_or_sentinel,
};

/// Reconciles a parsed JSON document.
pub fn reconcile_value(value: Value) -> ResumeRecord {
    reconcile(RawResume::from_value(value))
}

pub fn reconcile(raw: RawResume) -> ResumeRecord {
    let recent_employer = text_or_sentinel(raw.recent_employer);
    let job_title = text_or_sentinel(raw.job_title);
    let professional_summary = text_or_sentinel(raw.professional_summary);

    let listed_projects = clean_projects(raw.projects.unwrap_or_default());
    let titles = project_titles(&listed_projects);

    let mut employment = clean_employment(raw.employment_history.unwrap_or_default(), &titles);
    if employment.is_empty() {
        if let Some(fallback) =
            synthesize_fallback(&recent_employer, &job_title, &professional_summary)
        {
            debug!("Employment history empty; synthesized entry for {recent_employer}");
            employment = fallback;
        }
    }

    let (employment, extracted) = split_projects(employment);
    let extracted_count = extracted.len();
    let mut all_projects = listed_projects;
    all_projects.extend(extracted);
    let projects = dedup_projects(all_projects);

    // Roles that differed only in a project sentence collide once it is removed.
    let employment_history = strip_education_employers(dedup_roles(employment));

    let record = ResumeRecord {
        personal_details: clean_personal_details(raw.personal_details),
        recent_employer,
        job_title,
        professional_summary,
        total_years_of_experience: raw
            .total_years_of_experience
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
        employment_history,
        skills: clean_skills(raw.skills),
        certifications: clean_certifications(raw.certifications),
        education: clean_education(raw.education),
        languages: clean_languages(raw.languages),
        projects,
    };

    info!(
        "Reconciled resume: {} employers, {} projects ({} split from roles), {} education entries",
        record.employment_history.len(),
        record.projects.len(),
        extracted_count,
        record.education.len()
    );

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_SPECIFIED;
    use crate::reconcile::normalize::normalize;
    use serde_json::json;
    use std::collections::HashSet;

    fn assert_clean_output(record: &ResumeRecord) {
        let mut keys = HashSet::new();
        for (employer, role) in record.employment_history.roles() {
            assert!(role.description.chars().count() <= 1003);
            assert!(keys.insert((
                normalize(&employer.name),
                normalize(&role.role),
                normalize(&role.duration),
                normalize(&role.description),
            )));
        }
        let again = reconcile_value(serde_json::to_value(record).unwrap());
        assert_eq!(&again, record);
    }

    fn full_document() -> Value {
        json!({
            "Personal Details": {
                "Full Name": "Jane Doe",
                "Email": "jane@example.com",
                "Phone": "555-0100",
                "Location": "Austin, TX"
            },
            "Recent Employer": "Globex",
            "Job Title": "Staff Engineer",
            "Professional Summary": "Backend engineer with 8 years in payments.",
            "Total Years of Experience": 8,
            "Employment History": {
                "Globex": [
                    {
                        "Role": "Staff Engineer",
                        "Duration": "Jan 2020 – Present",
                        "Description": "Owned the payments roadmap. Designed a ledger service in Rust handling 2k tps; Mentored engineers"
                    },
                    {
                        "Role": "Staff Engineer",
                        "Duration": "Jan 2020 – Present",
                        "Description": "Owned the payments roadmap. Designed a ledger service in Rust handling 2k tps; Mentored engineers"
                    }
                ],
                "State Institute of Technology": [
                    {"Role": "Research Assistant", "Duration": "2014 - 2016", "Description": "Graded papers"}
                ],
                "Initech": [
                    {"Role": "Engineer", "Duration": "banana", "Description": ""}
                ]
            },
            "Skills": {"Hard Skill": ["Rust", "Kafka", "rust"], "Soft Skill": ["Mentoring"]},
            "Certifications": null,
            "Education": [
                {"Degree": "BSc Computer Science", "Institution": "State Institute of Technology", "Duration": "2012 - 2016"}
            ],
            "Languages": ["English"],
            "Projects": [
                {"Title": "Fraud Scoring", "Stack": "Python", "Description": "Realtime fraud model"}
            ]
        })
    }

    #[test]
    fn test_full_document_reconciles() {
        let record = reconcile_value(full_document());

        assert_eq!(record.personal_details.full_name, "Jane Doe");
        assert_eq!(record.total_years_of_experience.as_deref(), Some("8"));
        assert_eq!(record.employment_history.len(), 2);
        assert!(record
            .employment_history
            .get("State Institute of Technology")
            .is_none());

        let globex = record.employment_history.get("Globex").unwrap();
        assert_eq!(globex.roles.len(), 1);
        assert_eq!(
            globex.roles[0].description,
            "Owned the payments roadmap. Mentored engineers"
        );

        let initech = record.employment_history.get("Initech").unwrap();
        assert_eq!(initech.roles[0].duration, NOT_SPECIFIED);
        assert_eq!(initech.roles[0].description, NOT_SPECIFIED);

        assert_eq!(record.projects.len(), 2);
        assert_eq!(record.projects[1].title, "Staff Engineer at Globex");
        assert_eq!(record.skills.hard, vec!["Rust", "Kafka"]);
        assert!(record.certifications.is_empty());
        assert_eq!(record.education.len(), 1);
    }

    #[test]
    fn test_university_employer_dropped_and_education_unchanged() {
        let record = reconcile_value(json!({
            "Personal Details": {"Full Name": "Jane Doe"},
            "Employment History": {
                "Acme University": [
                    {"Role": "Intern", "Duration": "Jan 2020 – Mar 2020", "Description": "..."}
                ]
            }
        }));
        assert!(record.employment_history.is_empty());
        assert!(record.education.is_empty());
        assert_eq!(record.personal_details.full_name, "Jane Doe");
        assert_eq!(record.personal_details.email, NOT_SPECIFIED);
    }

    #[test]
    fn test_fallback_employment_then_guard() {
        let record = reconcile_value(json!({
            "Recent Employer": "Initech",
            "Job Title": "Analyst",
            "Professional Summary": "Analyst focused on TPS reports.",
            "Employment History": {}
        }));
        let initech = record.employment_history.get("Initech").unwrap();
        assert_eq!(initech.roles[0].role, "Analyst");

        let record = reconcile_value(json!({
            "Recent Employer": "Acme College",
            "Job Title": "Lecturer"
        }));
        assert!(record.employment_history.is_empty());
    }

    #[test]
    fn test_malformed_sections_never_fail() {
        let record = reconcile_value(json!({
            "Personal Details": ["Jane"],
            "Employment History": "Globex",
            "Skills": "Rust, Go",
            "Education": "BSc",
            "Projects": {"Title": "x"},
            "Languages": 3
        }));
        assert_eq!(record.personal_details.full_name, NOT_SPECIFIED);
        assert!(record.employment_history.is_empty());
        assert!(record.skills.hard.is_empty());
        assert!(record.projects.is_empty());
        assert!(record.languages.is_empty());

        let record = reconcile_value(json!("not an object"));
        assert_eq!(record, ResumeRecord::default());
    }

    #[test]
    fn test_descriptions_never_exceed_limit() {
        let long = "word ".repeat(600);
        let record = reconcile_value(json!({
            "Employment History": {
                "Globex": [{"Role": "Dev", "Duration": "2019 - 2020", "Description": long}]
            }
        }));
        for (_, role) in record.employment_history.roles() {
            assert!(role.description.chars().count() <= 1003);
        }
    }

    #[test]
    fn test_separator_dense_descriptions_hold_invariants() {
        for long in [
            "Ran ops\n".repeat(200),
            "Ran ops. ".repeat(300),
            "Ran ops; Filed reports;".repeat(80),
            "Handled payroll\nDeveloped a reporting warehouse for finance. ".repeat(40),
        ] {
            let record = reconcile_value(json!({
                "Employment History": {
                    "Globex": [{"Role": "Dev", "Duration": "2019 - 2020", "Description": long}]
                }
            }));
            assert_clean_output(&record);
        }
    }

    #[test]
    fn test_roles_colliding_after_split_are_merged() {
        let record = reconcile_value(json!({
            "Employment History": {
                "Globex": [
                    {"Role": "Dev", "Duration": "2019 - 2020", "Description": "Ran ops. Developed the billing platform for customers"},
                    {"Role": "Dev", "Duration": "2019 - 2020", "Description": "Ran ops. Developed the reporting platform for customers"}
                ]
            }
        }));
        let globex = record.employment_history.get("Globex").unwrap();
        assert_eq!(globex.roles.len(), 1);
        assert_eq!(globex.roles[0].description, "Ran ops");
        assert_eq!(record.projects.len(), 2);
        assert_clean_output(&record);
    }

    #[test]
    fn test_reconcile_is_idempotent_on_its_output() {
        let first = reconcile_value(full_document());
        let serialized = serde_json::to_value(&first).unwrap();
        let second = reconcile_value(serialized);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fallback_record_is_idempotent() {
        let first = reconcile_value(json!({
            "Recent Employer": "Initech",
            "Job Title": "Analyst",
            "Professional Summary": "Built a reporting pipeline for finance teams. Attends standups."
        }));
        let second = reconcile_value(serde_json::to_value(&first).unwrap());
        assert_eq!(first, second);
    }
}
