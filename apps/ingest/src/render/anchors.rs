//! Template anchors and the text lines inserted beneath each one.

use crate::models::{ResumeRecord, NOT_SPECIFIED};

/// A literal heading in the output template that marks an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    RecentEmployer,
    JobTitle,
    ProfessionalSummary,
    EmploymentHistory,
    HardSkill,
    SoftSkill,
    Certifications,
    Education,
    Languages,
}

impl Anchor {
    /// Every anchor, in fill order.
    pub const ALL: [Anchor; 9] = [
        Anchor::RecentEmployer,
        Anchor::JobTitle,
        Anchor::ProfessionalSummary,
        Anchor::EmploymentHistory,
        Anchor::HardSkill,
        Anchor::SoftSkill,
        Anchor::Certifications,
        Anchor::Education,
        Anchor::Languages,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Anchor::RecentEmployer => "Recent Employer",
            Anchor::JobTitle => "Job Title",
            Anchor::ProfessionalSummary => "PROFESSIONAL SUMMARY",
            Anchor::EmploymentHistory => "EMPLOYMENT HISTORY",
            Anchor::HardSkill => "Hard Skill",
            Anchor::SoftSkill => "Soft Skill",
            Anchor::Certifications => "CERTIFICATIONS",
            Anchor::Education => "EDUCATION",
            Anchor::Languages => "LANGUAGES",
        }
    }

    /// Case-insensitive containment, so `"Employment History:"` still matches.
    pub fn matches(self, paragraph_text: &str) -> bool {
        paragraph_text
            .trim()
            .to_lowercase()
            .contains(&self.heading().to_lowercase())
    }

    pub fn right_aligned(self) -> bool {
        self == Anchor::RecentEmployer
    }
}

/// The lines inserted after `anchor`. Never empty: a missing value renders as
/// the sentinel.
pub fn format_lines(anchor: Anchor, record: &ResumeRecord) -> Vec<String> {
    let lines = match anchor {
        Anchor::RecentEmployer => scalar(&record.recent_employer),
        Anchor::JobTitle => scalar(&record.job_title),
        Anchor::ProfessionalSummary => scalar(&record.professional_summary),
        Anchor::EmploymentHistory => {
            let mut lines = Vec::new();
            for employer in record.employment_history.iter() {
                lines.push(employer.name.clone());
                for role in &employer.roles {
                    lines.push(format!("• {} ({})", role.role.trim(), role.duration.trim()));
                    let description = role.description.trim();
                    if !description.is_empty() {
                        lines.push(description.to_string());
                    }
                }
            }
            lines
        }
        Anchor::HardSkill => bullets(&record.skills.hard),
        Anchor::SoftSkill => bullets(&record.skills.soft),
        Anchor::Certifications => record
            .certifications
            .iter()
            .map(|c| format!("{} - {} ({})", c.name, c.field, c.date))
            .collect(),
        Anchor::Education => record
            .education
            .iter()
            .rev()
            .flat_map(|e| [format!("{} ({})", e.degree, e.duration), e.institution.clone()])
            .collect(),
        Anchor::Languages => bullets(&record.languages),
    };

    if lines.is_empty() {
        vec![NOT_SPECIFIED.to_string()]
    } else {
        lines
    }
}

fn scalar(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

fn bullets(items: &[String]) -> Vec<String> {
    items.iter().map(|item| format!("- {item}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, Education, Employer, EmploymentHistory, Role};

    fn sample() -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.recent_employer = "Acme".to_string();
        record.employment_history = EmploymentHistory::new(vec![Employer {
            name: "Acme".to_string(),
            roles: vec![
                Role {
                    role: "Engineer".to_string(),
                    duration: "Jan 2019 – Present".to_string(),
                    description: "Maintained billing services".to_string(),
                },
                Role {
                    role: "Intern".to_string(),
                    duration: "2018".to_string(),
                    description: String::new(),
                },
            ],
        }]);
        record.skills.hard = vec!["Rust".to_string(), "SQL".to_string()];
        record.certifications = vec![Certification {
            name: "CKA".to_string(),
            field: "Cloud".to_string(),
            date: NOT_SPECIFIED.to_string(),
        }];
        record.education = vec![
            Education {
                degree: "BSc Physics".to_string(),
                institution: "State University".to_string(),
                duration: "2010 – 2014".to_string(),
            },
            Education {
                degree: "MSc Computing".to_string(),
                institution: "Tech Institute".to_string(),
                duration: "2015 – 2016".to_string(),
            },
        ];
        record.languages = vec!["English".to_string(), "French (B2)".to_string()];
        record
    }

    #[test]
    fn test_anchor_match_is_case_insensitive_containment() {
        assert!(Anchor::EmploymentHistory.matches("  Employment History: "));
        assert!(Anchor::HardSkill.matches("HARD SKILLS"));
        assert!(!Anchor::Education.matches("Certifications"));
    }

    #[test]
    fn test_employment_lines() {
        let lines = format_lines(Anchor::EmploymentHistory, &sample());
        assert_eq!(
            lines,
            vec![
                "Acme",
                "• Engineer (Jan 2019 – Present)",
                "Maintained billing services",
                "• Intern (2018)",
            ]
        );
    }

    #[test]
    fn test_education_most_recent_first() {
        let lines = format_lines(Anchor::Education, &sample());
        assert_eq!(
            lines,
            vec![
                "MSc Computing (2015 – 2016)",
                "Tech Institute",
                "BSc Physics (2010 – 2014)",
                "State University",
            ]
        );
    }

    #[test]
    fn test_list_sections() {
        let record = sample();
        assert_eq!(format_lines(Anchor::HardSkill, &record), vec!["- Rust", "- SQL"]);
        assert_eq!(
            format_lines(Anchor::Languages, &record),
            vec!["- English", "- French (B2)"]
        );
        assert_eq!(
            format_lines(Anchor::Certifications, &record),
            vec!["CKA - Cloud (Not Specified)"]
        );
    }

    #[test]
    fn test_empty_sections_render_sentinel() {
        let record = ResumeRecord::default();
        for anchor in Anchor::ALL {
            assert_eq!(format_lines(anchor, &record), vec![NOT_SPECIFIED]);
        }
    }
}
