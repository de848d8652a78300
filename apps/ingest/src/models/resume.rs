use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Placeholder written wherever a field is absent or failed validation.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// The canonical structured resume produced for every input file.
///
/// Field names serialize to the exact keys of the persisted JSON artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeRecord {
    #[serde(rename = "Personal Details")]
    pub personal_details: PersonalDetails,
    #[serde(rename = "Recent Employer")]
    pub recent_employer: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Professional Summary")]
    pub professional_summary: String,
    #[serde(
        rename = "Total Years of Experience",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_years_of_experience: Option<String>,
    #[serde(rename = "Employment History")]
    pub employment_history: EmploymentHistory,
    #[serde(rename = "Skills")]
    pub skills: Skills,
    #[serde(rename = "Certifications")]
    pub certifications: Vec<Certification>,
    #[serde(rename = "Education")]
    pub education: Vec<Education>,
    #[serde(rename = "Languages")]
    pub languages: Vec<String>,
    #[serde(rename = "Projects")]
    pub projects: Vec<Project>,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            personal_details: PersonalDetails::default(),
            recent_employer: NOT_SPECIFIED.to_string(),
            job_title: NOT_SPECIFIED.to_string(),
            professional_summary: NOT_SPECIFIED.to_string(),
            total_years_of_experience: None,
            employment_history: EmploymentHistory::default(),
            skills: Skills::default(),
            certifications: Vec::new(),
            education: Vec::new(),
            languages: Vec::new(),
            projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalDetails {
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl Default for PersonalDetails {
    fn default() -> Self {
        Self {
            full_name: NOT_SPECIFIED.to_string(),
            email: NOT_SPECIFIED.to_string(),
            phone: NOT_SPECIFIED.to_string(),
            location: NOT_SPECIFIED.to_string(),
        }
    }
}

/// One position held at an employer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    /// At most 1000 characters plus a trailing ellipsis.
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employer {
    pub name: String,
    pub roles: Vec<Role>,
}

/// Employer name → roles, in the order the employers were first seen.
///
/// Serialized as a JSON object so the artifact keeps the `{"Company": [...]}` shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmploymentHistory(Vec<Employer>);

impl EmploymentHistory {
    pub fn new(employers: Vec<Employer>) -> Self {
        Self(employers)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employer> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Employer> {
        self.0.iter().find(|e| e.name == name)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&Employer, &Role)> {
        self.0
            .iter()
            .flat_map(|e| e.roles.iter().map(move |r| (e, r)))
    }

    pub fn retain<F: FnMut(&Employer) -> bool>(&mut self, f: F) {
        self.0.retain(f);
    }

    pub fn into_inner(self) -> Vec<Employer> {
        self.0
    }
}

impl Serialize for EmploymentHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for employer in &self.0 {
            map.serialize_entry(&employer.name, &employer.roles)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skills {
    #[serde(rename = "Hard Skill")]
    pub hard: Vec<String>,
    #[serde(rename = "Soft Skill")]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certification {
    #[serde(rename = "Certification Name")]
    pub name: String,
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Date")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Education {
    #[serde(rename = "Degree")]
    pub degree: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Duration")]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Stack")]
    pub stack: String,
    #[serde(rename = "Description")]
    pub description: String,
}
