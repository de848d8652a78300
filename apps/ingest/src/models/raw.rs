//! Untrusted intermediate shape of a model response.
//!
//! Every field is optional and every deserializer is lenient: a value of the
//! wrong JSON type is logged and treated as absent rather than failing the
//! whole document. Reconciliation turns this into a `ResumeRecord`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
pub struct RawResume {
    #[serde(rename = "Personal Details", default, deserialize_with = "lenient")]
    pub personal_details: Option<RawPersonalDetails>,
    #[serde(rename = "Recent Employer", default, deserialize_with = "lenient_text")]
    pub recent_employer: Option<String>,
    #[serde(rename = "Job Title", default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(rename = "Professional Summary", default, deserialize_with = "lenient_text")]
    pub professional_summary: Option<String>,
    #[serde(
        rename = "Total Years of Experience",
        default,
        deserialize_with = "lenient_text"
    )]
    pub total_years_of_experience: Option<String>,
    #[serde(rename = "Employment History", default, deserialize_with = "lenient")]
    pub employment_history: Option<RawEmployment>,
    #[serde(rename = "Skills", default, deserialize_with = "lenient")]
    pub skills: Option<RawSkills>,
    #[serde(rename = "Certifications", default, deserialize_with = "lenient_list")]
    pub certifications: Option<Vec<RawCertification>>,
    #[serde(rename = "Education", default, deserialize_with = "lenient_list")]
    pub education: Option<Vec<RawEducation>>,
    #[serde(rename = "Languages", default, deserialize_with = "lenient_list")]
    pub languages: Option<Vec<RawLanguage>>,
    #[serde(rename = "Projects", default, deserialize_with = "lenient_list")]
    pub projects: Option<Vec<RawProject>>,
}

impl RawResume {
    /// Reads a parsed JSON document. A non-object document yields an empty resume.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            warn!("Model output is not a JSON object; treating every section as absent");
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Resume document could not be read ({e}); treating every section as absent");
            Self::default()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPersonalDetails {
    #[serde(rename = "Full Name", default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRole {
    #[serde(rename = "Role", default, deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(rename = "Duration", default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

/// Employer → roles, in document order. Employers whose value is not a list
/// are dropped; role entries that are not objects are dropped.
#[derive(Debug, Default)]
pub struct RawEmployment(pub Vec<(String, Vec<RawRole>)>);

impl<'de> Deserialize<'de> for RawEmployment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut employers = Vec::with_capacity(map.len());
        for (employer, roles) in map {
            match roles {
                Value::Array(items) => employers.push((employer, collect_lenient(items))),
                other => debug!(
                    "Employment entry '{employer}' is {} rather than a list; dropped",
                    json_kind(&other)
                ),
            }
        }
        Ok(Self(employers))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSkills {
    #[serde(rename = "Hard Skill", default, deserialize_with = "lenient_text_list")]
    pub hard: Option<Vec<String>>,
    #[serde(rename = "Soft Skill", default, deserialize_with = "lenient_text_list")]
    pub soft: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawCertification {
    Named(String),
    Detailed {
        #[serde(rename = "Certification Name", default, deserialize_with = "lenient_text")]
        name: Option<String>,
        #[serde(rename = "Field", default, deserialize_with = "lenient_text")]
        field: Option<String>,
        #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
        date: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEducation {
    #[serde(rename = "Degree", default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(rename = "Institution", default, deserialize_with = "lenient_text")]
    pub institution: Option<String>,
    #[serde(rename = "Duration", default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawLanguage {
    Plain(String),
    Detailed {
        #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
        name: Option<String>,
        #[serde(rename = "Level", default, deserialize_with = "lenient_text")]
        level: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProject {
    #[serde(rename = "Title", default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "Stack", default, deserialize_with = "lenient_stack")]
    pub stack: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient deserializers
// ────────────────────────────────────────────────────────────────────────────

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        // serde would otherwise read a list positionally into the struct fields
        Value::Object(_) => match serde_json::from_value(value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!("Ignoring malformed section: {e}");
                Ok(None)
            }
        },
        other => {
            warn!("Expected an object, found {}; section treated as absent", json_kind(&other));
            Ok(None)
        }
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(collect_lenient(items))),
        Value::Null => Ok(None),
        other => {
            warn!("Expected a list, found {}; section treated as empty", json_kind(&other));
            Ok(None)
        }
    }
}

/// Strings pass through; numbers and booleans are stringified; anything else is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items.into_iter().filter_map(scalar_text).collect())),
        Value::String(s) => Ok(Some(s.split(',').map(str::to_string).collect())),
        _ => Ok(None),
    }
}

/// A stack may come back as a list of technologies; join it for display.
fn lenient_stack<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(scalar_text).collect();
            Ok(Some(parts.join(", ")))
        }
        other => Ok(scalar_text(other)),
    }
}

fn collect_lenient<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Dropping malformed list entry: {e}");
                None
            }
        })
        .collect()
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
