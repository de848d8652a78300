// Prompt for turning raw resume text into the structured JSON schema.
// The template is a value built once at startup and passed to the parser;
// nothing mutates it afterwards.

const RESUME_PLACEHOLDER: &str = "{resume_text}";

pub const RESUME_PARSE_PROMPT: &str = r#"You are a strict JSON-only resume parser.
- Respond with one syntactically valid JSON object and nothing else: no markdown, commentary, or explanations.
- Begin with '{' and end with '}'. Wrap every key and string value in double quotes.
- Always return every top-level key below, even when empty. Use "Not Specified" for missing values.

EMPLOYMENT vs PROJECTS vs EDUCATION
- "Employment History" lists every employer the candidate worked for, including internships and short contracts.
  Extract Role, Duration, and a short Description of high-level duties only.
- Do not merge different employers. Distinguish employers from the clients they served.
- Put detailed project narratives (titles, stack, outcomes) under "Projects", not inside role descriptions.
- Never list universities, colleges, schools, or institutes as employers. Degrees and schooling go only under "Education".
- If there is no employment information, leave "Employment History" as {}.
- Resume content may be bullets, inline text, or tables; normalize accordingly.

SCHEMA
{
  "Personal Details": {"Full Name": "...", "Email": "...", "Phone": "...", "Location": "..."},
  "Recent Employer": "...",
  "Job Title": "...",
  "Professional Summary": "...",
  "Total Years of Experience": "...",
  "Employment History": {
    "Company A": [{"Role": "...", "Duration": "...", "Description": "..."}]
  },
  "Skills": {"Hard Skill": ["..."], "Soft Skill": ["..."]},
  "Certifications": [{"Certification Name": "...", "Field": "...", "Date": "..."}],
  "Education": [{"Degree": "...", "Institution": "...", "Duration": "..."}],
  "Languages": ["..."],
  "Projects": [{"Title": "...", "Stack": "...", "Description": "..."}]
}

FIELD NOTES
- "Recent Employer": the most recent employer (never a client). "Job Title": the most recent designation.
- "Professional Summary": extract it if present; otherwise write 2-4 lines covering experience, technologies, and domain.
- Durations look like "Jan 2019 – Mar 2022", "2018 – Present", or "03/2021".
- Hard skills are technologies, frameworks, and tools. Soft skills are interpersonal abilities.

RESUME
<<<RESUME_START>>>
{resume_text}
<<<RESUME_END>>>

Respond ONLY with the JSON object."#;

/// Immutable prompt template with a single resume-text placeholder.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, resume_text: &str) -> String {
        self.template.replace(RESUME_PLACEHOLDER, resume_text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(RESUME_PARSE_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_resume_text() {
        let prompt = PromptTemplate::default().render("Jane Doe\nRust engineer");
        assert!(prompt.contains("<<<RESUME_START>>>\nJane Doe\nRust engineer\n<<<RESUME_END>>>"));
        assert!(!prompt.contains(RESUME_PLACEHOLDER));
    }

    #[test]
    fn test_render_leaves_template_untouched() {
        let template = PromptTemplate::new("before {resume_text} after");
        assert_eq!(template.render("x"), "before x after");
        assert_eq!(template.render("y"), "before y after");
    }
}
