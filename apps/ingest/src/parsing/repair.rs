//! JSON repair. Patches the syntax defects language models commonly emit.
//!
//! The patches run in a fixed order; later ones assume the quote
//! normalization done by earlier ones:
//! 1. drop code fences and everything before the first `{`
//!    (and trailing commentary after a balanced object)
//! 2. smart quotes and backticks → `"`
//! 3. `"key':` → `"key":`
//! 4. missing comma between `}` / `]` and the next quoted key
//! 5. trailing commas before `}` / `]`
//! 6. an unterminated final string value becomes `"Not Specified"`
//! 7. brace counts are balanced

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::NOT_SPECIFIED;

#[derive(Debug, Error, PartialEq)]
pub enum RepairError {
    #[error("no JSON object found in model output")]
    NoJsonFound,
}

static KEY_QUOTE_TYPO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"\n]+)':"#).expect("Invalid key quote regex"));
static MISSING_COMMA_AFTER_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\}\s*"([A-Za-z])"#).expect("Invalid object comma regex"));
static MISSING_COMMA_AFTER_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\]\s*"([A-Za-z])"#).expect("Invalid array comma regex"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("Invalid trailing comma regex"));
static UNTERMINATED_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"":\s*"([^"]*)$"#).expect("Invalid unterminated value regex"));

/// Turns a raw model response into text that should parse as JSON.
///
/// Fails only when the response contains no `{` at all. The result always has
/// equal counts of `{` and `}`.
pub fn repair(raw: &str) -> Result<String, RepairError> {
    let text = isolate_object(raw)?;

    let text = text
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('`', "\"");
    let text = KEY_QUOTE_TYPO.replace_all(&text, "\"$1\":");
    let text = MISSING_COMMA_AFTER_OBJECT.replace_all(&text, "},\n\"$1");
    let text = MISSING_COMMA_AFTER_ARRAY.replace_all(&text, "],\n\"$1");
    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = text.trim_end();
    let text = UNTERMINATED_VALUE.replace(text, format!("\": \"{NOT_SPECIFIED}\""));

    Ok(balance_braces(&text).trim().to_string())
}

/// Slices from the first `{`, removing markdown fences first. Text after the
/// last `}` is dropped when the object up to it is already balanced.
fn isolate_object(raw: &str) -> Result<&str, RepairError> {
    let unfenced = strip_json_fences(raw);
    let start = unfenced.find('{').ok_or(RepairError::NoJsonFound)?;
    let text = &unfenced[start..];

    if let Some(end) = text.rfind('}') {
        let candidate = &text[..=end];
        if candidate.matches('{').count() == candidate.matches('}').count() {
            return Ok(candidate);
        }
    }
    Ok(text)
}

/// Strips a leading ```json / ``` fence and its closing fence, if present.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };
    if text.find('{').is_some_and(|brace| brace < open) {
        return text;
    }
    let after = &text[open + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    match after.rfind("```") {
        Some(close) => after[..close].trim(),
        None => after.trim(),
    }
}

/// Appends missing `}` or removes surplus trailing `}` so the counts match.
fn balance_braces(text: &str) -> String {
    let open = text.matches('{').count();
    let close = text.matches('}').count();
    let mut out = text.to_string();
    if close < open {
        out.push_str(&"}".repeat(open - close));
    } else if close > open {
        let mut surplus = close - open;
        while surplus > 0 {
            match out.rfind('}') {
                Some(idx) => {
                    out.remove(idx);
                    surplus -= 1;
                }
                None => break,
            }
        }
    }
    out
}
