use std::collections::HashSet;

use crate::models::raw::RawProject;
use crate::models::{Employer, EmploymentHistory, Project, Role, NOT_SPECIFIED};
use crate::reconcile::employment::MAX_DESCRIPTION_CHARS;
use crate::reconcile::normalize::normalize;

/// Verbs that mark a description line as a project narrative rather than a duty.
/// Matched as case-insensitive substrings.
const PROJECT_VERBS: &[&str] = &[
    "developed",
    "designed",
    "implemented",
    "built",
    "engineered",
    "created",
    "led",
    "worked on",
    "integrated",
    "optimized",
];

/// Lines at or under this many characters stay with the role.
const MIN_PROJECT_LINE_CHARS: usize = 20;

/// Keeps projects with both a title and a description; a missing stack
/// becomes the sentinel.
pub fn clean_projects(raw: Vec<RawProject>) -> Vec<Project> {
    raw.into_iter()
        .filter_map(|p| {
            let title = p.title.unwrap_or_default().trim().to_string();
            let description = p.description.unwrap_or_default().trim().to_string();
            if title.is_empty() || description.is_empty() {
                return None;
            }
            let stack = p.stack.unwrap_or_default().trim().to_string();
            Some(Project {
                title,
                stack: if stack.is_empty() {
                    NOT_SPECIFIED.to_string()
                } else {
                    stack
                },
                description,
            })
        })
        .collect()
}

/// Normalized titles used to drop roles that merely restate a project.
pub fn project_titles(projects: &[Project]) -> HashSet<String> {
    projects
        .iter()
        .map(|p| normalize(&p.title))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Moves project narratives out of role descriptions.
///
/// Each description is split into lines (on line breaks when present,
/// otherwise on `.` and `;`). A line longer than 20 characters that contains a
/// project verb becomes a `Project` titled "`<Role> at <Employer>`". The
/// remaining lines are cut into sentences and rejoined with ". ", keeping whole
/// sentences up to the description limit; the sentinel replaces an empty result.
pub fn split_projects(history: EmploymentHistory) -> (EmploymentHistory, Vec<Project>) {
    let mut extracted = Vec::new();

    let employers = history
        .into_inner()
        .into_iter()
        .map(|employer| {
            let roles = employer
                .roles
                .into_iter()
                .map(|role| {
                    let (kept, projects) = partition_description(&role, &employer.name);
                    extracted.extend(projects);
                    Role {
                        description: kept,
                        ..role
                    }
                })
                .collect();
            Employer {
                name: employer.name,
                roles,
            }
        })
        .collect();

    (EmploymentHistory::new(employers), extracted)
}

fn partition_description(role: &Role, employer: &str) -> (String, Vec<Project>) {
    let description = role.description.trim();
    let lines: Vec<&str> = if description.contains('\n') {
        description.split('\n').collect()
    } else {
        description.split(['.', ';']).collect()
    };

    let mut projects = Vec::new();
    let mut duties = Vec::new();
    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        if is_project_line(line) {
            projects.push(Project {
                title: format!("{} at {}", role.role, employer),
                stack: NOT_SPECIFIED.to_string(),
                description: line.to_string(),
            });
        } else {
            duties.push(line);
        }
    }

    let kept = join_sentences(&duties);
    let kept = if kept.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        kept
    };
    (kept, projects)
}

/// Output splits back into the same sentences, so a second pass is a no-op.
fn join_sentences(lines: &[&str]) -> String {
    let mut joined = String::new();
    let mut chars = 0;
    let sentences = lines
        .iter()
        .flat_map(|line| line.split(['.', ';']))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    for sentence in sentences {
        let len = sentence.chars().count();
        let separator = if joined.is_empty() { 0 } else { 2 };
        if chars + separator + len > MAX_DESCRIPTION_CHARS {
            break;
        }
        if separator > 0 {
            joined.push_str(". ");
        }
        joined.push_str(sentence);
        chars += separator + len;
    }
    joined
}

fn is_project_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.chars().count() > MIN_PROJECT_LINE_CHARS && PROJECT_VERBS.iter().any(|v| lower.contains(v))
}

/// Drops projects whose normalized title + description was already seen.
pub fn dedup_projects(projects: Vec<Project>) -> Vec<Project> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|p| seen.insert(normalize(&format!("{} {}", p.title, p.description))))
        .collect()
}
