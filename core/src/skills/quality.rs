//! Scores a `SKILL.md` against authoring best practices.
//!
//! The score is out of 10. Six checks inspect the document; the remaining
//! criteria (progressive disclosure, degrees of freedom, dependencies, error
//! handling, testing) cannot be judged from the text and get fixed credit.

use regex::Regex;
use std::sync::LazyLock;

use super::manifest::{FrontMatter, parse_frontmatter};

pub const MAX_SCORE: f64 = 10.0;

const FIXED_CREDIT: f64 = 1.0 + 0.5 + 0.5 + 0.5 + 0.5;
const VAGUE_PHRASES: &[&str] = &["helps with", "tool for", "useful", "handles"];
const SECOND_PERSON: &[&str] = &["you", "your", "i ", "i'm"];
const GENERIC_NAMES: &[&str] = &["helper", "utils", "tool", "skill"];

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\w*\n").unwrap());
static TIME_SENSITIVE: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap(),
        Regex::new(r"(?i)last updated").unwrap(),
        Regex::new(r"(?i)as of \d{4}").unwrap(),
    ]
});

#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub score: f64,
    pub issues: Vec<String>,
}

impl QualityReport {
    pub fn passes(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

struct Check {
    score: f64,
    issues: Vec<String>,
}

impl Check {
    fn new(score: f64) -> Self {
        Self {
            score,
            issues: vec![],
        }
    }

    fn issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }
}

pub fn score_skill(content: &str) -> QualityReport {
    let frontmatter = parse_frontmatter(content);

    let checks = [
        ("Description", check_description(&frontmatter)),
        ("Name", check_name(&frontmatter)),
        ("Conciseness", check_conciseness(content)),
        ("Examples", check_examples(content)),
        ("Structure", check_structure(content)),
        ("Anti-patterns", check_antipatterns(content)),
    ];

    let mut total = FIXED_CREDIT;
    let mut issues = vec![];

    for (name, check) in checks {
        total += check.score;
        issues.extend(check.issues.into_iter().map(|i| format!("{}: {}", name, i)));
    }

    QualityReport {
        score: (total * 10.0).round_ties_even() / 10.0,
        issues,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn check_description(frontmatter: &FrontMatter) -> Check {
    let Some(desc) = non_empty(&frontmatter.description) else {
        return Check::new(0.0).issue("Missing description");
    };

    let lower = desc.to_lowercase();
    let mut check = Check::new(0.0);

    if desc.chars().count() < 50 {
        check = check.issue("Description too short (< 50 chars)");
    } else {
        check.score += 0.5;
    }

    if VAGUE_PHRASES.iter().any(|p| lower.contains(p)) {
        check = check.issue("Description contains vague phrases");
    } else {
        check.score += 0.5;
    }

    if lower.contains("when ") || lower.contains("use when") {
        check.score += 0.5;
    } else {
        check = check.issue("Description missing 'when to use' guidance");
    }

    if SECOND_PERSON.iter().any(|w| lower.contains(w)) {
        check = check.issue("Description should be third person");
    } else {
        check.score += 0.5;
    }

    check
}

fn check_name(frontmatter: &FrontMatter) -> Check {
    let Some(name) = non_empty(&frontmatter.name) else {
        return Check::new(0.0).issue("Missing name");
    };

    let mut check = Check::new(0.0);

    if name == name.to_lowercase() && name.contains('-') {
        check.score += 0.25;
    } else {
        check = check.issue("Name should be lowercase-with-hyphens");
    }

    if GENERIC_NAMES.contains(&name) {
        check = check.issue("Name too generic");
    } else {
        check.score += 0.25;
    }

    check
}

fn check_conciseness(content: &str) -> Check {
    let lines = content.matches('\n').count();

    match lines {
        0..300 => Check::new(1.5),
        300..500 => Check::new(1.0),
        500..800 => {
            Check::new(0.5).issue(format!("SKILL.md is {} lines (recommend <500)", lines))
        }
        _ => Check::new(0.0).issue(format!("SKILL.md is {} lines (way over 500 limit)", lines)),
    }
}

fn check_examples(content: &str) -> Check {
    let code_blocks = CODE_FENCE.find_iter(content).count();

    match code_blocks {
        0 => Check::new(0.0).issue("No code examples found"),
        1..3 => Check::new(0.5).issue(format!(
            "Only {} code examples (recommend 5+)",
            code_blocks
        )),
        _ => Check::new(1.0),
    }
}

fn check_structure(content: &str) -> Check {
    let mut check = Check::new(1.0);

    if !content.contains("## Overview") && !content.contains("## What") {
        check = check.issue("Missing overview section");
        check.score -= 0.3;
    }

    if !content.contains("## Usage") && !content.contains("## How") {
        check = check.issue("Missing usage section");
        check.score -= 0.3;
    }

    if content.contains('\\') && content.contains("C:\\") {
        check = check.issue("Contains Windows-style paths (use Unix /)");
        check.score -= 0.4;
    }

    check.score = check.score.max(0.0);
    check
}

fn check_antipatterns(content: &str) -> Check {
    let mut check = Check::new(1.0);

    if TIME_SENSITIVE.iter().any(|re| re.is_match(content)) {
        check = check.issue("Contains time-sensitive information");
        check.score -= 0.5;
    }

    let mentions_skill = content.contains("skill") || content.contains("Skill");
    let mentions_plugin = content.contains("plugin") || content.contains("Plugin");
    if mentions_skill && mentions_plugin {
        check = check.issue("Inconsistent terminology (skill vs plugin)");
        check.score -= 0.5;
    }

    check.score = check.score.max(0.0);
    check
}
