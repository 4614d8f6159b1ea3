pub mod discovery;
pub mod manifest;
pub mod quality;
pub mod validation;

pub use discovery::discover_skill_dirs;
pub use manifest::{
    FrontMatter, SKILL_FILE, SkillDocument, load_skill_document, parse_frontmatter,
};
pub use quality::{QualityReport, score_skill};
pub use validation::{
    CommandValidator, SkillValidator, ValidationEvent, ValidationOutcome, ValidationSummary,
    validate_all, validate_all_with,
};

use anyhow::Result;
use std::path::Path;

/// Loads and scores the `SKILL.md` at `path` (or inside it, for a directory).
pub fn check_skill_file(path: &Path) -> Result<(SkillDocument, QualityReport)> {
    let document = load_skill_document(path)?;
    let report = score_skill(&document.content);
    Ok((document, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn checks_skill_in_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(SKILL_FILE),
            "---\nname: csv-tools\ndescription: Short\n---\n## Overview\n## Usage\n",
        )
        .unwrap();

        let (document, report) = check_skill_file(tmp.path()).unwrap();
        assert_eq!(document.frontmatter.name.as_deref(), Some("csv-tools"));
        assert!(report.score < quality::MAX_SCORE);
        assert!(
            report
                .issues
                .contains(&"Examples: No code examples found".to_string())
        );
    }

    #[test]
    fn crlf_fences_are_counted() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(SKILL_FILE),
            "---\r\nname: crlf-tools\r\n---\r\n## Overview\r\n## Usage\r\n\
             ```sh\r\na\r\n```\r\n```sh\r\nb\r\n```\r\n",
        )
        .unwrap();

        let (_, report) = check_skill_file(tmp.path()).unwrap();
        assert!(!report.issues.iter().any(|i| i.starts_with("Examples:")));
        // Only the missing description costs points.
        assert_eq!(report.score, 8.0);
    }

    #[test]
    fn missing_skill_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = check_skill_file(&tmp.path().join("SKILL.md")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
