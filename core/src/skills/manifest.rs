use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SKILL_FILE: &str = "SKILL.md";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SkillDocument {
    pub path: PathBuf,
    pub content: String,
    pub frontmatter: FrontMatter,
}

/// Accepts either a skill directory or the `SKILL.md` inside it.
pub fn skill_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(SKILL_FILE)
    } else {
        path.to_path_buf()
    }
}

pub fn load_skill_document(path: &Path) -> Result<SkillDocument> {
    let md_path = skill_file(path);

    if !md_path.exists() {
        anyhow::bail!("{} not found", md_path.display());
    }

    let content = fs::read_to_string(&md_path)
        .with_context(|| format!("Failed to read {}", md_path.display()))?;
    let content = normalize_newlines(&content);
    let frontmatter = parse_frontmatter(&content);

    Ok(SkillDocument {
        path: md_path,
        content,
        frontmatter,
    })
}

/// Converts CRLF and lone CR line endings to `\n`.
pub fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// The text between a leading `---` line and the next `---` line.
pub fn frontmatter_block(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() >= 3 && lines[0].trim() == "---" {
        let closing_index = lines[1..].iter().position(|l| l.trim() == "---");
        if let Some(pos) = closing_index
            && pos > 0
        {
            return Some(lines[1..=pos].join("\n"));
        }
    }

    None
}

/// Parses the frontmatter as YAML, falling back to plain `key: value` lines
/// when the block is not valid YAML.
pub fn parse_frontmatter(content: &str) -> FrontMatter {
    let Some(block) = frontmatter_block(content) else {
        return FrontMatter::default();
    };

    if let Ok(frontmatter) = serde_yaml::from_str::<FrontMatter>(&block) {
        return frontmatter;
    }

    let mut frontmatter = FrontMatter::default();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = Some(value.trim().to_string());
        match key.trim() {
            "name" => frontmatter.name = value,
            "description" => frontmatter.description = value,
            _ => {}
        }
    }
    frontmatter
}
