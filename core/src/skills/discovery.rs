use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the skill directories directly under `root`.
///
/// Hidden directories and names in `exclude` are left out. The result is
/// sorted by name.
pub fn discover_skill_dirs(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read skills root: {}", root.display()))?;

    let mut dirs = Vec::new();
    let mut skipped = 0;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        if is_excluded(&name, exclude) {
            tracing::debug!("Skipping excluded directory: {}", name);
            skipped += 1;
            continue;
        }

        dirs.push(path);
    }

    dirs.sort();

    tracing::info!(
        found = dirs.len(),
        skipped,
        path = %root.display(),
        "Skill directories discovered"
    );

    Ok(dirs)
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    name.starts_with('.') || exclude.iter().any(|e| e == name)
}
