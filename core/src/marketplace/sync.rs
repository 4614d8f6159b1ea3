use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{MarketplaceManifest, PackageManifest, PluginEntry, PluginSource};
use crate::config::Config;

const PLUGIN_DIR: &str = ".claude-plugin";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to read marketplace manifest {}: {source}", .path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed marketplace manifest {}: {reason}", .path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("failed to read {plugin}/{}: {reason}", .path.file_name().unwrap_or_default().to_string_lossy())]
    Descriptor {
        plugin: String,
        path: PathBuf,
        reason: String,
    },

    #[error("{plugin}: {} missing version field", .path.display())]
    MissingVersion { plugin: String, path: PathBuf },

    #[error("failed to write marketplace manifest {}: {reason}", .path.display())]
    WriteManifest { path: PathBuf, reason: String },
}

impl SyncError {
    /// The marketplace entry the error is about, if any.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            SyncError::Descriptor { plugin, .. } | SyncError::MissingVersion { plugin, .. } => {
                Some(plugin)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResult {
    Unchanged,
    Updated(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Skipped { name: String },
    InSync { name: String, version: String },
    Updated {
        name: String,
        from: Option<String>,
        to: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub manifest_path: PathBuf,
    pub entries: Vec<EntryOutcome>,
}

impl SyncReport {
    pub fn updated(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Updated { .. }))
            .count()
    }

    pub fn result(&self) -> SyncResult {
        match self.updated() {
            0 => SyncResult::Unchanged,
            n => SyncResult::Updated(n),
        }
    }
}

/// Copies package versions into the marketplace manifest.
pub struct MarketplaceSync {
    root: PathBuf,
    manifest_path: PathBuf,
    descriptor: String,
}

impl MarketplaceSync {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let config = Config::default();
        Self {
            manifest_path: config.manifest_path(&root),
            descriptor: config.marketplace.descriptor,
            root,
        }
    }

    pub fn from_config(root: impl AsRef<Path>, config: &Config) -> Self {
        let root = root.as_ref();
        Self::new(root)
            .with_manifest_path(config.manifest_path(root))
            .with_descriptor(config.marketplace.descriptor.clone())
    }

    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn run(&self) -> Result<SyncReport, SyncError> {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_entry` as soon as each entry is decided.
    pub fn run_with(
        &self,
        mut on_entry: impl FnMut(&EntryOutcome),
    ) -> Result<SyncReport, SyncError> {
        let path = &self.manifest_path;
        let content = fs::read_to_string(path).map_err(|source| SyncError::ReadManifest {
            path: path.clone(),
            source,
        })?;
        let mut manifest =
            MarketplaceManifest::parse(&content).map_err(|reason| SyncError::MalformedManifest {
                path: path.clone(),
                reason,
            })?;

        debug!(
            plugins = manifest.len(),
            path = %path.display(),
            "Loaded marketplace manifest"
        );

        let mut entries = Vec::with_capacity(manifest.len());

        for mut entry in manifest.plugins_mut() {
            let outcome = self.sync_entry(&mut entry)?;
            on_entry(&outcome);
            entries.push(outcome);
        }

        let report = SyncReport {
            manifest_path: path.clone(),
            entries,
        };

        if report.updated() > 0 {
            save_manifest(path, &manifest)?;
            info!(
                updated = report.updated(),
                path = %path.display(),
                "Marketplace manifest written"
            );
        }

        Ok(report)
    }

    fn sync_entry(&self, entry: &mut PluginEntry<'_>) -> Result<EntryOutcome, SyncError> {
        let name = entry.name().to_string();

        let source = match entry.source() {
            PluginSource::Local(source) => source.to_string(),
            PluginSource::Remote => {
                info!(plugin = %name, "Skipping non-local source");
                return Ok(EntryOutcome::Skipped { name });
            }
        };

        let package_path = self.root.join(&source).join(&self.descriptor);
        let package = load_package(&name, &package_path)?;
        let Some(version) = package.version() else {
            return Err(SyncError::MissingVersion {
                plugin: name,
                path: package_path,
            });
        };

        if entry.version() == Some(version) {
            debug!(plugin = %name, version, "Version unchanged");
            return Ok(EntryOutcome::InSync {
                name,
                version: version.to_string(),
            });
        }

        let from = entry.version().map(str::to_string);
        info!(plugin = %name, from = ?from, to = version, "Updating version");
        entry.set_version(version);
        Ok(EntryOutcome::Updated {
            name,
            from,
            to: version.to_string(),
        })
    }
}

/// Synchronizes the manifest at `manifest_path`, resolving sources against the
/// repository root that contains it.
pub fn synchronize(manifest_path: &Path) -> Result<SyncResult, SyncError> {
    MarketplaceSync::new(repository_root(manifest_path))
        .with_manifest_path(manifest_path)
        .run()
        .map(|report| report.result())
}

/// `<root>/.claude-plugin/marketplace.json` resolves to `<root>`; any other
/// location resolves to the manifest's own directory.
pub fn repository_root(manifest_path: &Path) -> PathBuf {
    let parent = manifest_path.parent().unwrap_or(Path::new(""));
    if parent.file_name().is_some_and(|n| n == PLUGIN_DIR) {
        parent.parent().unwrap_or(Path::new("")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

fn load_package(plugin: &str, path: &Path) -> Result<PackageManifest, SyncError> {
    let content = fs::read_to_string(path).map_err(|e| {
        warn!(plugin, path = %path.display(), "Failed to read package manifest: {}", e);
        SyncError::Descriptor {
            plugin: plugin.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    PackageManifest::parse(&content).map_err(|reason| SyncError::Descriptor {
        plugin: plugin.to_string(),
        path: path.to_path_buf(),
        reason,
    })
}

fn save_manifest(path: &Path, manifest: &MarketplaceManifest) -> Result<(), SyncError> {
    let write_error = |reason: String| SyncError::WriteManifest {
        path: path.to_path_buf(),
        reason,
    };

    let content = manifest
        .to_pretty_string()
        .map_err(|e| write_error(e.to_string()))?;

    // Replace the symlink target, not the link itself.
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut temp_name = target.file_name().unwrap_or_default().to_os_string();
    temp_name.push(format!(".{}.tmp", std::process::id()));
    let temp_path = target.with_file_name(temp_name);

    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_error(e.to_string()));
    }

    let replaced = fs::metadata(&target)
        .and_then(|meta| fs::set_permissions(&temp_path, meta.permissions()))
        .and_then(|_| fs::rename(&temp_path, &target));
    if let Err(e) = replaced {
        let _ = fs::remove_file(&temp_path);
        return Err(write_error(e.to_string()));
    }

    Ok(())
}
