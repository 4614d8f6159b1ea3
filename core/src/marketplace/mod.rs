//! Keeps `.claude-plugin/marketplace.json` in step with the versions declared
//! by each local plugin's `package.json`.

pub mod manifest;
pub mod sync;

pub use manifest::{MarketplaceManifest, PackageManifest, PluginEntry, PluginSource};
pub use sync::{
    EntryOutcome, MarketplaceSync, SyncError, SyncReport, SyncResult, repository_root,
    synchronize,
};
