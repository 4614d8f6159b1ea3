pub mod config;
pub mod marketplace;
pub mod skills;

pub use config::Config;
pub use marketplace::{MarketplaceSync, SyncError, SyncReport, SyncResult, synchronize};
pub use skills::{QualityReport, ValidationSummary, check_skill_file, discover_skill_dirs};
