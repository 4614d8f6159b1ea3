use anyhow::Result;
use console::style;
use skillkit_core::config::Config;
use skillkit_core::marketplace::{EntryOutcome, MarketplaceSync, SyncError, SyncResult};
use std::path::Path;

pub fn run_sync(root: &Path, config: &Config) -> Result<()> {
    let sync = MarketplaceSync::from_config(root, config);

    println!(
        "{} Syncing {} with package versions...",
        style("→").cyan(),
        sync.manifest_path().display()
    );
    println!();

    let report = match sync.run_with(print_entry) {
        Ok(report) => report,
        Err(e) => {
            print_error(&e, &config.marketplace.descriptor);
            std::process::exit(1);
        }
    };

    println!();
    match report.result() {
        SyncResult::Unchanged => {
            println!("{} All versions already in sync!", style("✓").green().bold());
        }
        SyncResult::Updated(count) => {
            println!(
                "{} {} updated ({} {})",
                style("✓").green().bold(),
                report.manifest_path.display(),
                count,
                if count == 1 { "plugin" } else { "plugins" }
            );
        }
    }

    Ok(())
}

fn print_entry(entry: &EntryOutcome) {
    match entry {
        EntryOutcome::Skipped { name } => {
            println!(
                "  {} {}: Skipping non-local source",
                style("⊘").dim(),
                name
            );
        }
        EntryOutcome::InSync { name, version } => {
            println!("  {} {}: {} (unchanged)", style("•").dim(), name, version);
        }
        EntryOutcome::Updated { name, from, to } => {
            println!(
                "  {} {}: {} → {}",
                style("✓").green(),
                style(name).white().bold(),
                from.as_deref().unwrap_or("(none)"),
                to
            );
        }
    }
}

fn print_error(error: &SyncError, descriptor: &str) {
    eprintln!("  {} {}", style("✗").red().bold(), error);
    if error.plugin().is_some() {
        eprintln!("    Ensure {} exists with a version field.", descriptor);
    }
}
