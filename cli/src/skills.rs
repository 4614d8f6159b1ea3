use anyhow::Result;
use console::style;
use skillkit_core::config::Config;
use skillkit_core::skills::{self, CommandValidator, ValidationEvent};
use std::path::Path;

pub async fn run_validate(root: &Path, config: &Config) -> Result<()> {
    let dirs = skills::discover_skill_dirs(root, &config.validation.exclude)?;

    println!(
        "{} Validating {} skills...",
        style("→").cyan(),
        dirs.len()
    );
    println!();

    let validator = CommandValidator::from_config(&config.validation, root);
    let summary = skills::validate_all_with(&validator, &dirs, print_event).await;

    println!();
    if !summary.all_passed() {
        let failed = summary.failed().count();
        eprintln!(
            "{} {} of {} skills failed validation",
            style("✗").red().bold(),
            failed,
            summary.outcomes.len()
        );
        anyhow::bail!("Some skills failed validation");
    }

    println!(
        "{} All skills validated successfully!",
        style("✓").green().bold()
    );
    Ok(())
}

fn print_event(event: ValidationEvent<'_>) {
    match event {
        ValidationEvent::Started(dir) => {
            let name = dir.file_name().unwrap_or(dir.as_os_str());
            println!("Validating {}...", name.to_string_lossy());
        }
        ValidationEvent::Finished(outcome) if outcome.passed => {
            println!("{} {}", style("✓").green(), style(&outcome.skill).white().bold());
            let output = outcome.output.trim();
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        ValidationEvent::Finished(outcome) => {
            eprintln!(
                "{} {} validation failed:",
                style("✗").red().bold(),
                outcome.skill
            );
            eprintln!("{}", outcome.output.trim());
        }
    }
}

fn format_score(score: f64) -> String {
    format!("{:.1}/10", score)
}

pub fn run_quality(path: &Path, config: &Config) -> Result<()> {
    let (document, report) = skills::check_skill_file(path)?;

    println!("{}", format_score(report.score));

    if !report.issues.is_empty() {
        println!();
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
    }

    let threshold = config.quality.threshold;
    if !report.passes(threshold) {
        anyhow::bail!(
            "{} scored {:.1} (minimum {:.1})",
            document.path.display(),
            report.score,
            threshold
        );
    }

    Ok(())
}
