use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::ValidationConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub skill: String,
    pub passed: bool,
    pub output: String,
}

impl ValidationOutcome {
    pub fn passed(skill: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            passed: true,
            output: output.into(),
        }
    }

    pub fn failed(skill: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            passed: false,
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub outcomes: Vec<ValidationOutcome>,
}

impl ValidationSummary {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ValidationOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Checks one skill directory.
#[async_trait]
pub trait SkillValidator: Send + Sync {
    async fn validate(&self, skill_dir: &Path) -> ValidationOutcome;
}

/// Runs an external program with the skill's absolute path as its last argument.
pub struct CommandValidator {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandValidator {
    pub fn new(program: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &ValidationConfig, working_dir: impl AsRef<Path>) -> Self {
        Self::new(config.program.clone(), working_dir).with_args(config.args.clone())
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
impl SkillValidator for CommandValidator {
    async fn validate(&self, skill_dir: &Path) -> ValidationOutcome {
        let skill = skill_name(skill_dir);
        let skill_path =
            std::path::absolute(skill_dir).unwrap_or_else(|_| skill_dir.to_path_buf());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&skill_path)
            .current_dir(&self.working_dir)
            .output()
            .await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    ValidationOutcome::passed(skill, stdout)
                } else {
                    let error = if !stdout.trim().is_empty() {
                        stdout
                    } else if !stderr.trim().is_empty() {
                        stderr
                    } else {
                        format!("Validator exited with status: {}", output.status)
                    };
                    ValidationOutcome::failed(skill, error)
                }
            }
            Err(e) => ValidationOutcome::failed(
                skill,
                format!("Failed to run validator '{}': {}", self.program, e),
            ),
        }
    }
}

/// Progress of a [`validate_all_with`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationEvent<'a> {
    Started(&'a Path),
    Finished(&'a ValidationOutcome),
}

/// Validates each directory in turn; a failure does not stop the run.
pub async fn validate_all(
    validator: &dyn SkillValidator,
    dirs: &[PathBuf],
) -> ValidationSummary {
    validate_all_with(validator, dirs, |_| {}).await
}

/// Like [`validate_all`], reporting each directory as it starts and finishes.
pub async fn validate_all_with(
    validator: &dyn SkillValidator,
    dirs: &[PathBuf],
    mut on_event: impl FnMut(ValidationEvent<'_>),
) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    for dir in dirs {
        on_event(ValidationEvent::Started(dir));
        let outcome = validator.validate(dir).await;
        if outcome.passed {
            tracing::debug!(skill = %outcome.skill, "Validation passed");
        } else {
            tracing::warn!(skill = %outcome.skill, "Validation failed");
        }
        on_event(ValidationEvent::Finished(&outcome));
        summary.outcomes.push(outcome);
    }

    summary
}

fn skill_name(skill_dir: &Path) -> String {
    skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| skill_dir.display().to_string())
}
