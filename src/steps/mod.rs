// file: src/steps/mod.rs
// version: 1.0.0
// guid: e1f2a3b4-c5d6-4789-0123-de5678901234

//! The ordered provisioning step sequence
//!
//! Each step owns its error handling: a missing precondition becomes a
//! `Skipped` outcome, a failed side effect a `Failed` one, and neither
//! stops later steps. Only a step marked fatal propagates its error and
//! aborts the run.

pub mod harden;
pub mod overlays;
pub mod packages;
pub mod ssh_key;
pub mod upgrade;

use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Status of a step execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully
    Completed,

    /// Step was skipped (precondition file missing, operator declined)
    Skipped,

    /// Step failed but the run continues
    Failed,
}

/// Result of executing one provisioning step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub message: String,
}

/// Helper for creating successful step outcomes
pub fn completed(message: impl Into<String>) -> StepOutcome {
    StepOutcome {
        status: StepStatus::Completed,
        message: message.into(),
    }
}

/// Helper for creating skipped step outcomes
pub fn skipped(reason: impl Into<String>) -> StepOutcome {
    StepOutcome {
        status: StepStatus::Skipped,
        message: reason.into(),
    }
}

/// Helper for creating failed step outcomes
pub fn failed(message: impl Into<String>) -> StepOutcome {
    StepOutcome {
        status: StepStatus::Failed,
        message: message.into(),
    }
}

/// Trait for provisioning steps
#[async_trait]
pub trait ProvisionStep: Send + Sync {
    /// Get the name of this step
    fn name(&self) -> &str;

    /// Whether an error from this step aborts the whole run
    fn fatal(&self) -> bool {
        false
    }

    /// Execute the step
    async fn run(
        &self,
        ctx: &ProvisionContext,
        system: &dyn SystemManager,
    ) -> Result<StepOutcome>;
}

/// The fixed provisioning sequence, in execution order
pub fn default_steps() -> Vec<Box<dyn ProvisionStep>> {
    vec![
        Box::new(upgrade::UpgradeStep),
        Box::new(packages::PackageInstallStep),
        Box::new(overlays::MotdStep::new()),
        Box::new(overlays::RcAppendStep::bashrc()),
        Box::new(overlays::RcAppendStep::nanorc()),
        Box::new(ssh_key::SshKeyStep),
        Box::new(harden::HardenSshStep::new()),
    ]
}

/// Execute every step in order, logging each outcome.
///
/// Returns `Err` only when a fatal step fails; recoverable failures are
/// logged and the sequence continues.
pub async fn run_all(
    steps: &[Box<dyn ProvisionStep>],
    ctx: &ProvisionContext,
    system: &dyn SystemManager,
) -> Result<()> {
    let total = steps.len();

    for (index, step) in steps.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, total, step.name());

        match step.run(ctx, system).await {
            Ok(outcome) => match outcome.status {
                StepStatus::Completed => info!("{}: {}", step.name(), outcome.message),
                StepStatus::Skipped => info!("{}: skipped - {}", step.name(), outcome.message),
                StepStatus::Failed => warn!("{}: failed - {}", step.name(), outcome.message),
            },
            Err(e) if step.fatal() => {
                error!("{}: fatal error - {}", step.name(), e);
                return Err(e);
            }
            Err(e) => {
                warn!("{}: error - {} (continuing)", step.name(), e);
            }
        }
    }

    Ok(())
}

/// Shared filesystem helpers used by the step implementations
pub(crate) mod fs_utils {
    use anyhow::Context;
    use std::path::Path;

    /// Check if a path exists
    pub async fn file_exists(path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Append content to a file, creating it if absent
    pub async fn append_to_file(path: &Path, content: &[u8]) -> anyhow::Result<()> {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open {} for append", path.display()))?;
        file.write_all(content)
            .await
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        file.flush().await?;
        Ok(())
    }

    /// Recursively set ownership of a path to `user:user`
    pub async fn chown_recursive(user: &str, path: &Path) -> anyhow::Result<()> {
        let owner = format!("{}:{}", user, user);
        let output = tokio::process::Command::new("chown")
            .arg("-R")
            .arg(&owner)
            .arg(path)
            .output()
            .await
            .with_context(|| format!("Failed to run chown on {}", path.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "chown {} {} failed: {}",
                owner,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    /// Set the unix mode bits of a path
    pub async fn set_mode(path: &Path, mode: u32) -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let perms = std::fs::Permissions::from_mode(mode);
        tokio::fs::set_permissions(path, perms)
            .await
            .with_context(|| format!("Failed to set mode {:o} on {}", mode, path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_helpers() {
        let ok = completed("done");
        assert_eq!(ok.status, StepStatus::Completed);
        assert_eq!(ok.message, "done");

        let skip = skipped("file not found");
        assert_eq!(skip.status, StepStatus::Skipped);

        let fail = failed("boom");
        assert_eq!(fail.status, StepStatus::Failed);
    }

    #[test]
    fn test_default_steps_order() {
        let steps = default_steps();
        let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "system upgrade",
                "package installation",
                "motd overlay",
                "bashrc append",
                "nanorc append",
                "ssh key registration",
                "sshd hardening",
            ]
        );
        // Only the upgrade step may abort the run.
        assert!(steps[0].fatal());
        assert!(steps[1..].iter().all(|s| !s.fatal()));
    }

    #[tokio::test]
    async fn test_append_to_file_creates_and_appends() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("target");

        fs_utils::append_to_file(&path, b"one\n").await.unwrap();
        fs_utils::append_to_file(&path, b"two\n").await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "one\ntwo\n");
    }
}
