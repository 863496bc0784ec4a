// file: src/steps/overlays.rs
// version: 1.0.0
// guid: b4c5d6e7-f8a9-4012-3456-017890123457

//! Configuration-file overlays: MOTD copy and per-user rc appends
//!
//! Overlay sources are opaque byte blobs; nothing is parsed or templated.
//! The rc appends are deliberately not idempotent: running the agent twice
//! duplicates the appended fragment, matching its one-run-per-machine use.

use super::{completed, failed, fs_utils, skipped, ProvisionStep, StepOutcome};
use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Copy the MOTD overlay over `/etc/motd`, replacing it entirely
pub struct MotdStep {
    destination: PathBuf,
}

impl MotdStep {
    pub fn new() -> Self {
        Self {
            destination: PathBuf::from("/etc/motd"),
        }
    }

    /// Override the destination path (used by tests)
    pub fn with_destination(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

impl Default for MotdStep {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvisionStep for MotdStep {
    fn name(&self) -> &str {
        "motd overlay"
    }

    async fn run(
        &self,
        ctx: &ProvisionContext,
        _system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        let source = ctx.config_dir.join("motd.txt");
        if !fs_utils::file_exists(&source).await {
            return Ok(skipped(format!("{} not found", source.display())));
        }

        match tokio::fs::copy(&source, &self.destination).await {
            Ok(_) => Ok(completed(format!(
                "copied {} to {}",
                source.display(),
                self.destination.display()
            ))),
            Err(e) => Ok(failed(format!(
                "could not copy {} to {}: {}",
                source.display(),
                self.destination.display(),
                e
            ))),
        }
    }
}

/// Append an overlay fragment to a dotfile in the target user's home and
/// hand ownership of the result to that user
pub struct RcAppendStep {
    step_name: &'static str,
    source_name: &'static str,
    target_name: &'static str,
}

impl RcAppendStep {
    /// Shell rc fragment: `config/bashrc.append` onto `~/.bashrc`
    pub fn bashrc() -> Self {
        Self {
            step_name: "bashrc append",
            source_name: "bashrc.append",
            target_name: ".bashrc",
        }
    }

    /// Editor rc fragment: `config/nanorc.append` onto `~/.nanorc`
    pub fn nanorc() -> Self {
        Self {
            step_name: "nanorc append",
            source_name: "nanorc.append",
            target_name: ".nanorc",
        }
    }
}

#[async_trait]
impl ProvisionStep for RcAppendStep {
    fn name(&self) -> &str {
        self.step_name
    }

    async fn run(
        &self,
        ctx: &ProvisionContext,
        _system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        let source = ctx.config_dir.join(self.source_name);
        if !fs_utils::file_exists(&source).await {
            return Ok(skipped(format!("{} not found", source.display())));
        }

        let target = ctx.home_dir.join(self.target_name);
        let content = tokio::fs::read(&source).await?;

        if let Err(e) = fs_utils::append_to_file(&target, &content).await {
            return Ok(failed(e.to_string()));
        }

        // The file may have just been created by root; give it back.
        if let Err(e) = fs_utils::chown_recursive(&ctx.username, &target).await {
            return Ok(failed(format!(
                "appended to {} but could not set ownership: {}",
                target.display(),
                e
            )));
        }

        Ok(completed(format!(
            "appended {} to {}",
            source.display(),
            target.display()
        )))
    }
}
