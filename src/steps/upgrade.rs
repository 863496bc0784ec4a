// file: src/steps/upgrade.rs
// version: 1.0.0
// guid: f2a3b4c5-d6e7-4890-1234-ef6789012345

//! System package index refresh and full upgrade

use super::{completed, ProvisionStep, StepOutcome};
use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use tracing::info;

/// Refresh the package index and upgrade every installed package.
///
/// This is the only step besides the privilege guard whose failure is
/// fatal: later package installs presume an up-to-date index.
pub struct UpgradeStep;

#[async_trait]
impl ProvisionStep for UpgradeStep {
    fn name(&self) -> &str {
        "system upgrade"
    }

    fn fatal(&self) -> bool {
        true
    }

    async fn run(
        &self,
        _ctx: &ProvisionContext,
        system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        info!("Refreshing package index");
        system.update_index().await?;

        info!("Upgrading installed packages");
        system.upgrade().await?;

        Ok(completed("system packages upgraded"))
    }
}
