// file: src/cli/commands.rs
// version: 1.0.0
// guid: b8c9d0e1-f2a3-4456-7890-ab2345678901

//! The single provisioning command

use crate::{
    cli::args::Cli,
    config::ProvisionContext,
    steps,
    system::{self, AptSystem},
    ProvisionError, Result,
};
use tracing::{error, info};

/// Run the full provisioning sequence.
///
/// Aborts before touching anything outside the log directory when the
/// process does not hold superuser privileges; otherwise executes the
/// fixed step list and returns `Ok` even when recoverable steps failed.
pub async fn run(cli: Cli) -> Result<()> {
    if !system::running_as_root() {
        error!("This program must be run with superuser privileges (try sudo)");
        return Err(ProvisionError::privilege(
            "superuser privileges required",
        ));
    }

    let ctx = ProvisionContext::resolve(
        cli.config_dir,
        cli.package_list,
        cli.non_interactive,
        cli.ssh_key,
    )
    .await?;

    info!(
        "Provisioning host for user '{}' (home {}, session {})",
        ctx.username,
        ctx.home_dir.display(),
        ctx.session_id
    );

    let apt = AptSystem::new();
    let sequence = steps::default_steps();
    steps::run_all(&sequence, &ctx, &apt).await?;

    info!("Provisioning run complete");
    Ok(())
}
