// file: src/main.rs
// version: 1.0.0
// guid: a1b2c3d4-e5f6-4789-9012-345678abcdef

//! Post-install provisioning agent - Main entry point

use clap::Parser;
use postinstall_agent::{
    cli::{args::Cli, commands},
    logging::logger,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before anything else so even the privilege
    // check failure ends up in the run log.
    logger::init_logger(&cli.log_dir, cli.verbose, cli.quiet)?;

    commands::run(cli).await
}
