// file: src/cli/args.rs
// version: 1.0.0
// guid: a7b8c9d0-e1f2-4345-6789-0a1234567890

//! Command line argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "postinstall-agent")]
#[command(about = "One-shot post-install provisioning for a freshly installed Ubuntu host")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory holding the optional overlay files (motd.txt, bashrc.append, nanorc.append)
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Package list file, one package per line; blank lines and '#' comments ignored
    #[arg(long, default_value = "lists/packages.txt")]
    pub package_list: PathBuf,

    /// Directory for per-run log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Never prompt; the SSH key step is skipped unless --ssh-key is given
    #[arg(long)]
    pub non_interactive: bool,

    /// Public SSH key to register for the target user (skips the prompt)
    #[arg(long, value_name = "KEY")]
    pub ssh_key: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}
