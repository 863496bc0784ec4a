// file: src/lib.rs
// version: 1.0.0
// guid: b2c3d4e5-f6a7-4890-1234-56789bcdef01

//! # Post-install provisioning agent
//!
//! A one-shot, privileged provisioning tool for a freshly installed host:
//! upgrades the system, installs a declared package set, applies
//! configuration-file overlays, optionally registers an SSH public key and
//! hardens the SSH daemon to key-only authentication.
//!
//! Every run is a fixed, ordered sequence of independently-failing steps;
//! only the privilege guard and the system upgrade are fatal.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod steps;
pub mod system;

pub use error::{ProvisionError, Result};

/// Version information for the agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
