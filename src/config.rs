// file: src/config.rs
// version: 1.0.0
// guid: c9d0e1f2-a3b4-4567-8901-bc3456789012

//! Provisioning context resolved once at startup

use crate::{ProvisionError, Result};
use std::path::PathBuf;
use tokio::process::Command;
use uuid::Uuid;

/// Everything the step sequence needs, resolved once and passed by
/// reference into every step. No step reads ambient process state.
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    /// Unique id for this run, recorded in the log
    pub session_id: Uuid,

    /// The originally logged-in (pre-sudo) user; never root
    pub username: String,

    /// Home directory of the target user
    pub home_dir: PathBuf,

    /// Directory holding the optional overlay files
    pub config_dir: PathBuf,

    /// Path to the package list file
    pub package_list: PathBuf,

    /// When set, no prompt is ever shown
    pub non_interactive: bool,

    /// Pre-supplied SSH public key, bypassing the interactive prompt
    pub ssh_key: Option<String>,
}

impl ProvisionContext {
    /// Resolve the target user identity and build the context.
    ///
    /// The process runs as root, but all per-user file operations target
    /// the account that invoked sudo. `SUDO_USER` is authoritative; when
    /// it is unset (e.g. a root login shell) `logname` is consulted, and
    /// a result of `root` is rejected outright.
    pub async fn resolve(
        config_dir: PathBuf,
        package_list: PathBuf,
        non_interactive: bool,
        ssh_key: Option<String>,
    ) -> Result<Self> {
        let username = resolve_invoking_user().await?;
        if username == "root" {
            return Err(ProvisionError::config(
                "refusing to target the root account; run via sudo from a regular user",
            ));
        }

        let home_dir = resolve_home_dir(&username).await?;

        Ok(Self {
            session_id: Uuid::new_v4(),
            username,
            home_dir,
            config_dir,
            package_list,
            non_interactive,
            ssh_key,
        })
    }
}

/// The pre-escalation login name: `SUDO_USER` if set, else `logname`.
async fn resolve_invoking_user() -> Result<String> {
    if let Ok(user) = std::env::var("SUDO_USER") {
        if !user.is_empty() {
            return Ok(user);
        }
    }

    let output = Command::new("logname")
        .output()
        .await
        .map_err(|e| ProvisionError::system(format!("Failed to run logname: {}", e)))?;

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || name.is_empty() {
        return Err(ProvisionError::config(
            "unable to determine the invoking user (SUDO_USER unset and logname failed)",
        ));
    }

    Ok(name)
}

/// Look up the user's home directory from the passwd database.
async fn resolve_home_dir(username: &str) -> Result<PathBuf> {
    let output = Command::new("getent")
        .args(["passwd", username])
        .output()
        .await
        .map_err(|e| ProvisionError::system(format!("Failed to run getent: {}", e)))?;

    if !output.status.success() {
        return Err(ProvisionError::config(format!(
            "user '{}' not found in the passwd database",
            username
        )));
    }

    let line = String::from_utf8_lossy(&output.stdout);
    parse_passwd_home(line.trim()).ok_or_else(|| {
        ProvisionError::config(format!("malformed passwd entry for '{}'", username))
    })
}

/// Extract the home directory field from one passwd(5) line.
fn parse_passwd_home(line: &str) -> Option<PathBuf> {
    let home = line.split(':').nth(5)?;
    if home.is_empty() {
        return None;
    }
    Some(PathBuf::from(home))
}
