// file: src/system/mod.rs
// version: 1.0.0
// guid: d0e1f2a3-b4c5-4678-9012-cd4567890123

//! Package manager and service manager capability interface
//!
//! The orchestration logic only ever talks to [`SystemManager`], so tests
//! can substitute a fake implementation for the real apt/systemctl one.

use crate::{ProvisionError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Check if the process holds superuser privileges
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// The package and service operations the step sequence depends on
#[async_trait]
pub trait SystemManager: Send + Sync {
    /// Query whether a package is currently installed
    async fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install one package; `Err` means the installer reported failure
    async fn install(&self, package: &str) -> Result<()>;

    /// Refresh the package index
    async fn update_index(&self) -> Result<()>;

    /// Upgrade all installed packages
    async fn upgrade(&self) -> Result<()>;

    /// Restart a system service so configuration changes take effect
    async fn restart_service(&self, service: &str) -> Result<()>;
}

/// Real implementation backed by apt-get, dpkg-query and systemctl
#[derive(Debug, Default)]
pub struct AptSystem;

impl AptSystem {
    pub fn new() -> Self {
        Self
    }

    /// Run a command, failing with its stderr when the exit status is non-zero
    async fn execute_checked(&self, command: &str, args: &[&str]) -> Result<()> {
        debug!("Executing command: {} {}", command, args.join(" "));

        let output = Command::new(command)
            .args(args)
            .env("DEBIAN_FRONTEND", "noninteractive")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ProvisionError::execution(format!("Failed to spawn {}: {}", command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProvisionError::execution(format!(
                "{} {} failed with exit code {}: {}",
                command,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SystemManager for AptSystem {
    async fn is_installed(&self, package: &str) -> Result<bool> {
        // dpkg-query exits non-zero for unknown packages; that simply
        // means "not installed", not an error.
        let output = Command::new("dpkg-query")
            .args(["-W", "-f", "${Status}", package])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ProvisionError::execution(format!("Failed to spawn dpkg-query: {}", e))
            })?;

        if !output.status.success() {
            return Ok(false);
        }

        let status = String::from_utf8_lossy(&output.stdout);
        Ok(status.contains("install ok installed"))
    }

    async fn install(&self, package: &str) -> Result<()> {
        self.execute_checked("apt-get", &["install", "-y", package])
            .await
    }

    async fn update_index(&self) -> Result<()> {
        self.execute_checked("apt-get", &["update"]).await
    }

    async fn upgrade(&self) -> Result<()> {
        self.execute_checked("apt-get", &["dist-upgrade", "-y"])
            .await
    }

    async fn restart_service(&self, service: &str) -> Result<()> {
        self.execute_checked("systemctl", &["restart", service])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_checked_success() {
        let apt = AptSystem::new();
        assert!(apt.execute_checked("true", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_checked_failure_carries_exit_code() {
        let apt = AptSystem::new();
        let err = apt.execute_checked("false", &[]).await.unwrap_err();
        assert!(err.to_string().contains("exit code 1"));
    }

    #[tokio::test]
    async fn test_execute_checked_missing_binary() {
        let apt = AptSystem::new();
        let result = apt
            .execute_checked("nonexistent-command-12345", &[])
            .await;
        assert!(result.is_err());
    }
}
