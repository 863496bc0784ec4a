// file: src/steps/packages.rs
// version: 1.0.0
// guid: a3b4c5d6-e7f8-4901-2345-f07890123456

//! Bulk idempotent package installation from a declared list

use super::{completed, fs_utils, skipped, ProvisionStep, StepOutcome};
use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// Install every package named in the package list file.
///
/// The list is processed in file order; a package that fails to install
/// is logged and the remaining packages are still attempted.
pub struct PackageInstallStep;

/// Parse a package list: one token per line, blank lines and lines whose
/// first non-whitespace character is `#` are ignored. Duplicates are kept
/// (they are harmless, the install check runs again).
pub fn parse_package_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Install one package only if it is not already present.
///
/// Returns `true` when the package is present afterwards. Never returns
/// an error; the outcome is reported through the log.
pub async fn check_and_install(package: &str, system: &dyn SystemManager) -> bool {
    match system.is_installed(package).await {
        Ok(true) => {
            info!("{} is already installed", package);
            true
        }
        Ok(false) => match system.install(package).await {
            Ok(()) => {
                info!("successfully installed {}", package);
                true
            }
            Err(e) => {
                warn!("failed to install {}: {}", package, e);
                false
            }
        },
        Err(e) => {
            warn!("failed to install {}: install check errored: {}", package, e);
            false
        }
    }
}

#[async_trait]
impl ProvisionStep for PackageInstallStep {
    fn name(&self) -> &str {
        "package installation"
    }

    async fn run(
        &self,
        ctx: &ProvisionContext,
        system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        if !fs_utils::file_exists(&ctx.package_list).await {
            return Ok(skipped(format!(
                "package list {} not found",
                ctx.package_list.display()
            )));
        }

        let content = tokio::fs::read_to_string(&ctx.package_list).await?;
        let packages = parse_package_list(&content);

        let mut failures = 0usize;
        for package in &packages {
            if !check_and_install(package, system).await {
                failures += 1;
            }
        }

        Ok(completed(format!(
            "{} packages processed, {} failed",
            packages.len(),
            failures
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_list_filters_comments_and_blanks() {
        let content = "# base tools\nhtop\n\n  # editors\nvim\n   nano  \n";
        assert_eq!(parse_package_list(content), vec!["htop", "vim", "nano"]);
    }

    #[test]
    fn test_parse_package_list_keeps_file_order_and_duplicates() {
        let content = "curl\nwget\ncurl\n";
        assert_eq!(parse_package_list(content), vec!["curl", "wget", "curl"]);
    }

    #[test]
    fn test_parse_package_list_indented_comment() {
        assert!(parse_package_list("   # only a comment").is_empty());
    }

    #[test]
    fn test_parse_package_list_empty_input() {
        assert!(parse_package_list("").is_empty());
        assert!(parse_package_list("\n\n").is_empty());
    }
}
