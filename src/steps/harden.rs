// file: src/steps/harden.rs
// version: 1.0.0
// guid: d6e7f8a9-b0c1-4234-5678-237890123459

//! SSH daemon hardening: key-only authentication
//!
//! The daemon config is rewritten structurally rather than by regex
//! substitution: every line is kept verbatim unless it is a managed
//! directive, either live or disabled in the stock `#Directive value`
//! form (`#` directly prefixing the name; a spaced `# ...` line is prose
//! and stays untouched). The first occurrence of each directive is
//! replaced with the enforced value, later occurrences are dropped, and
//! directives that never occurred are appended, so the result always
//! carries exactly one uncommented line per directive.

use super::{completed, failed, fs_utils, skipped, ProvisionStep, StepOutcome};
use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// The enforced directive set: password and challenge-response logins off,
/// public-key logins on.
const DIRECTIVES: [(&str, &str); 3] = [
    ("PasswordAuthentication", "no"),
    ("ChallengeResponseAuthentication", "no"),
    ("PubkeyAuthentication", "yes"),
];

/// Rewrite `sshd_config` to key-only authentication and restart the
/// daemon so the change takes effect immediately
pub struct HardenSshStep {
    config_path: PathBuf,
    service: String,
}

impl HardenSshStep {
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from("/etc/ssh/sshd_config"),
            service: "ssh".to_string(),
        }
    }

    /// Override the config path and service name (used by tests)
    pub fn with_paths(config_path: impl Into<PathBuf>, service: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            service: service.into(),
        }
    }
}

impl Default for HardenSshStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Index into [`DIRECTIVES`] when the line is a managed directive,
/// live or disabled as `#Directive value`. A space after the `#` marks
/// prose, not a disabled directive, and never matches.
fn managed_directive(line: &str) -> Option<usize> {
    let stripped = line.trim_start();
    let stripped = match stripped.strip_prefix('#') {
        Some(rest) if rest.starts_with(char::is_whitespace) => return None,
        Some(rest) => rest,
        None => stripped,
    };

    let token = stripped.split_whitespace().next()?;
    DIRECTIVES
        .iter()
        .position(|(name, _)| token.eq_ignore_ascii_case(name))
}

/// Apply the three fixed overrides, preserving every unmanaged line byte
/// for byte.
pub fn rewrite_sshd_config(input: &str) -> String {
    let mut seen = [false; DIRECTIVES.len()];
    let mut output = String::with_capacity(input.len());

    for line in input.lines() {
        match managed_directive(line) {
            Some(index) if !seen[index] => {
                let (name, value) = DIRECTIVES[index];
                output.push_str(name);
                output.push(' ');
                output.push_str(value);
                output.push('\n');
                seen[index] = true;
            }
            // Duplicate occurrence of a directive we already rewrote.
            Some(_) => {}
            None => {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    for (index, (name, value)) in DIRECTIVES.iter().enumerate() {
        if !seen[index] {
            output.push_str(name);
            output.push(' ');
            output.push_str(value);
            output.push('\n');
        }
    }

    output
}

#[async_trait]
impl ProvisionStep for HardenSshStep {
    fn name(&self) -> &str {
        "sshd hardening"
    }

    async fn run(
        &self,
        _ctx: &ProvisionContext,
        system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        if !fs_utils::file_exists(&self.config_path).await {
            return Ok(skipped(format!("{} not found", self.config_path.display())));
        }

        let input = tokio::fs::read_to_string(&self.config_path).await?;
        let rewritten = rewrite_sshd_config(&input);
        tokio::fs::write(&self.config_path, rewritten).await?;
        info!(
            "Enforced key-only authentication in {}",
            self.config_path.display()
        );

        // The rewrite already succeeded; a restart failure is recoverable
        // and the new config applies on the next daemon start.
        if let Err(e) = system.restart_service(&self.service).await {
            return Ok(failed(format!(
                "config rewritten but {} restart failed: {}",
                self.service, e
            )));
        }

        Ok(completed(format!(
            "key-only authentication enforced, {} restarted",
            self.service
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_replaces_commented_and_uncommented_directives() {
        let input = "#PasswordAuthentication yes\nPubkeyAuthentication no\n";
        let output = rewrite_sshd_config(input);

        assert_eq!(
            output.matches("PasswordAuthentication no").count(),
            1
        );
        assert_eq!(output.matches("PubkeyAuthentication yes").count(), 1);
        assert_eq!(
            output
                .matches("ChallengeResponseAuthentication no")
                .count(),
            1
        );
        assert!(!output.contains('#'));
    }

    #[test]
    fn test_rewrite_preserves_unmanaged_lines_verbatim() {
        let input = "Port 22\n# A comment about the port\nUsePAM yes\n";
        let output = rewrite_sshd_config(input);

        assert!(output.starts_with("Port 22\n# A comment about the port\nUsePAM yes\n"));
    }

    #[test]
    fn test_rewrite_appends_missing_directives() {
        let output = rewrite_sshd_config("Port 22\n");
        assert!(output.contains("PasswordAuthentication no\n"));
        assert!(output.contains("ChallengeResponseAuthentication no\n"));
        assert!(output.contains("PubkeyAuthentication yes\n"));
    }

    #[test]
    fn test_rewrite_collapses_duplicate_directives() {
        let input =
            "PasswordAuthentication yes\n#PasswordAuthentication no\nPasswordAuthentication yes\n";
        let output = rewrite_sshd_config(input);

        assert_eq!(output.matches("PasswordAuthentication").count(), 1);
        assert!(output.contains("PasswordAuthentication no\n"));
    }

    #[test]
    fn test_rewrite_matches_case_insensitively() {
        let output = rewrite_sshd_config("passwordauthentication yes\n");
        assert_eq!(output.matches("PasswordAuthentication no").count(), 1);
    }

    #[test]
    fn test_managed_directive_ignores_prose_comments() {
        assert_eq!(managed_directive("# Set to no to disable passwords"), None);
        assert_eq!(managed_directive("# PubkeyAuthentication defaults to yes"), None);
        assert_eq!(managed_directive("#  PasswordAuthentication no"), None);
        assert_eq!(managed_directive("#PasswordAuthentication yes"), Some(0));
        assert_eq!(managed_directive("#ChallengeResponseAuthentication yes"), Some(1));
    }

    #[test]
    fn test_rewrite_keeps_prose_comments_naming_a_directive() {
        let input = "# PubkeyAuthentication defaults to yes\nPort 22\n";
        let output = rewrite_sshd_config(input);

        // The prose line survives verbatim; the real directive is appended.
        assert!(output.starts_with("# PubkeyAuthentication defaults to yes\nPort 22\n"));
        assert_eq!(output.matches("PubkeyAuthentication yes\n").count(), 1);
    }
}
