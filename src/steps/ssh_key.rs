// file: src/steps/ssh_key.rs
// version: 1.0.0
// guid: c5d6e7f8-a9b0-4123-4567-127890123458

//! Optional SSH public key registration for the target user

use super::{completed, fs_utils, skipped, ProvisionStep, StepOutcome};
use crate::{config::ProvisionContext, system::SystemManager, Result};
use async_trait::async_trait;
use std::io::Write;
use tracing::info;

/// Prompt for and register one SSH public key.
///
/// The key content is treated as a single opaque line and is never
/// validated against any public-key format. In non-interactive mode the
/// step runs only when a key was supplied on the command line.
pub struct SshKeyStep;

/// Decode a yes/no answer: only a leading `y` (any case) accepts,
/// anything else - including empty input - declines.
pub fn answer_is_yes(input: &str) -> bool {
    input
        .trim()
        .chars()
        .next()
        .map(|c| c.eq_ignore_ascii_case(&'y'))
        .unwrap_or(false)
}

fn prompt_line(prompt: &str) -> std::io::Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input)
}

/// Decide which key to register, if any: a pre-supplied key wins, the
/// prompt is only shown in interactive mode.
fn resolve_key(ctx: &ProvisionContext) -> Result<Option<String>> {
    if let Some(key) = &ctx.ssh_key {
        return Ok(Some(key.trim().to_string()));
    }

    if ctx.non_interactive {
        return Ok(None);
    }

    let answer = prompt_line("Would you like to add a public SSH key? [y/N] ")?;
    if !answer_is_yes(&answer) {
        return Ok(None);
    }

    let key = prompt_line("Paste the public key: ")?;
    Ok(Some(key.trim().to_string()))
}

/// Append the key and lock down `~/.ssh`: directory 0700, file 0600,
/// both owned by the target user.
pub async fn register_key(ctx: &ProvisionContext, key: &str) -> anyhow::Result<()> {
    let ssh_dir = ctx.home_dir.join(".ssh");
    let auth_keys = ssh_dir.join("authorized_keys");

    tokio::fs::create_dir_all(&ssh_dir).await?;
    fs_utils::append_to_file(&auth_keys, format!("{}\n", key).as_bytes()).await?;

    fs_utils::chown_recursive(&ctx.username, &ssh_dir).await?;
    fs_utils::set_mode(&ssh_dir, 0o700).await?;
    fs_utils::set_mode(&auth_keys, 0o600).await?;

    info!("Registered SSH key in {}", auth_keys.display());
    Ok(())
}

#[async_trait]
impl ProvisionStep for SshKeyStep {
    fn name(&self) -> &str {
        "ssh key registration"
    }

    async fn run(
        &self,
        ctx: &ProvisionContext,
        _system: &dyn SystemManager,
    ) -> Result<StepOutcome> {
        let key = match resolve_key(ctx)? {
            Some(key) if !key.is_empty() => key,
            Some(_) => return Ok(skipped("empty key supplied")),
            None => return Ok(skipped("operator declined")),
        };

        match register_key(ctx, &key).await {
            Ok(()) => Ok(completed(format!(
                "key registered for user '{}'",
                ctx.username
            ))),
            Err(e) => Ok(super::failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_defaults_to_no() {
        assert!(!answer_is_yes(""));
        assert!(!answer_is_yes("\n"));
        assert!(!answer_is_yes("   "));
    }

    #[test]
    fn test_answer_accepts_leading_y_any_case() {
        assert!(answer_is_yes("y"));
        assert!(answer_is_yes("Y\n"));
        assert!(answer_is_yes("yes"));
        assert!(answer_is_yes("Yeah"));
    }

    #[test]
    fn test_answer_rejects_everything_else() {
        assert!(!answer_is_yes("n"));
        assert!(!answer_is_yes("no"));
        assert!(!answer_is_yes("sure"));
        assert!(!answer_is_yes("0"));
    }
}
