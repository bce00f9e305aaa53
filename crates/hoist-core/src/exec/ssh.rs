//! ssh-backed executor.

use std::path::Path;
use std::process::Command;

use anyhow::Context;
use tracing::debug;

use super::{CommandOutput, Executor, shell_quote};

/// Executes commands on the target host over ssh.
///
/// Privileged commands run under `sudo -n`; the login user on the target is
/// expected to have passwordless sudo, which `Provisioner::verify_sudo`
/// checks up front.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    host: String,
}

impl SshExecutor {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn run_remote(&self, command: String) -> anyhow::Result<CommandOutput> {
        debug!(host = %self.host, %command, "running remote command");
        let output = Command::new("ssh")
            .args(["-o", "BatchMode=yes"])
            .arg(&self.host)
            .arg("--")
            .arg(&command)
            .output()
            .with_context(|| format!("Failed to invoke ssh to {}", self.host))?;
        Ok(CommandOutput::new(
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ))
    }
}

fn quoted(argv: &[&str]) -> String {
    argv.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Executor for SshExecutor {
    fn run(&self, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        self.run_remote(quoted(argv))
    }

    fn sudo(&self, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        self.run_remote(format!("sudo -n {}", quoted(argv)))
    }

    fn sudo_in(&self, dir: &Path, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        // The working directory comes from validated config paths, but it is
        // quoted like everything else before the shell sees it.
        let dir = shell_quote(&dir.to_string_lossy());
        self.run_remote(format!("cd {} && sudo -n {}", dir, quoted(argv)))
    }
}
