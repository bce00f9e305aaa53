//! Remote command execution.
//!
//! All mutating work on the target host goes through the [`Executor`] trait,
//! which runs one argv at a time and captures its output. Commands are built
//! as argument vectors and quoted per argument before they cross the ssh
//! boundary; no caller-controlled data is ever spliced into a shell string.

use std::path::Path;

mod ssh;

pub use ssh::SshExecutor;

/// Captured output of a finished remote command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(success: bool, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Stdout and stderr joined, for operator-facing error messages.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Error out with the raw output when the command did not succeed.
    pub fn ensure_success(self, what: &str) -> anyhow::Result<Self> {
        if self.success {
            Ok(self)
        } else {
            anyhow::bail!("{} failed:\n{}", what, self.combined())
        }
    }
}

/// Runs commands on the deployment target.
///
/// Implementations block until the command finishes or the transport gives
/// up. A non-zero exit is reported through [`CommandOutput::success`], not as
/// an `Err`; only a transport-level failure (e.g. ssh could not run at all)
/// is an error.
pub trait Executor {
    /// Run a command as the login user.
    fn run(&self, argv: &[&str]) -> anyhow::Result<CommandOutput>;

    /// Run a privileged command.
    fn sudo(&self, argv: &[&str]) -> anyhow::Result<CommandOutput>;

    /// Run a privileged command with the given working directory.
    fn sudo_in(&self, dir: &Path, argv: &[&str]) -> anyhow::Result<CommandOutput>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn run(&self, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        (**self).run(argv)
    }

    fn sudo(&self, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        (**self).sudo(argv)
    }

    fn sudo_in(&self, dir: &Path, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        (**self).sudo_in(dir, argv)
    }
}

/// Quote a single argument for the remote shell.
///
/// ssh joins its arguments with spaces and hands the result to the remote
/// login shell, so each argument is wrapped in single quotes with embedded
/// quotes escaped.
pub(crate) fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'/' | b'='))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arguments_are_left_alone() {
        assert_eq!(shell_quote("apt-get"), "apt-get");
        assert_eq!(shell_quote("/opt/efab/projects"), "/opt/efab/projects");
        assert_eq!(shell_quote("previous_release=myapp_v1.2.0"), "previous_release=myapp_v1.2.0");
    }

    #[test]
    fn arguments_with_shell_metacharacters_are_single_quoted() {
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("$(reboot)"), "'$(reboot)'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("don't"), r"'don'\''t'");
    }
}
