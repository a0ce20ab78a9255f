//! Subprocess execution with inherited stdio

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// A fully spelled-out external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute, looked up on PATH
    pub program: String,
    /// Arguments, passed without any shell in between
    pub args: Vec<String>,
    /// Working directory for the child; inherits ours when `None`
    pub current_dir: Option<PathBuf>,
    /// What the command is doing, e.g. "configuring anapo (GHCjs)"
    pub description: String,
}

impl Invocation {
    pub fn new(program: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            description: description.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.current_dir = dir;
        self
    }

    /// Render as a line that can be pasted into a POSIX shell
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote a single word for a POSIX shell, leaving plain words untouched
pub fn shell_quote(word: &str) -> Cow<'_, str> {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
    }
}

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code; `128 + signal` when killed by a signal on Unix
    pub exit_code: i32,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: exit_code_of(status),
            duration,
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Run an invocation to completion, sharing our stdin/stdout/stderr
pub fn run_command(invocation: &Invocation) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    if let Some(dir) = &invocation.current_dir {
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    let status = cmd
        .status()
        .with_context(|| format!("Failed to execute {}", invocation.program))?;

    Ok(CommandResult::from_status(status, start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_plain_words() {
        assert_eq!(shell_quote("nix-shell"), "nix-shell");
        assert_eq!(shell_quote("anapo.env"), "anapo.env");
        assert_eq!(shell_quote("build.nix"), "build.nix");
    }

    #[test]
    fn test_shell_quote_words_needing_quotes() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("cd anapo && x"), "'cd anapo && x'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_command_line() {
        let inv = Invocation::new("nix-shell", "configuring anapo (GHC)")
            .arg("build.nix")
            .arg("--run")
            .arg("cd anapo && runhaskell Setup.hs build");
        assert_eq!(
            inv.command_line(),
            "nix-shell build.nix --run 'cd anapo && runhaskell Setup.hs build'"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_propagates_exit_code() {
        let ok = run_command(&Invocation::new("sh", "ok").arg("-c").arg("exit 0")).unwrap();
        assert!(ok.success);
        assert_eq!(ok.exit_code, 0);

        let failed = run_command(&Invocation::new("sh", "fail").arg("-c").arg("exit 7")).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_signal_exit_code() {
        let killed = run_command(&Invocation::new("sh", "kill").arg("-c").arg("kill -9 $$")).unwrap();
        assert!(!killed.success);
        assert_eq!(killed.exit_code, 128 + 9);
    }

    #[test]
    fn test_run_command_missing_program() {
        let err = run_command(&Invocation::new("anapo-build-no-such-program", "x")).unwrap_err();
        assert!(err.to_string().contains("Failed to execute anapo-build-no-such-program"));
    }
}
