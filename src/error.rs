//! Error types and helpers for user-friendly error messages
//!
//! Every failure ends the run. The only thing that varies is how it is
//! reported and which exit code the process leaves with.

use thiserror::Error;

use crate::utils::terminal::print_error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum AnapoError {
    /// An external process exited unsuccessfully
    #[error("{program} exited with status {exit_code} while {step}")]
    ExternalProcessFailure {
        program: String,
        step: String,
        exit_code: i32,
    },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },
}

impl AnapoError {
    /// Create an external process failure
    pub fn process_failure(
        program: impl Into<String>,
        step: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self::ExternalProcessFailure {
            program: program.into(),
            step: step.into(),
            exit_code,
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
            hint: Some(hint.into()),
        }
    }

    /// Exit code the whole run should end with
    pub fn exit_code(&self) -> i32 {
        match self {
            AnapoError::ExternalProcessFailure { exit_code, .. } if *exit_code != 0 => *exit_code,
            _ => 1,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            AnapoError::MissingTool {
                required_for, hint, ..
            } => {
                eprintln!("Required for: {}", required_for);
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            AnapoError::Config {
                source, hint, ..
            } => {
                if let Some(src) = source {
                    eprintln!("Caused by: {}", src);
                }
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            AnapoError::ExternalProcessFailure { .. } => {}
        }

        eprintln!();
    }
}

/// Print `err` to stderr and return the exit code for the process
pub fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AnapoError>() {
        Some(anapo_err) => {
            anapo_err.display_with_hints();
            anapo_err.exit_code()
        }
        None => {
            print_error(&format!("{:#}", err));
            1
        }
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing Nix tools
    pub fn nix() -> &'static str {
        "Install Nix from https://nixos.org/download/ and make sure its profile is sourced:\n\
         • Multi-user: sh <(curl -L https://nixos.org/nix/install) --daemon\n\
         • Then open a new shell or source /nix/var/nix/profiles/default/etc/profile.d/nix-daemon.sh"
    }

    /// Get hint for an invalid anapo-build.toml
    pub fn invalid_config() -> &'static str {
        "anapo-build.toml is invalid. Recognised keys are:\n\
         • [nix] build_file, shell, build\n\
         • [setup] runner, script\n\
         \n\
         All keys are optional; remove anything else."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_keeps_child_code() {
        let err = AnapoError::process_failure("nix-shell", "configuring anapo (GHCjs)", 3);
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.to_string(),
            "nix-shell exited with status 3 while configuring anapo (GHCjs)"
        );
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        assert_eq!(AnapoError::missing_tool("nix-build", "x", "y").exit_code(), 1);
        assert_eq!(AnapoError::config_error("bad").exit_code(), 1);
    }

    #[test]
    fn test_report_downcasts_through_context() {
        use anyhow::Context;

        let result: anyhow::Result<()> =
            Err(AnapoError::process_failure("nix-build", "building anapo (GHC)", 42).into());
        let err = result.context("build-all failed").unwrap_err();
        assert_eq!(report(&err), 42);
    }

    #[test]
    fn test_report_plain_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(report(&err), 1);
    }
}
