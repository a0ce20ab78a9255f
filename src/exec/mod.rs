//! External process execution
//!
//! Steps never spawn processes directly; they hand an [`Invocation`] to a
//! [`Runner`]. The real runner blocks on the child, the dry-run runner only
//! prints what would have run.

pub mod subprocess;

use anyhow::Result;

use crate::error::AnapoError;
use crate::utils::terminal::{print_command, print_info};

pub use subprocess::{run_command, Invocation};

/// Something that can carry out an invocation
pub trait Runner {
    /// Run `invocation` to completion; any unsuccessful exit is an error
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real child processes
#[derive(Debug, Default)]
pub struct ProcessRunner {
    verbose: bool,
}

impl ProcessRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        if self.verbose {
            print_command(&invocation.command_line());
        }

        let result = run_command(invocation)?;

        if self.verbose {
            print_info(&format!(
                "{} finished in {:.1}s",
                invocation.program,
                result.duration.as_secs_f64()
            ));
        }

        if !result.success {
            return Err(AnapoError::process_failure(
                &invocation.program,
                &invocation.description,
                result.exit_code,
            )
            .into());
        }
        Ok(())
    }
}

/// Prints invocations instead of running them
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl Runner for DryRunRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        print_command(&invocation.command_line());
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_process_runner_maps_failure() {
        let mut runner = ProcessRunner::new(false);
        let inv = Invocation::new("sh", "building anapo (GHC)").arg("-c").arg("exit 5");
        let err = runner.run(&inv).unwrap_err();
        match err.downcast_ref::<AnapoError>() {
            Some(AnapoError::ExternalProcessFailure {
                program,
                step,
                exit_code,
            }) => {
                assert_eq!(program, "sh");
                assert_eq!(step, "building anapo (GHC)");
                assert_eq!(*exit_code, 5);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_process_runner_success() {
        let mut runner = ProcessRunner::new(true);
        runner.run(&Invocation::new("true", "noop")).unwrap();
    }

    #[test]
    fn test_dry_run_never_spawns() {
        let mut runner = DryRunRunner;
        runner
            .run(&Invocation::new("anapo-build-no-such-program", "x"))
            .unwrap();
    }
}
