//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

use crate::config::Settings;
use crate::exec::{DryRunRunner, ProcessRunner};
use crate::plan::{self, Mode, Operation, Request};
use crate::utils::terminal::{disable_colors, print_info};
use crate::utils::tools::{require_all, warn_missing};

/// Configure, build, or REPL the anapo projects through Nix
///
/// With a PROJECT, configures and builds it with GHCjs (or GHC with --ghc).
/// Without one, builds every known project with nix-build under GHCjs and
/// then GHC.
#[derive(Parser, Debug)]
#[command(name = "anapo-build")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("action").args(["configure", "repl"])))]
pub struct Cli {
    /// Project to work on; omit to build every known project
    #[arg(value_name = "PROJECT")]
    pub project: Option<String>,

    /// Use GHC rather than GHCjs
    #[arg(long)]
    pub ghc: bool,

    /// Only configure
    #[arg(long)]
    pub configure: bool,

    /// Configure with GHC, then run the repl
    #[arg(long)]
    pub repl: bool,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Echo each command before running it
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Nix expression to build from (default: build.nix) [env: ANAPO_BUILD_FILE]
    #[arg(long, value_name = "PATH")]
    pub build_file: Option<PathBuf>,

    /// Configuration file to use instead of searching for anapo-build.toml
    /// [env: ANAPO_BUILD_CONFIG]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Environment fallback for a path flag; an empty value counts as unset
fn path_from_env(flag: Option<PathBuf>, var: &str) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(var)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

impl Cli {
    /// Work out what this invocation asks for
    pub fn mode(&self) -> Mode {
        match self.project.as_deref().filter(|p| !p.is_empty()) {
            None => Mode::BuildAll,
            Some(project) => {
                let operation = if self.configure {
                    Operation::Configure
                } else if self.repl {
                    Operation::Repl
                } else {
                    Operation::Build
                };
                Mode::Single(Request::new(project, self.ghc, operation))
            }
        }
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            disable_colors();
        }

        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let config = path_from_env(self.config.clone(), "ANAPO_BUILD_CONFIG");
        let build_file = path_from_env(self.build_file.clone(), "ANAPO_BUILD_FILE");
        let settings = Settings::resolve(&cwd, config.as_deref(), build_file.as_deref())?;
        if self.verbose {
            if let Some(path) = &settings.config_path {
                print_info(&format!("Using configuration from {}", path.display()));
            }
        }

        let steps = plan::plan(&self.mode());
        let tools = plan::required_tools(&steps, &settings);

        if self.dry_run {
            warn_missing(&tools);
            plan::execute(&steps, &settings, &mut DryRunRunner)
        } else {
            for tool in require_all(&tools)? {
                if self.verbose {
                    print_info(&format!("Using {} at {}", tool.name, tool.path.display()));
                }
            }
            plan::execute(&steps, &settings, &mut ProcessRunner::new(self.verbose))
        }
    }
}
