//! Turning a request into ordered steps, and running them
//!
//! A run is either a single project (configure, configure + build, or
//! configure + repl) or a Nix build of every known project under both
//! toolchains. Steps execute strictly in order and the first failure ends
//! the run.

use std::fmt;

use anyhow::Result;

use crate::config::Settings;
use crate::exec::{Invocation, Runner};
use crate::project::{Toolchain, KNOWN_PROJECTS};
use crate::utils::terminal::print_status;
use crate::utils::tools::ToolRequirement;

/// What to do with a single project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Configure only
    Configure,
    /// Configure, then build
    Build,
    /// Configure, then open a REPL
    Repl,
}

/// A single-project request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub project: String,
    pub toolchain: Toolchain,
    pub operation: Operation,
}

impl Request {
    /// Build a request from the raw command-line choices
    ///
    /// The REPL is only available under GHC, so `Repl` ignores `use_ghc`.
    pub fn new(project: impl Into<String>, use_ghc: bool, operation: Operation) -> Self {
        let toolchain = match operation {
            Operation::Repl => Toolchain::Ghc,
            Operation::Configure | Operation::Build => Toolchain::select(use_ghc),
        };
        Self {
            project: project.into(),
            toolchain,
            operation,
        }
    }
}

/// Overall shape of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Single(Request),
    BuildAll,
}

/// Kind of external action a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// `Setup.hs configure` inside nix-shell
    Configure,
    /// `Setup.hs build` inside nix-shell
    Build,
    /// `Setup.hs repl` inside nix-shell
    Repl,
    /// `nix-build` of the project attribute
    NixBuild,
}

/// One external action on one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub project: String,
    pub toolchain: Toolchain,
}

impl Step {
    pub fn new(kind: StepKind, project: impl Into<String>, toolchain: Toolchain) -> Self {
        Self {
            kind,
            project: project.into(),
            toolchain,
        }
    }

    /// Line announced before the step runs
    pub fn status_line(&self) -> String {
        let verb = match self.kind {
            StepKind::Configure => "Configuring project",
            StepKind::Build | StepKind::NixBuild => "Building project",
            StepKind::Repl => "REPLing project",
        };
        let nix = if self.kind == StepKind::NixBuild {
            " (nix)"
        } else {
            ""
        };
        format!(
            "{} {}{}, using {}.",
            verb, self.project, nix, self.toolchain
        )
    }

    /// `Setup.hs` sub-command for steps run inside the Nix shell
    fn setup_command(&self) -> Option<&'static str> {
        match self.kind {
            StepKind::Configure if self.toolchain.is_ghcjs() => Some("configure --ghcjs"),
            StepKind::Configure => Some("configure"),
            StepKind::Build => Some("build"),
            StepKind::Repl => Some("repl --ghc-options='-fobject-code -O0'"),
            StepKind::NixBuild => None,
        }
    }

    /// Spell the step out as an external command
    pub fn invocation(&self, settings: &Settings) -> Invocation {
        let root = Some(settings.root.clone());
        let description = self.to_string();

        match self.setup_command() {
            Some(sub) => Invocation::new(&settings.nix_shell, description)
                .arg(&settings.build_file)
                .arg("-A")
                .arg(format!("{}.env", self.project))
                .arg("--arg")
                .arg("ghcjs")
                .arg(self.toolchain.nix_arg())
                .arg("--run")
                .arg(format!(
                    "cd {} && {} {} {}",
                    self.project, settings.setup_runner, settings.setup_script, sub
                ))
                .current_dir(root),
            None => Invocation::new(&settings.nix_build, description)
                .arg(&settings.build_file)
                .arg("-A")
                .arg(&self.project)
                .arg("--arg")
                .arg("ghcjs")
                .arg(self.toolchain.nix_arg())
                .current_dir(root),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            StepKind::Configure => "configuring",
            StepKind::Build => "building",
            StepKind::Repl => "running the repl for",
            StepKind::NixBuild => "nix-building",
        };
        write!(f, "{} {} ({})", verb, self.project, self.toolchain)
    }
}

/// Expand a mode into the exact steps to run, in order
pub fn plan(mode: &Mode) -> Vec<Step> {
    match mode {
        Mode::Single(req) => {
            let configure = Step::new(StepKind::Configure, &req.project, req.toolchain);
            match req.operation {
                Operation::Configure => vec![configure],
                Operation::Build => vec![
                    configure,
                    Step::new(StepKind::Build, &req.project, req.toolchain),
                ],
                Operation::Repl => vec![
                    configure,
                    Step::new(StepKind::Repl, &req.project, req.toolchain),
                ],
            }
        }
        Mode::BuildAll => Toolchain::ALL
            .iter()
            .flat_map(|&toolchain| {
                KNOWN_PROJECTS
                    .iter()
                    .map(move |project| Step::new(StepKind::NixBuild, *project, toolchain))
            })
            .collect(),
    }
}

/// Executables `steps` will spawn, each listed once
pub fn required_tools(steps: &[Step], settings: &Settings) -> Vec<ToolRequirement> {
    let mut tools = Vec::new();
    if steps.iter().any(|s| s.kind != StepKind::NixBuild) {
        tools.push(ToolRequirement {
            name: settings.nix_shell.clone(),
            required_for: "entering project environments",
        });
    }
    if steps.iter().any(|s| s.kind == StepKind::NixBuild) {
        tools.push(ToolRequirement {
            name: settings.nix_build.clone(),
            required_for: "building projects with Nix",
        });
    }
    tools
}

/// Run `steps` in order, stopping at the first failure
pub fn execute(steps: &[Step], settings: &Settings, runner: &mut dyn Runner) -> Result<()> {
    for step in steps {
        print_status(&step.status_line());
        runner.run(&step.invocation(settings))?;
    }
    Ok(())
}
