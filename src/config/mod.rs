//! Resolved settings for a run
//!
//! Precedence, highest first: command line / environment, anapo-build.toml,
//! built-in defaults.

mod anapo_toml;

use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use anapo_toml::AnapoConfig;

pub const DEFAULT_BUILD_FILE: &str = "build.nix";
pub const DEFAULT_NIX_SHELL: &str = "nix-shell";
pub const DEFAULT_NIX_BUILD: &str = "nix-build";
pub const DEFAULT_SETUP_RUNNER: &str = "runhaskell";
pub const DEFAULT_SETUP_SCRIPT: &str = "Setup.hs";

/// Everything needed to turn a step into a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub build_file: String,
    pub nix_shell: String,
    pub nix_build: String,
    pub setup_runner: String,
    pub setup_script: String,
    /// Directory every child process runs in
    pub root: PathBuf,
    /// Config file the settings were read from, if any
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Built-in defaults, running from `root`
    pub fn defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            build_file: DEFAULT_BUILD_FILE.to_string(),
            nix_shell: DEFAULT_NIX_SHELL.to_string(),
            nix_build: DEFAULT_NIX_BUILD.to_string(),
            setup_runner: DEFAULT_SETUP_RUNNER.to_string(),
            setup_script: DEFAULT_SETUP_SCRIPT.to_string(),
            root: root.into(),
            config_path: None,
        }
    }

    /// Resolve settings for a run started in `cwd`
    ///
    /// `explicit_config` skips the upward search for anapo-build.toml. The
    /// directory holding the config file becomes the root; a relative
    /// `build_file_override` still names a path relative to `cwd`.
    pub fn resolve(
        cwd: &Path,
        explicit_config: Option<&Path>,
        build_file_override: Option<&Path>,
    ) -> Result<Self> {
        let config_path = match explicit_config {
            Some(path) => Some(cwd.join(path)),
            None => AnapoConfig::find_config(cwd),
        };

        let mut settings = match &config_path {
            Some(path) => {
                let config = AnapoConfig::load_from_path(path)?;
                let root = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(cwd);
                Self::defaults(root).merge(config)
            }
            None => Self::defaults(cwd),
        };
        settings.config_path = config_path;
        settings.nix_shell = anchor_to_root(&settings.root, &settings.nix_shell);
        settings.nix_build = anchor_to_root(&settings.root, &settings.nix_build);

        if let Some(build_file) = build_file_override {
            settings.build_file = if settings.root == cwd {
                build_file.display().to_string()
            } else {
                cwd.join(build_file).display().to_string()
            };
        }

        Ok(settings)
    }

    fn merge(mut self, config: AnapoConfig) -> Self {
        let AnapoConfig { nix, setup } = config;
        if let Some(v) = nix.build_file {
            self.build_file = v;
        }
        if let Some(v) = nix.shell {
            self.nix_shell = v;
        }
        if let Some(v) = nix.build {
            self.nix_build = v;
        }
        if let Some(v) = setup.runner {
            self.setup_runner = v;
        }
        if let Some(v) = setup.script {
            self.setup_script = v;
        }
        self
    }
}

/// Resolve a relative tool path such as `./bin/nix-shell` against `root`
///
/// Bare names are left for PATH lookup.
fn anchor_to_root(root: &Path, tool: &str) -> String {
    let path = Path::new(tool);
    let has_dir = path.parent().is_some_and(|p| !p.as_os_str().is_empty());
    if path.is_absolute() || !has_dir {
        return tool.to_string();
    }
    let relative: PathBuf = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    root.join(relative).display().to_string()
}
