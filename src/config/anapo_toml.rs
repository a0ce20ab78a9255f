//! anapo-build.toml configuration parsing
//!
//! The file is optional. When present it pins where the Nix expression lives
//! and which executables drive the build:
//!
//! ```toml
//! [nix]
//! build_file = "build.nix"
//! shell = "nix-shell"
//! build = "nix-build"
//!
//! [setup]
//! runner = "runhaskell"
//! script = "Setup.hs"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{hints, AnapoError};

/// File name searched for from the current directory upwards
pub const CONFIG_FILE_NAME: &str = "anapo-build.toml";

/// Root configuration from anapo-build.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnapoConfig {
    /// Nix entry points
    #[serde(default)]
    pub nix: NixConfig,

    /// Cabal setup script invocation inside the Nix shell
    #[serde(default)]
    pub setup: SetupConfig,
}

/// `[nix]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NixConfig {
    /// Nix expression with one attribute per project
    pub build_file: Option<String>,

    /// Executable used to enter a project's environment
    pub shell: Option<String>,

    /// Executable used to build a project without a shell
    pub build: Option<String>,
}

/// `[setup]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    /// Interpreter for the setup script
    pub runner: Option<String>,

    /// Setup script path, relative to the project directory
    pub script: Option<String>,
}

impl AnapoConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::parse_named(&content, &path.display().to_string())
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_named(content, CONFIG_FILE_NAME)
    }

    /// Parse configuration, naming `source` in any error
    fn parse_named(content: &str, source: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            AnapoError::config_error_with_hint(
                format!("Failed to parse {}", source),
                e,
                hints::invalid_config(),
            )
        })?;

        let keys = [
            ("nix.build_file", &config.nix.build_file),
            ("nix.shell", &config.nix.shell),
            ("nix.build", &config.nix.build),
            ("setup.runner", &config.setup.runner),
            ("setup.script", &config.setup.script),
        ];
        for (key, value) in keys {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                let message = format!("`{}` in {} must not be empty", key, source);
                return Err(AnapoError::config_error(message).into());
            }
        }

        Ok(config)
    }

    /// Find anapo-build.toml by searching up from `start_dir`
    pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = AnapoConfig::parse("").unwrap();
        assert!(config.nix.build_file.is_none());
        assert!(config.setup.runner.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[nix]
build_file = "default.nix"
shell = "/run/current-system/sw/bin/nix-shell"
build = "nix-build"

[setup]
runner = "runghc"
script = "Setup.lhs"
"#;

        let config = AnapoConfig::parse(toml).unwrap();
        assert_eq!(config.nix.build_file.as_deref(), Some("default.nix"));
        assert_eq!(
            config.nix.shell.as_deref(),
            Some("/run/current-system/sw/bin/nix-shell")
        );
        assert_eq!(config.setup.runner.as_deref(), Some("runghc"));
        assert_eq!(config.setup.script.as_deref(), Some("Setup.lhs"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = AnapoConfig::parse("[nix]\nbuild_fille = \"x.nix\"\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnapoError>(),
            Some(AnapoError::Config { hint: Some(_), .. })
        ));

        assert!(AnapoConfig::parse("[cabal]\nflags = []\n").is_err());
    }

    #[test]
    fn test_empty_value_rejected() {
        let err = AnapoConfig::parse("[setup]\nrunner = \"  \"\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: `setup.runner` in anapo-build.toml must not be empty"
        );
    }

    #[test]
    fn test_find_config_searches_parents() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("anapo").join("src");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(AnapoConfig::find_config(&nested).is_none());

        let config_path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "").unwrap();
        assert_eq!(AnapoConfig::find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_errors_name_the_loaded_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ci.toml");

        std::fs::write(&path, "[nix\n").unwrap();
        let err = AnapoConfig::load_from_path(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Configuration error: Failed to parse {}", path.display())
        );

        std::fs::write(&path, "[nix]\nshell = \"\"\n").unwrap();
        let err = AnapoConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("ci.toml"));
        assert!(!err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_from_missing_path() {
        let temp = tempfile::tempdir().unwrap();
        let err = AnapoConfig::load_from_path(temp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read configuration from"));
    }
}
