//! Tool detection and validation
//!
//! Looks up the Nix executables a plan needs before anything runs, so a
//! missing install fails with a hint instead of a spawn error halfway through.

use std::path::PathBuf;

use anyhow::Result;
use which::which;

use crate::error::{hints, AnapoError};
use crate::utils::terminal::print_warning;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
}

/// A tool the current plan depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: String,
    pub required_for: &'static str,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    which(tool_name).ok().map(|path| ToolInfo {
        name: tool_name.to_string(),
        path,
    })
}

/// Require a tool to exist, return error with hint if missing
pub fn require_tool(tool_name: &str, required_for: &str) -> Result<ToolInfo> {
    match check_tool(tool_name) {
        Some(info) => Ok(info),
        None => Err(AnapoError::missing_tool(tool_name, required_for, get_tool_hint(tool_name)).into()),
    }
}

/// Require every tool in `requirements`, failing on the first missing one
pub fn require_all(requirements: &[ToolRequirement]) -> Result<Vec<ToolInfo>> {
    requirements
        .iter()
        .map(|req| require_tool(&req.name, req.required_for))
        .collect()
}

/// Warn about missing tools without failing
pub fn warn_missing(requirements: &[ToolRequirement]) {
    for req in requirements {
        if check_tool(&req.name).is_none() {
            print_warning(&format!(
                "'{}' not found on PATH (needed for {})",
                req.name, req.required_for
            ));
        }
    }
}

/// Get installation hint for a tool
fn get_tool_hint(tool_name: &str) -> &'static str {
    match tool_name {
        "nix-shell" | "nix-build" | "nix" => hints::nix(),
        _ => "Install this tool and ensure it's in your PATH",
    }
}
