//! Known projects and toolchain selection

use std::fmt;

/// Projects built, in this order, when no project is named on the command line.
pub const KNOWN_PROJECTS: &[&str] = &["anapo", "anapo-test-app", "js-framework-benchmark"];

/// Compiler toolchain used inside the Nix environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toolchain {
    /// GHCJS, compiling Haskell to JavaScript
    Ghcjs,
    /// Native GHC
    Ghc,
}

impl Toolchain {
    /// Order in which toolchains are walked in build-all mode
    pub const ALL: [Toolchain; 2] = [Toolchain::Ghcjs, Toolchain::Ghc];

    /// Pick GHC when `use_ghc` is set, GHCJS otherwise
    pub fn select(use_ghc: bool) -> Self {
        if use_ghc {
            Toolchain::Ghc
        } else {
            Toolchain::Ghcjs
        }
    }

    pub fn is_ghcjs(self) -> bool {
        self == Toolchain::Ghcjs
    }

    /// Value passed to `--arg ghcjs` in build.nix
    pub fn nix_arg(self) -> &'static str {
        if self.is_ghcjs() {
            "true"
        } else {
            "false"
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toolchain::Ghcjs => write!(f, "GHCjs"),
            Toolchain::Ghc => write!(f, "GHC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        assert_eq!(Toolchain::select(false), Toolchain::Ghcjs);
        assert_eq!(Toolchain::select(true), Toolchain::Ghc);
    }

    #[test]
    fn test_nix_arg_and_display() {
        assert_eq!(Toolchain::Ghcjs.nix_arg(), "true");
        assert_eq!(Toolchain::Ghc.nix_arg(), "false");
        assert_eq!(Toolchain::Ghcjs.to_string(), "GHCjs");
        assert_eq!(Toolchain::Ghc.to_string(), "GHC");
    }

    #[test]
    fn test_build_all_walks_ghcjs_first() {
        assert_eq!(Toolchain::ALL, [Toolchain::Ghcjs, Toolchain::Ghc]);
        assert_eq!(KNOWN_PROJECTS[0], "anapo");
        assert_eq!(KNOWN_PROJECTS[2], "js-framework-benchmark");
    }
}
