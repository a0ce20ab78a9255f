//! anapo-build - configure, build, or REPL the anapo projects
//!
//! A thin dispatcher over Nix and Cabal's `Setup.hs`. All real build work
//! happens in the external tools; this binary only decides which of them to
//! run, in which order, and stops at the first failure.
//!
//! ## Architecture
//!
//! ```text
//! Cli → plan::Mode → Vec<Step> → exec::Runner → nix-shell / nix-build
//! ```

mod cli;
mod config;
mod error;
mod exec;
mod plan;
mod project;
mod utils;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        std::process::exit(error::report(&err));
    }
}
