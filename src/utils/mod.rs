//! Shared helpers for terminal output and tool detection

pub mod terminal;
pub mod tools;
