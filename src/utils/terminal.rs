//! Terminal output utilities

use console::style;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}: {}", style("info").blue().bold(), message);
}

/// Print a `###` status line announcing the next step
pub fn print_status(message: &str) {
    println!("{} {}", style("###").cyan().bold(), message);
}

/// Print a command line about to run (or that would run, for dry runs)
pub fn print_command(command_line: &str) {
    println!("{} {}", style("$").dim(), command_line);
}

/// Turn off colors on both stdout and stderr
pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}
