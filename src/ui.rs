// ============================================================================
// src/ui.rs – status lines on stderr (stdout carries key material only)
// ============================================================================

use colored::Colorize;

#[derive(Debug, Clone, Copy, Default)]
pub struct UX {
    pub quiet: bool,
}

impl UX {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{} {}", "▸".cyan().bold(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{} {}", "✔".green().bold(), msg.green());
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{} {}", "!".yellow().bold(), msg.yellow());
        }
    }

    /// Errors print even in quiet mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "✖".red().bold(), msg.red().bold());
    }
}
