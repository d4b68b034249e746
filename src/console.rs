//! Minimal ANSI console for harness report lines.
//!
//! The report surface is stdout lines with pass/fail/info markers; colors
//! are applied only when stdout is a terminal and neither `--no-color` nor
//! `NO_COLOR` asked for plain output.

use std::io::{self, IsTerminal};

const GREEN: &str = "\x1b[0;32m";
const RED: &str = "\x1b[0;31m";
const YELLOW: &str = "\x1b[0;33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
    enabled: bool,
}

impl Console {
    /// Auto-detect color support from the environment.
    #[must_use]
    pub fn auto(no_color_flag: bool) -> Self {
        let color = !no_color_flag
            && std::env::var_os("NO_COLOR").is_none()
            && io::stdout().is_terminal();
        Self {
            color,
            enabled: true,
        }
    }

    /// A console that prints nothing (used for machine-readable output).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            color: false,
            enabled: false,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            color: false,
            enabled: true,
        }
    }

    pub fn pass(&self, message: &str) {
        self.marker(GREEN, "✓ PASS", message);
    }

    pub fn fail(&self, message: &str) {
        self.marker(RED, "✗ FAIL", message);
    }

    pub fn info(&self, message: &str) {
        if !self.enabled {
            return;
        }
        if self.color {
            println!("{YELLOW}→{RESET} {message}");
        } else {
            println!("→ {message}");
        }
    }

    pub fn line(&self, message: &str) {
        if self.enabled {
            println!("{message}");
        }
    }

    pub fn heading(&self, title: &str) {
        if !self.enabled {
            return;
        }
        println!("==============================================");
        println!("{title}");
        println!("==============================================");
    }

    /// Final verdict line, colored by outcome.
    pub fn verdict(&self, conformant: bool, message: &str) {
        if !self.enabled {
            return;
        }
        if self.color {
            let tint = if conformant { GREEN } else { RED };
            println!("{tint}{message}{RESET}");
        } else {
            println!("{message}");
        }
    }

    fn marker(&self, tint: &str, marker: &str, message: &str) {
        if !self.enabled {
            return;
        }
        if self.color {
            println!("{tint}{marker}{RESET}: {message}");
        } else {
            println!("{marker}: {message}");
        }
    }
}
