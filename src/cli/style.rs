//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};

/// Check mark used for successful steps
pub const CHECK: &str = "✓";

/// Cross used for failed steps
pub const CROSS: &str = "✗";

/// Semantic styles, applied only when stdout supports color
pub trait Stylize {
    /// De-emphasised text
    fn muted(&self) -> String;
    /// Bold text
    fn emphasis(&self) -> String;
    /// Highlighted value
    fn accent(&self) -> String;
    /// Warning text
    fn warn(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK
        .if_supports_color(Stream::Stdout, |t| t.green())
        .to_string()
}

/// Red cross
pub fn cross() -> String {
    CROSS
        .if_supports_color(Stream::Stdout, |t| t.red())
        .to_string()
}

/// Spinner style for long-running network calls
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
