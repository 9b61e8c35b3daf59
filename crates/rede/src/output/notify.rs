//! Console toasts for the edit flow.

use std::io::{self, Write};

use super::OutputConfig;
use super::color::{error, success};
use crate::edit::Notifier;

/// [`Notifier`] that prints toasts to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    config: OutputConfig,
}

impl ConsoleNotifier {
    /// Notifier using the environment's output settings.
    pub fn new() -> Self {
        Self::with_config(OutputConfig::from_env())
    }

    /// Notifier with explicit output settings.
    pub fn with_config(config: OutputConfig) -> Self {
        Self { config }
    }

    fn emit(&self, line: &str) {
        // A closed stderr leaves nowhere to report the failure.
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::debug!(title, "Success toast");
        self.emit(&format_toast(&self.config, true, title, message));
    }

    fn failure(&self, title: &str, message: &str) {
        tracing::debug!(title, "Failure toast");
        self.emit(&format_toast(&self.config, false, title, message));
    }
}

fn format_toast(config: &OutputConfig, ok: bool, title: &str, message: &str) -> String {
    let icon = match (ok, config.use_ascii) {
        (true, true) => "+",
        (true, false) => "✓",
        (false, true) => "x",
        (false, false) => "✗",
    };
    let icon = if ok { success(icon, config) } else { error(icon, config) };
    format!("{icon} {title}: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true, "+ Saved: done")]
    #[case(true, false, "✓ Saved: done")]
    #[case(false, true, "x Saved: done")]
    #[case(false, false, "✗ Saved: done")]
    fn toast_format(#[case] ok: bool, #[case] ascii: bool, #[case] expected: &str) {
        let config = OutputConfig::new(80, ascii, false);
        assert_eq!(format_toast(&config, ok, "Saved", "done"), expected);
    }
}
