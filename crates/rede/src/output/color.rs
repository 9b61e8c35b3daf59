//! Color and styling helpers for CLI output.
//!
//! Semantic color theme:
//!   - Success/Member: green
//!   - Warning/Visitor: yellow
//!   - Error: red
//!   - Info/IDs: cyan
//!   - Muted: dimmed (field labels, connectors, pending contacts)
//!   - Emphasis: bold (section headers)

use crate::domain::ContactStatus;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

pub(crate) fn colorize_status(status: ContactStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        ContactStatus::Pending => text.dimmed().to_string(),
        ContactStatus::Visitor => text.yellow().to_string(),
        ContactStatus::Member => text.green().to_string(),
    }
}

pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    info(id, config)
}

/// Status icon, with ASCII fallback.
pub(crate) fn colored_status_icon(status: ContactStatus, config: &OutputConfig) -> String {
    let icon = match (status, config.use_ascii) {
        (ContactStatus::Pending, true) => "o",
        (ContactStatus::Visitor, true) => "~",
        (ContactStatus::Member, true) => "*",
        (ContactStatus::Pending, false) => "○",
        (ContactStatus::Visitor, false) => "◐",
        (ContactStatus::Member, false) => "●",
    };

    if !config.use_colors {
        return icon.to_string();
    }
    match status {
        ContactStatus::Pending => icon.dimmed().to_string(),
        ContactStatus::Visitor => icon.yellow().to_string(),
        ContactStatus::Member => icon.green().to_string(),
    }
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
