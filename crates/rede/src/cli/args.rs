//! CLI argument structs for all commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use super::types::ContactStatusArg;
use super::validators::{
    validate_birth_date, validate_contact_id, validate_level, validate_required_text,
};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `tree` command
#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {}

/// Arguments for the `standby` command
#[derive(Parser, Debug, Clone)]
pub struct StandbyArgs {}

/// Arguments for the `view` command
#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    /// Depth levels to show (comma-separated, default from config)
    #[arg(short, long, value_delimiter = ',', value_parser = validate_level)]
    pub levels: Vec<usize>,

    /// Expand a member so their referrals show (repeatable)
    #[arg(short, long, value_parser = validate_contact_id)]
    pub expand: Vec<String>,

    /// Expand every member with referrals
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,

    /// Show exactly one level, ignoring levels and expansion
    #[arg(short, long, value_parser = validate_level)]
    pub focus: Option<usize>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Contact ID
    #[arg(value_parser = validate_contact_id)]
    pub id: String,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {}

/// Arguments for the `edit` command
///
/// Only the given fields change; the rest keep their stored values.
#[derive(Parser, Debug, Clone)]
pub struct EditArgs {
    /// Contact ID
    #[arg(value_parser = validate_contact_id)]
    pub id: String,

    /// New name
    #[arg(long, value_parser = validate_required_text)]
    pub name: Option<String>,

    /// New WhatsApp number
    #[arg(long, value_parser = validate_required_text)]
    pub whatsapp: Option<String>,

    /// New neighborhood
    #[arg(long, value_parser = validate_required_text)]
    pub neighborhood: Option<String>,

    /// New status
    #[arg(short, long, value_enum)]
    pub status: Option<ContactStatusArg>,

    /// New referrer
    #[arg(long, value_parser = validate_contact_id, conflicts_with = "clear_referrer")]
    pub referrer: Option<String>,

    /// Remove the referrer
    #[arg(long)]
    pub clear_referrer: bool,

    /// New cell
    #[arg(long, value_parser = validate_contact_id, conflicts_with = "clear_cell")]
    pub cell: Option<String>,

    /// Remove the cell
    #[arg(long)]
    pub clear_cell: bool,

    /// New city
    #[arg(long, value_parser = validate_required_text, conflicts_with = "clear_city")]
    pub city: Option<String>,

    /// Remove the city
    #[arg(long)]
    pub clear_city: bool,

    /// New birth date (YYYY-MM-DD)
    #[arg(long, value_parser = validate_birth_date, conflicts_with = "clear_birth_date")]
    pub birth_date: Option<NaiveDate>,

    /// Remove the birth date
    #[arg(long)]
    pub clear_birth_date: bool,

    /// Mark the encounter with God as done
    #[arg(long, conflicts_with = "no_encounter_with_god")]
    pub encounter_with_god: bool,

    /// Mark the encounter with God as not done
    #[arg(long)]
    pub no_encounter_with_god: bool,

    /// Mark as baptized
    #[arg(long, conflicts_with = "not_baptized")]
    pub baptized: bool,

    /// Mark as not baptized
    #[arg(long)]
    pub not_baptized: bool,

    /// Mark as a founder
    #[arg(long, conflicts_with = "not_founder")]
    pub founder: bool,

    /// Mark as not a founder
    #[arg(long)]
    pub not_founder: bool,

    /// Attach a photo from a local file
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl EditArgs {
    /// Requested encounter flag, if either form was given.
    pub fn encounter_with_god_flag(&self) -> Option<bool> {
        paired_flag(self.encounter_with_god, self.no_encounter_with_god)
    }

    /// Requested baptized flag, if either form was given.
    pub fn baptized_flag(&self) -> Option<bool> {
        paired_flag(self.baptized, self.not_baptized)
    }

    /// Requested founder flag, if either form was given.
    pub fn founder_flag(&self) -> Option<bool> {
        paired_flag(self.founder, self.not_founder)
    }
}

/// `--x` and `--no-x` conflict at parse time, so at most one is set.
fn paired_flag(set: bool, unset: bool) -> Option<bool> {
    match (set, unset) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
