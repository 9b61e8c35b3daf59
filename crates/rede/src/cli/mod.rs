//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: create `.rede/` with config and empty data files
//! - `tree`: print the referral forest
//! - `standby`: list members with no referral link
//! - `view`: filter by level and expansion and print coordinates
//! - `show`: one member with lineage and referrals
//! - `stats`: summary counts
//! - `edit`: change a contact through the edit session
//!
//! `--json` applies to every command.
//!
//! # Example
//!
//! ```bash
//! rede view --levels 0,1 --expand ana
//! rede edit bia --status member --referrer ana
//! rede edit bia --baptized --birth-date 1990-04-12
//! rede --json stats
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{EditArgs, InitArgs, ShowArgs, StandbyArgs, StatsArgs, TreeArgs, ViewArgs};
pub use types::ContactStatusArg;
pub use validators::{validate_contact_id, validate_level, validate_required_text};

/// Rede - member genealogy for community cells
///
/// Reads contacts and cells from `.rede/*.jsonl` and shows who referred
/// whom.
#[derive(Parser, Debug)]
#[command(name = "rede")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new rede repository
    ///
    /// Creates `.rede/` with a default configuration and empty contacts and
    /// cells files.
    Init(InitArgs),

    /// Show the referral trees
    ///
    /// Each member with referrals and no referrer starts a tree.
    Tree(TreeArgs),

    /// List members on standby
    ///
    /// Members who neither referred anyone nor were referred.
    Standby(StandbyArgs),

    /// Show a filtered, laid-out view
    ///
    /// Prints visible members with coordinates and the referral links
    /// between them.
    View(ViewArgs),

    /// Show one member in detail
    Show(ShowArgs),

    /// Show network statistics
    Stats(StatsArgs),

    /// Edit a contact
    ///
    /// Required fields are checked before saving; referral cycles are
    /// refused.
    Edit(EditArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args, output_mode).await,
            Some(Commands::Tree(_)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_tree(&app, output_mode).await
            }
            Some(Commands::Standby(_)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_standby(&app, output_mode).await
            }
            Some(Commands::View(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_view(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Stats(_)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_stats(&app, output_mode).await
            }
            Some(Commands::Edit(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_edit(&mut app, args, output_mode).await
            }
            None => {
                println!("Rede member genealogy");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["rede"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parse_global_json_flag() {
        let cli = Cli::try_parse_from(["rede", "tree", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Tree(_))));
    }

    #[test]
    fn parse_init_quiet() {
        let cli = Cli::try_parse_from(["rede", "init", "-q"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => assert!(args.quiet),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_view_options() {
        let cli = Cli::try_parse_from([
            "rede", "view", "--levels", "0,1", "--expand", "ana", "-e", "bia", "--focus", "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::View(args)) => {
                assert_eq!(args.levels, vec![0, 1]);
                assert_eq!(args.expand, vec!["ana", "bia"]);
                assert!(!args.expand_all);
                assert_eq!(args.focus, Some(2));
            }
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn parse_view_defaults() {
        let cli = Cli::try_parse_from(["rede", "view"]).unwrap();
        match cli.command {
            Some(Commands::View(args)) => {
                assert!(args.levels.is_empty());
                assert!(args.expand.is_empty());
                assert_eq!(args.focus, None);
            }
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn expand_all_conflicts_with_expand() {
        let result = Cli::try_parse_from(["rede", "view", "--expand-all", "--expand", "ana"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_view_rejects_bad_level() {
        assert!(Cli::try_parse_from(["rede", "view", "--levels", "0,x"]).is_err());
    }

    #[test]
    fn parse_show_requires_id() {
        assert!(Cli::try_parse_from(["rede", "show"]).is_err());
        assert!(Cli::try_parse_from(["rede", "show", " "]).is_err());
    }

    #[test]
    fn parse_edit_fields() {
        let cli = Cli::try_parse_from([
            "rede",
            "edit",
            "bia",
            "--name",
            "Bia Lima",
            "--status",
            "member",
            "--referrer",
            "ana",
            "--clear-cell",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Edit(args)) => {
                assert_eq!(args.id, "bia");
                assert_eq!(args.name.as_deref(), Some("Bia Lima"));
                assert_eq!(args.status, Some(ContactStatusArg::Member));
                assert_eq!(args.referrer.as_deref(), Some("ana"));
                assert!(args.clear_cell);
                assert!(!args.clear_referrer);
            }
            _ => panic!("Expected Edit command"),
        }
    }

    #[test]
    fn edit_referrer_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "rede",
            "edit",
            "bia",
            "--referrer",
            "ana",
            "--clear-referrer",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_edit_discipleship_fields() {
        let cli = Cli::try_parse_from([
            "rede",
            "edit",
            "bia",
            "--baptized",
            "--not-founder",
            "--birth-date",
            "1990-04-12",
            "--city",
            "sp",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Edit(args)) => {
                assert_eq!(args.baptized_flag(), Some(true));
                assert_eq!(args.founder_flag(), Some(false));
                assert_eq!(args.encounter_with_god_flag(), None);
                assert_eq!(
                    args.birth_date,
                    chrono::NaiveDate::from_ymd_opt(1990, 4, 12)
                );
                assert_eq!(args.city.as_deref(), Some("sp"));
            }
            _ => panic!("Expected Edit command"),
        }
    }

    #[test]
    fn edit_flag_pairs_conflict() {
        assert!(Cli::try_parse_from(["rede", "edit", "bia", "--baptized", "--not-baptized"]).is_err());
        assert!(
            Cli::try_parse_from([
                "rede",
                "edit",
                "bia",
                "--encounter-with-god",
                "--no-encounter-with-god"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["rede", "edit", "bia", "--city", "sp", "--clear-city"]).is_err());
    }

    #[test]
    fn edit_rejects_bad_birth_date() {
        assert!(Cli::try_parse_from(["rede", "edit", "bia", "--birth-date", "12/04/1990"]).is_err());
    }

    #[test]
    fn edit_rejects_blank_name() {
        assert!(Cli::try_parse_from(["rede", "edit", "bia", "--name", "  "]).is_err());
    }
}
