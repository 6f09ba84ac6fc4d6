//! Command-line interface.
//!
//! Without a subcommand the binary opens the profile wizard; the
//! subcommands are quick non-interactive views of the same account.

mod commands;
mod common;
pub mod completions;

pub use common::*;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

/// Complete and manage your Servimatch profile from the terminal
#[derive(Parser, Debug)]
#[command(name = "servimatch", version, about, long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/servimatch/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file and SERVIMATCH_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Access token to use instead of the stored session
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Disable colors in the TUI (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_colors: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current profile and weekly availability
    Profile,
    /// Show the number of unread notifications
    Notifications {
        /// Mark every notification as read afterwards
        #[arg(long)]
        mark_read: bool,
    },
    /// List bookable time slots of a plan for one day
    Slots {
        /// Plan id
        #[arg(long)]
        plan: u64,
        /// Day to check (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Check a phone number against the accepted format
    CheckPhone {
        /// Number to check, e.g. "+56 912345678"
        value: String,
    },
    /// Upload an image to your worker gallery
    UploadPhoto {
        /// Path to the image
        path: String,
    },
    /// Store an access token for later runs
    Login {
        /// Access token
        access: String,
        /// Refresh token
        #[arg(long)]
        refresh: Option<String>,
    },
    /// Shows logs location and how to view them
    Logs,
    /// Generate shell completions
    Completions {
        /// Target shell (detected from $SHELL when omitted)
        shell: Option<Shell>,
    },
}

impl Cli {
    /// Run the selected subcommand. Does nothing without one.
    ///
    /// Failed checks come back as a non-zero exit code so `main` can flush
    /// the log writer before the process ends.
    pub fn execute(self) -> Result<ExitCode> {
        let Some(command) = self.command else {
            return Ok(ExitCode::SUCCESS);
        };

        let result = match command {
            Commands::CheckPhone { value } => return Ok(commands::check_phone(&value)),
            Commands::Logs => commands::logs(),
            Commands::Completions { shell } => completions::generate(shell),
            command => {
                let ctx = CliContext::load(
                    self.config.as_deref(),
                    self.api_url.as_deref(),
                    self.token.as_deref(),
                )?;
                match command {
                    Commands::Profile => commands::profile(&ctx),
                    Commands::Notifications { mark_read } => {
                        commands::notifications(&ctx, mark_read)
                    }
                    Commands::Slots { plan, date } => commands::slots(&ctx, plan, date),
                    Commands::UploadPhoto { path } => commands::upload_photo(&ctx, &path),
                    Commands::Login { access, refresh } => commands::login(&ctx, access, refresh),
                    Commands::CheckPhone { .. } | Commands::Logs | Commands::Completions { .. } => {
                        Ok(())
                    }
                }
            }
        };
        result.map(|()| ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_slots_with_globals() {
        let cli = Cli::try_parse_from([
            "servimatch",
            "--api-url",
            "http://localhost:8000",
            "slots",
            "--plan",
            "7",
            "--date",
            "2026-03-02",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
        match cli.command {
            Some(Commands::Slots { plan, date }) => {
                assert_eq!(plan, 7);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["servimatch", "slots", "--plan", "1", "--date", "mañana"]).is_err());
    }

    #[test]
    fn test_check_phone_exit_codes() {
        let valid = Cli::try_parse_from(["servimatch", "check-phone", "+56 912345678"]).unwrap();
        assert_eq!(valid.execute().unwrap(), ExitCode::SUCCESS);

        let invalid = Cli::try_parse_from(["servimatch", "check-phone", "12345"]).unwrap();
        assert_eq!(invalid.execute().unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn test_no_command_opens_wizard() {
        let cli = Cli::try_parse_from(["servimatch", "--token", "abc"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.token.as_deref(), Some("abc"));
    }
}
