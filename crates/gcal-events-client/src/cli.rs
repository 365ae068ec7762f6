//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gcal-events - authorize against Google Calendar, list upcoming events and
/// create a fortnightly batch of events
///
/// Without a subcommand, lists upcoming events and then creates the batch.
#[derive(Debug, Parser)]
#[command(name = "gcal-events")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "GCAL_EVENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authorize access and cache the token
    Auth {
        /// Discard the cached token and authorize again
        #[arg(long, short)]
        force: bool,
    },

    /// List upcoming events
    List {
        /// Maximum number of events to show
        #[arg(long)]
        max_results: Option<u32>,

        /// Calendar to read from
        #[arg(long)]
        calendar: Option<String>,
    },

    /// Create a batch of events at a fixed interval
    Create {
        /// Start of the first event (RFC 3339, e.g. 2017-10-05T08:00:00-05:00)
        #[arg(long)]
        start: Option<String>,

        /// Number of events to create
        #[arg(long)]
        count: Option<usize>,

        /// Days between consecutive events
        #[arg(long)]
        interval_days: Option<i64>,

        /// Print the events without contacting Google
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_default_run() {
        let cli = Cli::try_parse_from(["gcal-events"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn parse_create_overrides() {
        let cli = Cli::try_parse_from([
            "gcal-events",
            "-v",
            "create",
            "--start",
            "2024-01-04T09:00:00+01:00",
            "--count",
            "3",
            "--interval-days",
            "7",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Some(Command::Create {
                start,
                count,
                interval_days,
                dry_run,
            }) => {
                assert_eq!(start.as_deref(), Some("2024-01-04T09:00:00+01:00"));
                assert_eq!(count, Some(3));
                assert_eq!(interval_days, Some(7));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_list_and_auth() {
        let cli =
            Cli::try_parse_from(["gcal-events", "list", "--max-results", "5", "--calendar", "work"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::List { max_results: Some(5), calendar: Some(ref c) }) if c == "work"
        ));

        let cli = Cli::try_parse_from(["gcal-events", "auth", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Auth { force: true })));
    }

    #[test]
    fn rejects_non_numeric_count() {
        assert!(Cli::try_parse_from(["gcal-events", "create", "--count", "six"]).is_err());
    }
}
