//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

/// Extract titled row/column series from text files.
#[derive(Debug, Parser)]
#[command(name = "multidata", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration string: `glob,type,range[,label_mode[,skip_head]];...;key=value`.
    /// Omit it to replay the last saved session.
    #[arg(value_name = "CONFIG")]
    pub config: Option<String>,

    /// Session record to read and write (defaults to infile.json).
    #[arg(long, value_name = "PATH")]
    pub session: Option<PathBuf>,

    /// Print every extracted series, not just the titles.
    #[arg(long)]
    pub contents: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print shell completions and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_config_and_flags() {
        let cli = Cli::parse_from(["multidata", "-vv", "--contents", "*.dat,row,[0]"]);
        assert_eq!(cli.config.as_deref(), Some("*.dat,row,[0]"));
        assert!(cli.contents);
        assert_eq!(cli.verbose, 2);
        assert!(cli.session.is_none());
    }

    #[test]
    fn config_is_optional() {
        let cli = Cli::parse_from(["multidata", "--session", "state.yaml"]);
        assert!(cli.config.is_none());
        assert_eq!(cli.session, Some(PathBuf::from("state.yaml")));
    }
}
