//! Command-line argument parsing.

use clap::{Parser, Subcommand};

/// Fuzzy-keyed cache in front of the OpenLibrary search API.
///
/// Configuration is read from FUZZCACHE_* environment variables and the TOML
/// file named by FUZZCACHE_CONFIG_FILE.
#[derive(Parser, Debug)]
#[command(name = "fuzzcache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a query against the cache, fetching upstream on a miss
    Search {
        /// Query words; joined with single spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Drop expired entries and trim the cache to max_entries
    Purge,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn search_query(args: &[&str]) -> String {
        match Cli::try_parse_from(args).unwrap().command {
            Command::Search { query } => query.join(" "),
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_joins_words() {
        assert_eq!(search_query(&["fuzzcache", "search", "Lord", "of", "the", "Rings"]), "Lord of the Rings");
        assert_eq!(search_query(&["fuzzcache", "search", "project hail mary"]), "project hail mary");
    }

    #[test]
    fn test_search_requires_query() {
        let err = Cli::try_parse_from(["fuzzcache", "search"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_purge() {
        let cli = Cli::try_parse_from(["fuzzcache", "purge"]).unwrap();
        assert_eq!(cli.command, Command::Purge);

        assert!(Cli::try_parse_from(["fuzzcache", "purge", "now"]).is_err());
    }

    #[test]
    fn test_missing_and_unknown_commands() {
        assert!(Cli::try_parse_from(["fuzzcache"]).is_err());
        let err = Cli::try_parse_from(["fuzzcache", "fetch"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
