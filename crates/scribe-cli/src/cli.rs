use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for the `scribe` binary.
///
/// Requests are read from stdin, responses written to stdout as JSON.
#[derive(Debug, Parser)]
#[command(name = "scribe", version, about = "scribe - static Python documentation extractor")]
pub struct Cli {
    /// Read one request per line and answer each on its own line
    #[arg(short = 'l', long)]
    pub line_by_line: bool,

    /// Directory searched for Python modules; repeatable, overrides the config
    #[arg(short = 's', long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Extra TOML configuration file, layered over `.scribe/config.toml`
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print environment information and exit
    #[arg(long)]
    pub debug_info: bool,

    /// Quiet mode (errors only on stderr)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_paths_repeat() {
        let cli = Cli::try_parse_from(["scribe", "-l", "-s", "src", "--search-path", "lib"])
            .expect("cli should parse");
        assert!(cli.line_by_line);
        assert_eq!(cli.search_paths.len(), 2);
        assert!(!cli.verbose);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["scribe", "-q", "-v"]).is_err());
    }
}
