//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::domain::Millis;

/// Terminal rendition of the "Without / With Simbian" showcase.
#[derive(Parser, Debug)]
#[command(name = "simbian-showcase", version, about)]
pub struct Cli {
    /// Config file to load instead of searching for `config.toml`.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for alert messages and icons; repeats a run exactly.
    #[arg(long, env = "SIMBIAN_SEED")]
    pub seed: Option<u64>,

    /// Disable card timers and counter interpolation.
    #[arg(long)]
    pub no_animate: bool,

    /// Run without a terminal and print the event transcript.
    #[arg(long)]
    pub headless: bool,

    /// Virtual time to run in headless mode.
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    pub duration_ms: Millis,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log file for the interactive mode (overrides config).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
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
    fn defaults() {
        let cli = Cli::parse_from(["simbian-showcase"]);
        assert!(cli.config.is_none());
        assert!(!cli.headless);
        assert!(!cli.no_animate);
        assert_eq!(cli.duration_ms, 30_000);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn headless_run_options() {
        let cli = Cli::parse_from([
            "simbian-showcase",
            "--headless",
            "--seed",
            "7",
            "--duration-ms",
            "45000",
            "-vv",
            "-c",
            "demo.toml",
        ]);
        assert!(cli.headless);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.duration_ms, 45_000);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("demo.toml")));
    }

    #[test]
    fn rejects_negative_duration() {
        assert!(Cli::try_parse_from(["simbian-showcase", "--duration-ms", "-5"]).is_err());
    }
}
