use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use readmes::cli;

#[derive(Parser)]
#[command(name = "readmes", version)]
#[command(
    about = "Regenerate README.md in every package directory of a repository",
    long_about = None
)]
struct Cli {
    /// Repository root (defaults to the parent of the directory holding this executable)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Path to config file (defaults to <root>/readmes.toml or ~/.config/readmes/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the documentation tool in every package and overwrite its README (default)
    Generate {
        /// Kill the documentation tool after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Fail if any README differs from what the documentation tool would write
    Check {
        /// Kill the documentation tool after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the package directories that would be processed
    List,

    /// Show the effective configuration and check that the tool can be started
    ConfigCheck,
}

fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = cli.root.as_deref();
    let config = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Generate { timeout: None }) {
        Commands::Generate { timeout } => cli::generate::run(root, config, timeout)?,
        Commands::Check { timeout } => cli::check::run(root, config, timeout)?,
        Commands::List => cli::list::run(root, config)?,
        Commands::ConfigCheck => cli::config_check::run(root, config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_no_args_defaults_to_generate() {
        let cli = Cli::try_parse_from(["readmes"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.root.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_generate_with_timeout() {
        let cli = Cli::try_parse_from(["readmes", "generate", "--timeout", "30"]).unwrap();
        match cli.command {
            Some(Commands::Generate { timeout }) => assert_eq!(timeout, Some(30)),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "readmes",
            "check",
            "--root",
            "/tmp/repo",
            "--config",
            "custom.toml",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.root.unwrap(), PathBuf::from("/tmp/repo"));
        assert_eq!(cli.config.unwrap(), PathBuf::from("custom.toml"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Check { timeout: None })));
    }

    #[test]
    fn test_parse_list_and_config_check() {
        let cli = Cli::try_parse_from(["readmes", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        let cli = Cli::try_parse_from(["readmes", "config-check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ConfigCheck)));
    }

    #[test]
    fn test_parse_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["readmes", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        assert!(Cli::try_parse_from(["readmes", "foobar"]).is_err());
    }

    #[test]
    fn test_parse_rejects_positional() {
        assert!(Cli::try_parse_from(["readmes", "generate", "extra"]).is_err());
    }
}
