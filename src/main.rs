// ============================================================================
// src/main.rs – fastpbkdf2 command-line front end
// ============================================================================

mod cmd;
mod config;
mod ui;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ui::UX;

#[derive(Debug, Parser)]
#[command(name = "fastpbkdf2", version, about = "PBKDF2-HMAC-SHA1 key derivation")]
struct Cli {
    /// TOML or YAML file with derivation defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Suppress status output on stderr
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive a key from a password and salt
    Derive(cmd::derive::DeriveArgs),
    /// Print a random hex salt
    Salt {
        /// Salt length in bytes (config default: 16)
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Run RFC 6070 vectors and backend agreement checks
    Selftest,
    /// List SHA-1 compression backends
    Backends,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli, ui: &UX) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match &cli.command {
        Command::Derive(args) => cmd::derive::run_derive(ui, &cfg, args),
        Command::Salt { length } => cmd::salt::run_salt(ui, &cfg, *length),
        Command::Selftest => cmd::selftest::run_selftest(ui),
        Command::Backends => cmd::backends::run_backends(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ui = UX::new(cli.quiet);

    match run(&cli, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn derive_flags_parse() {
        let cli = Cli::try_parse_from([
            "fastpbkdf2",
            "derive",
            "--salt",
            "NaCl",
            "-i",
            "1000",
            "-l",
            "64",
            "--backend",
            "portable",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Command::Derive(args) => {
                assert_eq!(args.salt.as_deref(), Some("NaCl"));
                assert_eq!(args.iterations, Some(1000));
                assert_eq!(args.length, Some(64));
                assert_eq!(args.backend, Some(config::BackendChoice::Portable));
                assert_eq!(args.format, Some(config::OutputFormat::Json));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn derive_requires_a_salt() {
        assert!(Cli::try_parse_from(["fastpbkdf2", "derive"]).is_err());
        assert!(Cli::try_parse_from([
            "fastpbkdf2", "derive", "--salt", "a", "--salt-hex", "61"
        ])
        .is_err());
    }
}
