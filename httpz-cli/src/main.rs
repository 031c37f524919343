use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use httpz_codec::{build_json, parse};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

use config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "httpz", about = "Convert raw HTTP messages to JSON models and back")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a raw HTTP message into a JSON model.
    Parse {
        file: Option<PathBuf>,
        #[arg(long = "optional-host")]
        optional_host: bool,
        #[arg(long = "normalize-eol")]
        normalize_eol: bool,
        #[arg(long)]
        compact: bool,
    },
    /// Build a raw HTTP message from a JSON model.
    Build {
        file: Option<PathBuf>,
        #[arg(long = "optional-host")]
        optional_host: bool,
    },
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref())?;
    debug!(?config, "loaded config");

    match cli.command {
        Command::Parse {
            file,
            optional_host,
            normalize_eol,
            compact,
        } => {
            if optional_host {
                config.parse.mandatory_host = false;
            }
            if normalize_eol {
                config.output.normalize_eol = true;
            }
            if compact {
                config.output.pretty = false;
            }
            let raw = read_input(file.as_deref())?;
            let raw = if config.output.normalize_eol {
                to_crlf(&raw)
            } else {
                raw
            };
            let message = parse(&raw, config.parse).map_err(|err| err.to_string())?;
            let json = if config.output.pretty {
                serde_json::to_string_pretty(&message)
            } else {
                serde_json::to_string(&message)
            }
            .map_err(|err| err.to_string())?;
            println!("{json}");
        }
        Command::Build {
            file,
            optional_host,
        } => {
            if optional_host {
                config.build.mandatory_host = false;
            }
            let raw = read_input(file.as_deref())?;
            let model: serde_json::Value =
                serde_json::from_str(&raw).map_err(|err| err.to_string())?;
            let message = build_json(&model, config.build).map_err(|err| err.to_string())?;
            print!("{message}");
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| err.to_string())?;
            Ok(raw)
        }
    }
}

/// Rewrites bare LF line endings to CRLF.
fn to_crlf(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\n', "\r\n")
}
