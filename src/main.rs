//! Tickform - command-line front end for the form serializer

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tickform::config::PanelConfig;
use tickform::form::{self, FormEntry};

/// Configuration form core for a ticker display panel
#[derive(Parser)]
#[command(name = "tickform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Form fields as NAME=VALUE pairs, in document order
    #[arg(value_name = "NAME=VALUE")]
    fields: Vec<String>,

    /// Decode the serialized form into the typed panel configuration
    #[arg(long)]
    typed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check crates.io for a newer tickform release
    CheckUpdate,
}

fn main() -> Result<()> {
    // Log to /tmp/tickform.log - tail with: tail -f /tmp/tickform.log
    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let file_appender = tracing_appender::rolling::never("/tmp", "tickform.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            // For actual errors, show error + help
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::CheckUpdate) => cmd_check_update(),
        None => cmd_serialize(&cli.fields, cli.typed),
    }
}

fn cmd_serialize(raw_fields: &[String], typed: bool) -> Result<()> {
    let entries = raw_fields
        .iter()
        .map(|raw| parse_field(raw))
        .collect::<Result<Vec<_>>>()?;
    let serialized = form::serialize(&entries);

    let output = if typed {
        let config = PanelConfig::from_form(&serialized)?;
        serde_json::to_string_pretty(&config).context("Failed to encode panel configuration")?
    } else {
        serde_json::to_string_pretty(&serialized).context("Failed to encode serialized form")?
    };
    println!("{output}");
    Ok(())
}

fn cmd_check_update() -> Result<()> {
    match tickform::update::check_for_update()? {
        Some(info) => println!(
            "Update available: {} -> {}",
            info.current_version, info.latest_version
        ),
        None => println!("tickform is up to date."),
    }
    Ok(())
}

fn parse_field(raw: &str) -> Result<FormEntry> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid field {raw:?}, expected NAME=VALUE"))?;
    Ok(FormEntry::new(name, value))
}
