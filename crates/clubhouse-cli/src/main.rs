//! Clubhouse CLI - Ask questions about university club documents.

use clap::Parser;
use clubhouse_cli::commands;
use clubhouse_cli::repl;
use clubhouse_cli::{Cli, Command, Formatter, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> clubhouse_cli::Result<()> {
    if let Some(Command::Init(args)) = cli.command {
        let path = match cli.config {
            Some(path) => path,
            None => Settings::default_path()?,
        };
        let formatter = Formatter::new(cli.format.map(Into::into).unwrap_or_default(), !cli.no_color);
        return commands::execute_init(args, &path, &formatter);
    }

    let settings = Settings::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(settings.output.format);
    let color_enabled = !cli.no_color && settings.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Some(Command::Ingest(args)) => {
            commands::execute_ingest(args, &settings, &formatter).await?;
        }
        Some(Command::Query(args)) => {
            let engine = commands::build_engine(&settings, &formatter).await?;
            commands::execute_query(args, &engine, &formatter).await?;
        }
        Some(Command::Chat(args)) => {
            let engine = commands::build_engine(&settings, &formatter).await?;
            repl::run_chat(args, &engine, &settings, &formatter).await?;
        }
        None => {
            let engine = commands::build_engine(&settings, &formatter).await?;
            repl::run_chat(Default::default(), &engine, &settings, &formatter).await?;
        }
        Some(Command::Init(_)) => {}
    }

    Ok(())
}
