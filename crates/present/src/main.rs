mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod nav;
mod render;
mod theme;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.log_level(), cli.no_color);

    if let Err(e) = cli.run() {
        tracing::debug!("fatal: {e:?}");
        eprintln!("{} {e:#}", colored::Colorize::red("error:"));
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the level picked from the command line.
fn init_logging(level: &str, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("present={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}
