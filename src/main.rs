//! castfeed - A podcast RSS feed generator for a directory of audio files.

mod cli;
mod config;
mod generator;
mod library;
mod logger;
mod utils;

use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ConfigError;
use generator::feed::FeedError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let result = match &cli.command {
        Commands::Init { force } => cli::init::write_config(&cli.config, *force),
        Commands::Build { build_args } => cli::build::run_build(&cli.config, build_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Map a failure to its process exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(feed) = err.downcast_ref::<FeedError>() {
        feed.exit_code()
    } else if err.downcast_ref::<ConfigError>().is_some() {
        2
    } else {
        1
    }
}
