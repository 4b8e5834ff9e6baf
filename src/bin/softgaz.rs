//! softgaz - soft-gazetteer features for NER
//!
//! Run `softgaz --help` for usage.

use std::process::ExitCode;

use clap::Parser;

use softgaz::cli::commands::{cmd_features, cmd_layout, cmd_lookup};
use softgaz::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let quiet = cli.quiet;
    let result: Result<(), String> = match cli.command {
        Commands::Features(args) => cmd_features(args, quiet),
        Commands::Layout(args) => cmd_layout(args),
        Commands::Lookup(args) => cmd_lookup(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
