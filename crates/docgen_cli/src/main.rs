//! docgen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or selection
//! - 3: Data error
//! - 4: Template error
//! - 5: Rendering backend error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod menu;
mod opener;

use commands::{Cli, Commands};
use docgen_core::{BackendError, CoreError};
use docgen_data::DataError;
use docgen_templates::TemplateError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const DATA_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const BACKEND_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match &cli.command {
        Commands::Generate(args) => commands::generate::execute(&cli, args).await,
        Commands::List(args) => commands::list::execute(&cli, args),
        Commands::Render(args) => commands::render::execute(&cli, args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,docgen_cli={level},docgen_core={level},docgen_data={level},docgen_templates={level}"
        ))
    });

    // Logs go to stderr so menus and rendered markup keep stdout.
    let registry = tracing_subscriber::registry().with(filter);
    let log_result = if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Map the innermost recognised error to an exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return match err {
                CoreError::Data(_) | CoreError::EmptyRecordSet(_) => ExitCodes::DATA_ERROR,
                CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
                CoreError::Backend(_) => ExitCodes::BACKEND_ERROR,
                CoreError::Config { .. }
                | CoreError::InvalidPattern { .. }
                | CoreError::RecordOutOfRange { .. }
                | CoreError::RecordNotFound(_) => ExitCodes::INVALID_ARGS,
                CoreError::Io(_) => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<DataError>().is_some() {
            return ExitCodes::DATA_ERROR;
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
        if cause.downcast_ref::<BackendError>().is_some() {
            return ExitCodes::BACKEND_ERROR;
        }
        if cause.downcast_ref::<commands::SelectionError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}
