#![deny(missing_docs)]

//! # apidoc CLI
//!
//! Command Line Interface for the API documentation compiler.
//!
//! Supported Commands:
//! - `compile`: Adds documentation models and method metadata to a packaged template.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod compile;
mod config;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "API Gateway documentation compiler")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile documentation into a CloudFormation template.
    Compile(compile::CompileArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Compile(args) => compile::execute(args)?,
    }

    Ok(())
}
