#![deny(missing_docs)]

//! # Compile Command
//!
//! Reads a packaged CloudFormation template and a service file, runs the
//! documentation compile pass, and writes the updated template.

use crate::config::{Overrides, ServiceConfig};
use crate::error::{CliError, CliResult};
use apidoc_core::{compile, Template};
use std::fs;
use std::path::PathBuf;

/// Arguments for the compile command.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Path to the compiled CloudFormation template (JSON).
    #[clap(long)]
    pub template: PathBuf,

    /// Path to the service configuration (YAML).
    #[clap(long, default_value = "serverless.yml")]
    pub config: PathBuf,

    /// Output path for the updated template. Prints to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Chain independent models to stay under the API Gateway rate limit.
    #[clap(long, conflicts_with = "no_split_models")]
    pub split_models: bool,

    /// Do not chain models, even when the service file enables it.
    #[clap(long)]
    pub no_split_models: bool,

    /// Number of models created in parallel when chaining.
    #[clap(long)]
    pub split_models_limit: Option<usize>,

    /// Do not add documented parameters to method request parameters.
    #[clap(long, env = "APIDOC_SAFE_MODE")]
    pub safe_mode: bool,
}

impl CompileArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            split_models: match (self.split_models, self.no_split_models) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            split_models_limit: self.split_models_limit,
            safe_mode: self.safe_mode,
        }
    }
}

/// Executes the compile command.
pub fn execute(args: &CompileArgs) -> CliResult<()> {
    if !args.template.exists() {
        return Err(CliError::General(format!(
            "Template not found: {:?}",
            args.template
        )));
    }

    let config = ServiceConfig::load(&args.config)?;
    let raw = fs::read_to_string(&args.template)?;
    let mut template: Template = serde_json::from_str(&raw)?;

    match config.compile_input(&args.overrides()) {
        Some(input) => {
            compile(&mut template, &input)?;
        }
        None => tracing::warn!("no custom.documentation configured, template left unchanged"),
    }

    let rendered = template.to_json_string_pretty()?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, rendered)?;
            tracing::info!(output = %path.display(), "template written");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
