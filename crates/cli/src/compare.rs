//! `bcompare compare`: run one reconciliation between two exports.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{error, info};

use benefits_io::{assign_roles, UploadedFile};
use benefits_recon::model::CompareInput;
use benefits_recon::{run, CompareConfig, ReconResult, Schema};

use crate::exit_codes::{io_exit_code, recon_exit_code, EXIT_CHANGES, EXIT_IO};
use crate::{to_json, write_output, CliError};

#[derive(Args)]
pub struct CompareArgs {
    /// First export (.csv or .xlsx)
    pub first: PathBuf,

    /// Second export (.csv or .xlsx)
    pub second: PathBuf,

    /// Validate and normalize typed columns before matching
    #[arg(long)]
    pub validate: bool,

    /// Same pass as --validate
    #[arg(long)]
    pub normalize: bool,

    /// File-name prefix of the primary export
    #[arg(long, value_name = "PREFIX", env = "BCOMPARE_PRIMARY_PREFIX")]
    pub primary_prefix: Option<String>,

    /// Read run settings from a TOML file (flags win)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the JSON report to a file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output the JSON report to stdout instead of one line per record
    #[arg(long)]
    pub json: bool,

    /// Exit 1 when the report contains any record
    #[arg(long)]
    pub strict_exit: bool,

    /// Suppress the summary line on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl CompareArgs {
    /// Layer flags and environment over the file settings.
    fn apply(&self, config: &mut CompareConfig) {
        if let Some(prefix) = &self.primary_prefix {
            config.primary_prefix = prefix.clone();
        }
        config.validate |= self.validate;
        config.normalize |= self.normalize;
        if let Some(path) = &self.output {
            config.output.json = Some(path.display().to_string());
        }
    }
}

/// The caller sees a generic message; the cause goes to the log.
fn comparison_failed(code: u8, cause: &dyn std::fmt::Display) -> CliError {
    error!(exit_code = code, "{cause}");
    CliError::new(code, "comparison failed")
        .with_hint("the log output above names the cause")
}

fn load_config(path: Option<&Path>) -> Result<CompareConfig, CliError> {
    let Some(path) = path else {
        return Ok(CompareConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display()))
    })?;
    CompareConfig::from_toml(&text).map_err(|e| CliError::new(recon_exit_code(&e), e.to_string()))
}

fn execute(args: &CompareArgs, config: &CompareConfig) -> Result<ReconResult, CliError> {
    let io_failed = |e: benefits_io::IoError| comparison_failed(io_exit_code(&e), &e);

    let files = vec![
        UploadedFile::from_path(&args.first).map_err(io_failed)?,
        UploadedFile::from_path(&args.second).map_err(io_failed)?,
    ];
    let (primary, partner) = assign_roles(files, &config.primary_prefix).map_err(io_failed)?;
    info!(primary = %primary.name, partner = %partner.name, "sources assigned");

    let input = CompareInput {
        primary: primary.read_table().map_err(io_failed)?,
        partner: partner.read_table().map_err(io_failed)?,
    };
    run(input, &config.options(), &Schema::standard())
        .map_err(|e| comparison_failed(recon_exit_code(&e), &e))
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config
        .validate()
        .map_err(|e| CliError::new(recon_exit_code(&e), e.to_string()))?;

    let result = execute(&args, &config)?;
    let json_str = to_json(&result.report)?;

    if let Some(path) = &config.output.json {
        write_output(Path::new(path), &json_str)?;
    }

    if args.json {
        println!("{json_str}");
    } else {
        for record in &result.report.general {
            println!(
                "{}, {} ({}): {}",
                record.key.last_name,
                record.key.first_name,
                record.key.dob,
                record.change()
            );
        }
    }

    if !args.quiet {
        eprintln!("{}", result.summary);
    }

    if args.strict_exit && !result.report.general.is_empty() {
        return Err(CliError::new(EXIT_CHANGES, "differences found"));
    }
    Ok(())
}
