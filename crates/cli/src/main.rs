// bcompare - reconcile a benefit enrollment export against a partner export

mod compare;
mod exit_codes;
mod headers;
mod inspect;
mod logging;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use logging::{init_logging, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "bcompare")]
#[command(about = "Compare a benefit enrollment export against a partner export")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit log level (overrides -v)
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatArg,

    /// Append logs to this file as well as stderr
    #[arg(long, value_name = "PATH", env = "LOG_FILE_PATH", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two exports and report every added, removed or changed individual
    #[command(after_help = "\
Examples:
  bcompare compare Enrollment_jan.csv partner.xlsx
  bcompare compare partner.csv Enrollment_jan.csv --validate --json
  bcompare compare a.csv b.csv --primary-prefix Census --output report.json
  bcompare compare Enrollment.csv partner.csv --config compare.toml --strict-exit")]
    Compare(compare::CompareArgs),

    /// Show size, row count and header row of one export
    #[command(after_help = "\
Examples:
  bcompare inspect Enrollment_jan.xlsx
  bcompare inspect partner.csv --json")]
    Inspect {
        /// Export to inspect (.csv or .xlsx)
        file: PathBuf,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Show how each header of an export maps to a canonical field
    #[command(after_help = "\
Examples:
  bcompare headers partner.csv --source partner
  bcompare headers Enrollment_jan.xlsx --source primary --json")]
    Headers {
        /// Export whose header row to map (.csv or .xlsx)
        file: PathBuf,

        /// Which side's vocabulary to map with
        #[arg(long, value_enum)]
        source: SourceArg,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Primary,
    Partner,
}

impl From<SourceArg> for benefits_recon::SourceRole {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Primary => Self::Primary,
            SourceArg::Partner => Self::Partner,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  benefits-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  benefits-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Flag precedence: `--log-level` over `-v` over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::from_verbosity(cli.verbose);
    if let Some(level) = cli.log_level {
        config.use_env_filter = false;
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::from(EXIT_USAGE);
    }

    let result = match cli.command {
        Commands::Compare(args) => compare::cmd_compare(args),
        Commands::Inspect { file, json } => inspect::cmd_inspect(file, json),
        Commands::Headers { file, source, json } => headers::cmd_headers(file, source.into(), json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), hint: None }
    }

    pub fn from_io(err: benefits_io::IoError) -> Self {
        let hint = match &err {
            benefits_io::IoError::UnsupportedFileType(_) => {
                Some("save the export as .csv or .xlsx".to_string())
            }
            benefits_io::IoError::Encoding { .. } => {
                Some("re-save the file as UTF-8".to_string())
            }
            _ => None,
        };
        Self { code: exit_codes::io_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Write `contents` to `path` and note it on stderr.
pub fn write_output(path: &std::path::Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| {
        CliError::new(exit_codes::EXIT_IO, format!("cannot write {}: {e}", path.display()))
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(exit_codes::EXIT_IO, format!("JSON serialization error: {e}")))
}
