//! Divvy command-line tool.
//!
//! Reads one JSON split request from a file or stdin, splits it and prints
//! the shares (or the payer summary) as JSON on stdout. Rejections are
//! printed as a JSON error object on stderr with a non-zero exit code.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use divvy_core::{ErrorCategory, SplitError, SplitRequest, SplitResult, SplitService, SplitSettings};
use divvy_shared::AppConfig;
use divvy_shared::config::LoggingConfig;

/// Exit code for a request the engine rejected.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "divvy")]
#[command(version, about = "Split an expense between participants")]
struct Cli {
    /// JSON split request. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Print who owes the payer instead of the raw shares.
    #[arg(long)]
    summary: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Configuration file (also read from `DIVVY_CONFIG`).
    #[arg(long, env = "DIVVY_CONFIG")]
    config: Option<PathBuf>,
}

/// Error body printed for rejected requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    category: ErrorCategory,
    status: u16,
    message: String,
}

impl From<&SplitError> for ErrorBody {
    fn from(err: &SplitError) -> Self {
        Self {
            code: err.error_code(),
            category: err.category(),
            status: err.http_status_code(),
            message: err.to_string(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let request = read_request(cli.input.as_deref())?;
    let service = SplitService::new(SplitSettings::from(&config.split));

    match service.calculate(&request) {
        Ok(result) => {
            info!(
                policy = %result.policy(),
                participants = result.len(),
                "split calculated"
            );
            println!("{}", render_result(&result, cli.summary, cli.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            info!(code = err.error_code(), "split rejected");
            eprintln!("{}", render_error(&err, cli.pretty)?);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => AppConfig::load().context("failed to load configuration"),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let (plain, json) = if logging.json {
        (None, Some(fmt::layer().json().with_writer(io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

fn read_request(input: Option<&Path>) -> anyhow::Result<SplitRequest> {
    let raw = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read request from stdin")?;
            buffer
        }
    };
    parse_request(&raw)
}

fn parse_request(raw: &str) -> anyhow::Result<SplitRequest> {
    serde_json::from_str(raw).context("invalid split request")
}

fn render_result(result: &SplitResult, summary: bool, pretty: bool) -> serde_json::Result<String> {
    if summary {
        to_json(&result.summary(), pretty)
    } else {
        to_json(result, pretty)
    }
}

fn render_error(err: &SplitError, pretty: bool) -> serde_json::Result<String> {
    to_json(&ErrorBody::from(err), pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
