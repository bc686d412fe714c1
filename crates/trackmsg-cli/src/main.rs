use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trackmsg_core::{
    DEFAULT_MAX_CONTENT_LEN, DecoderConfig, Envelope, EnvelopeRecord, MessageRecord, ParseStatus,
    Report, decode_hex_message_with, make_report,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TRACKMSG_BUILD_COMMIT"),
    ", ",
    env!("TRACKMSG_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  trackmsg decode A430383A31353A3432... --stdout\n  trackmsg batch messages.txt -o report.json\n  trackmsg envelope request.json --stdout --pretty";

#[derive(Parser, Debug)]
#[command(name = "trackmsg")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for hex-encoded position messages (marker, time, lat/lon, altitude, text).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Decoder configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode hex messages given on the command line.
    Decode {
        /// One or more hex strings
        #[arg(required = true)]
        messages: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode every non-empty line of a file (glob patterns allowed).
    Batch {
        /// Path to a text file with one hex message per line
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a JSON envelope and decode its Content.
    Envelope {
        /// Path to a JSON envelope (glob patterns allowed)
        input: PathBuf,

        /// Reject Content longer than this many characters (0 disables the check)
        #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_LEN)]
        max_content_len: usize,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code unless every message decoded cleanly
    #[arg(long)]
    strict: bool,

    /// List warnings and fatal errors after decoding
    #[arg(long)]
    list_warnings: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Decode { messages, output } => cmd_decode(&messages, &config, &output),
        Commands::Batch { input, output } => cmd_batch(&input, &config, &output),
        Commands::Envelope {
            input,
            max_content_len,
            output,
        } => cmd_envelope(&input, max_content_len, &config, &output),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the context chain, e.g. "Failed to read x: No such file".
        CliError::new(format!("{:#}", err), None)
    }
}

/// A record plus the status used for `--strict` and `--list-warnings`.
trait Listed {
    fn record(&self) -> &MessageRecord;
    fn label(&self, index: usize) -> String;
}

impl Listed for MessageRecord {
    fn record(&self) -> &MessageRecord {
        self
    }

    fn label(&self, index: usize) -> String {
        format!("#{}", index + 1)
    }
}

impl Listed for EnvelopeRecord {
    fn record(&self) -> &MessageRecord {
        &self.record
    }

    fn label(&self, index: usize) -> String {
        format!("#{} IdNumber {}", index + 1, self.envelope.id_number)
    }
}

fn load_config(path: Option<&Path>) -> Result<DecoderConfig, CliError> {
    let Some(path) = path else {
        return Ok(DecoderConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = DecoderConfig::from_json_str(&json).map_err(|err| {
        CliError::new(
            format!("{}: {}", path.display(), err),
            Some("config keys: marker, separator, locale, altitude_unit".to_string()),
        )
    })?;
    debug!(path = %path.display(), ?config, "decoder config loaded");
    Ok(config)
}

fn cmd_decode(
    messages: &[String],
    config: &DecoderConfig,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let records: Vec<MessageRecord> = messages
        .iter()
        .map(|hex| decode_hex_message_with(hex.trim(), config).to_record())
        .collect();
    emit(make_report("arguments", records), output)
}

fn cmd_batch(input: &Path, config: &DecoderConfig, output: &OutputArgs) -> Result<(), CliError> {
    let resolved = resolve_input_path(input)?;
    validate_input_file(&resolved, input)?;
    ensure_report_differs(&resolved, output)?;
    let text = fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;

    let records: Vec<MessageRecord> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| decode_hex_message_with(line, config).to_record())
        .collect();
    info!(path = %resolved.display(), messages = records.len(), "batch decoded");
    emit(make_report(&resolved.display().to_string(), records), output)
}

fn cmd_envelope(
    input: &Path,
    max_content_len: usize,
    config: &DecoderConfig,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let resolved = resolve_input_path(input)?;
    validate_input_file(&resolved, input)?;
    ensure_report_differs(&resolved, output)?;
    let json = fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read envelope: {}", resolved.display()))?;

    let limit = (max_content_len > 0).then_some(max_content_len);
    let envelope = Envelope::from_json_str(&json, limit).map_err(|err| {
        CliError::new(
            format!("invalid envelope {}: {}", resolved.display(), err),
            Some(
                "required: IdNumber, Content, Time, MessageId, DeliveryCount, NetworkMode"
                    .to_string(),
            ),
        )
    })?;
    debug!(id_number = %envelope.id_number, "envelope accepted");

    let record = envelope.decode(config);
    emit(make_report(&resolved.display().to_string(), vec![record]), output)
}

fn emit<T: Serialize + Listed>(mut report: Report<T>, output: &OutputArgs) -> Result<(), CliError> {
    report.generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format timestamp")?;
    let json = serialize_report(&report, output.pretty, output.compact)?;

    if output.stdout {
        println!("{}", json);
    } else {
        let path = output.report.as_ref().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        if !output.quiet {
            eprintln!("OK: report written -> {}", path.display());
        }
    }

    if output.list_warnings && !output.quiet {
        print_warnings(&report.records);
    }
    if output.strict && has_anomalies(&report.records) {
        return Err(CliError::new(
            "messages decoded with warnings or errors",
            Some("use --list-warnings to inspect".to_string()),
        ));
    }
    Ok(())
}

/// Refuses a report path that resolves to the input file.
fn ensure_report_differs(input: &Path, output: &OutputArgs) -> Result<(), CliError> {
    let Some(report_path) = output.report.as_ref().filter(|_| !output.stdout) else {
        return Ok(());
    };
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(report_dir) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report<T: Serialize>(
    report: &Report<T>,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn has_anomalies<T: Listed>(records: &[T]) -> bool {
    records
        .iter()
        .any(|entry| entry.record().status != ParseStatus::Success)
}

fn print_warnings<T: Listed>(records: &[T]) {
    eprintln!("Warnings:");
    for (index, entry) in records.iter().enumerate() {
        let record = entry.record();
        if let Some(error) = &record.error {
            eprintln!("  {} FATAL {}", entry.label(index), error);
        }
        for warning in &record.warnings {
            eprintln!("  {} {} {}", entry.label(index), warning.id, warning.message);
        }
    }
}

fn validate_input_file(resolved: &Path, input: &Path) -> Result<(), CliError> {
    if !resolved.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("check the path".to_string()),
        ));
    }
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
