use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;
use weather_station_core::protocols::ProtocolRegistry;
use weather_station_core::{
    CandidateSummary, Classification, DecodeError, Decoder, Measurement, Report, Station,
    StationConfig,
};

#[derive(Parser, Debug)]
#[command(name = "weather-station")]
#[command(version)]
#[command(
    about = "Decoder for 433 MHz weather-sensor captures relayed by an RFControl receiver.",
    long_about = None,
    after_help = "Examples:\n  weather-station decode \"616 1996 4048 9044 0 0 0 0 0102...0103\"\n  weather-station log analyse relay.log -o report.json\n  weather-station log analyze relay.log --config station.toml --stdout"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a single capture and print the result as JSON.
    Decode {
        /// Capture "L0 L1 L2 L3 L4 L5 L6 L7 TOKENS", with or without the relay prefix
        raw: String,

        /// Station configuration (TOML) used to attribute the capture to a sensor
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the decoding under every matching protocol
        #[arg(long, conflicts_with = "config")]
        candidates: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Operations on recorded relay logs.
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Analyse a relay log and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  weather-station log analyse relay.log -o report.json\n  weather-station log analyze 'logs/*.log' --config station.toml --stdout"
    )]
    Analyse {
        /// Path to a relay log (a glob matching exactly one file is accepted)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Station configuration (TOML); without it every capture is unknown
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any capture was rejected
        #[arg(long)]
        strict: bool,

        /// List rejected captures after analysis
        #[arg(long)]
        list_rejections: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            raw,
            config,
            candidates,
            pretty,
        } => cmd_decode(&raw, config, candidates, pretty),
        Commands::Log { command } => match command {
            LogCommands::Analyse {
                input,
                report,
                stdout,
                config,
                pretty,
                compact,
                quiet,
                strict,
                list_rejections,
            } => cmd_log_analyse(
                input,
                report,
                stdout,
                config,
                pretty,
                compact,
                quiet,
                strict,
                list_rejections,
            ),
        },
    };

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
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
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
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        let hint = match err {
            DecodeError::InputFormat(_) => {
                "expected eight pulse lengths followed by a digit token sequence"
            }
            DecodeError::TokenMapping(_) => "the capture is likely truncated or corrupted",
            DecodeError::FieldParse(_) => "the payload is shorter than the protocol layout",
        };
        CliError::new(err.to_string(), Some(hint.to_string()))
    }
}

/// JSON shape printed by `decode`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DecodeOutput {
    Decoded {
        protocol: String,
        device: String,
        measurement: Measurement,
    },
    Known {
        location: String,
        protocol: String,
        measurement: Measurement,
    },
    Unknown {
        candidates: Vec<CandidateSummary>,
    },
}

fn cmd_decode(
    raw: &str,
    config: Option<PathBuf>,
    candidates: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let station = Station::new(&config, Decoder::default()).map_err(|err| {
        CliError::new(
            format!("invalid station configuration: {}", err),
            Some(supported_protocols_hint()),
        )
    })?;
    let raw = station.strip_prefix(raw).unwrap_or(raw);
    debug!(raw, "decoding capture");

    if candidates {
        let all = station.decoder().candidates(raw)?;
        if all.is_empty() {
            return Err(no_match_error());
        }
        let summaries: Vec<CandidateSummary> = all.iter().map(CandidateSummary::from).collect();
        return print_json(&summaries, pretty);
    }

    let output = if station.sensors().is_empty() {
        let decoded = station.decoder().decode(raw)?.ok_or_else(no_match_error)?;
        DecodeOutput::Decoded {
            protocol: decoded.protocol.to_string(),
            device: decoded.device.to_string(),
            measurement: decoded.measurement,
        }
    } else {
        match station.classify(raw)? {
            Classification::Known {
                sensor,
                measurement,
            } => DecodeOutput::Known {
                location: sensor.location,
                protocol: sensor.protocol.to_string(),
                measurement,
            },
            Classification::Unknown { candidates } => DecodeOutput::Unknown {
                candidates: candidates.iter().map(CandidateSummary::from).collect(),
            },
            Classification::NoMatch => return Err(no_match_error()),
        }
    };
    print_json(&output, pretty)
}

fn no_match_error() -> CliError {
    CliError::new(
        "no protocol matches the capture",
        Some(supported_protocols_hint()),
    )
}

fn supported_protocols_hint() -> String {
    format!(
        "supported protocols: {}",
        ProtocolRegistry::builtin().names().join(", ")
    )
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let json = json.context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<StationConfig, CliError> {
    let Some(path) = path else {
        return Ok(StationConfig::default());
    };
    if !path.is_file() {
        return Err(CliError::new(
            format!("config file not found: {}", path.display()),
            Some("pass a TOML station configuration".to_string()),
        ));
    }
    StationConfig::load(path).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("see [sensors.<id>] entries with location and protocol".to_string()),
        )
    })
}

fn cmd_log_analyse(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    config: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_rejections: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let config = load_config(config.as_deref())?;
    let station = Station::new(&config, Decoder::default()).map_err(|err| {
        CliError::new(
            format!("invalid station configuration: {}", err),
            Some(supported_protocols_hint()),
        )
    })?;

    let mut rep = weather_station_core::analyze_log_file(&resolved_input, &station)
        .context("relay log analysis failed")?;
    rep.generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("timestamp formatting failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    if let Some(report) = report {
        if let Some(parent) = report.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
        if !quiet {
            eprintln!("OK: report written -> {}", report.display());
        }
    } else {
        print!("{}", json);
    }

    if list_rejections && !quiet {
        print_rejections(&rep);
    }
    if strict && !rep.rejections.is_empty() {
        return Err(CliError::new(
            format!("{} capture(s) rejected", rep.rejections.len()),
            Some("use --list-rejections to inspect".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_rejections(rep: &Report) {
    eprintln!("Rejected captures:");
    for rejection in &rep.rejections {
        eprintln!(
            "  line {} {}: {}",
            rejection.line, rejection.kind, rejection.message
        );
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a relay log recorded from the receiver".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a relay log recorded from the receiver".to_string()),
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
        let hint = "pass a single relay log, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str("; matches: ");
        message.push_str(&listed);
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
