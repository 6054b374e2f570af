//! Weather-station core library: decoding of 433 MHz sensor captures.
//!
//! An RFControl relay reports each received burst as a compressed capture,
//! eight pulse-length slots followed by a token sequence. The decoding engine
//! turns such a capture into a [`Measurement`]:
//! `signal` normalizes the capture, `matcher` compares it with the protocol
//! timing templates in `protocols::registry`, `protocols::mapping` rewrites
//! the tokens into bits and the protocol layout extracts the fields.
//! The engine is pure and side-effect free; the only shared state is the
//! read-only protocol registry, so decoding may run from any thread.
//!
//! Above the engine, `station` resolves captures against configured sensors
//! and `analysis` folds a recorded relay log into a deterministic [`Report`].
//! All file access is isolated in `source` and `config`.
//!
//! Invariants:
//! - Pulse tolerance is relative to the observed length (40%, inclusive).
//! - Token mapping never skips input; uncovered tokens are an error.
//! - Report ordering follows input order; sensors are sorted by id.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use weather_station_core::{Decoder, Station, StationConfig, analyze_log_file};
//!
//! let config = StationConfig::load(Path::new("station.toml"))?;
//! let station = Station::new(&config, Decoder::default())?;
//! let report = analyze_log_file(Path::new("capture.log"), &station)?;
//! println!("readings: {}", report.summary.readings);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod config;
pub mod decode;
pub mod matcher;
pub mod protocols;
pub mod signal;
mod source;
pub mod station;

pub use analysis::{AnalysisError, analyze_log_file, analyze_source};
pub use config::{ConfigError, ConfiguredSensor, SensorConfig, StationConfig};
pub use decode::{Candidate, DecodeError, Decoded, Decoder, candidates, decode};
pub use source::{CaptureLogSource, LineEvent, LineSource, SourceError};
pub use station::{Classification, LineOutcome, Station};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used until the caller stamps the report.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// A decoded sensor reading.
///
/// # Examples
/// ```
/// use weather_station_core::Measurement;
///
/// let m = Measurement {
///     sensor_id: 91,
///     channel: 1,
///     temperature: 18.7,
///     humidity: 53,
///     low_battery: false,
/// };
/// let json = serde_json::to_string(&m).unwrap();
/// assert!(json.contains("\"temperature\":18.7"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Sensor id (random per battery change on GT-WT-01 devices).
    pub sensor_id: u32,
    /// Channel selected on the sensor, starting at 1.
    pub channel: u8,
    /// Temperature in degrees Celsius, tenth-degree precision.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    pub low_battery: bool,
}

/// Aggregated analysis of a relay log with deterministic ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input log metadata.
    pub input: InputInfo,

    /// Line and outcome counters.
    pub summary: LogSummary,
    /// Latest reading per configured sensor, by sensor id.
    pub sensors: Vec<SensorSummary>,
    /// Every reading claimed by a configured sensor, in input order.
    pub readings: Vec<ReadingRecord>,
    /// Captures no configured sensor claims, in input order.
    pub unknown: Vec<UnknownCapture>,
    /// Discarded captures, in input order.
    pub rejections: Vec<Rejection>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "weather-station").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input log metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Counters over every line of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    /// All lines read, capture or not.
    pub lines_total: u64,
    /// Lines carrying the relay's capture prefix.
    pub captures_total: u64,
    pub readings: u64,
    pub unknown: u64,
    pub no_match: u64,
    pub rejected: u64,
}

/// Most recent reading of a configured sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub sensor_id: u32,
    pub location: String,
    pub protocol: String,
    /// Number of readings attributed to the sensor.
    pub readings: u64,
    /// Input line of the latest reading.
    pub last_line: u64,
    pub measurement: Measurement,
}

/// A reading attributed to a configured sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub line: u64,
    pub location: String,
    pub protocol: String,
    pub measurement: Measurement,
}

/// A decodable capture no configured sensor claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownCapture {
    pub line: u64,
    /// One entry per matching protocol, in registry order.
    pub candidates: Vec<CandidateSummary>,
}

/// What a capture would decode to under one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub protocol: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
    /// Decoding error under this protocol, when decoding failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Candidate> for CandidateSummary {
    fn from(candidate: &Candidate) -> Self {
        let (measurement, error) = match &candidate.result {
            Ok(measurement) => (Some(*measurement), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            protocol: candidate.protocol.to_string(),
            device: candidate.device.to_string(),
            measurement,
            error,
        }
    }
}

/// A discarded capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub line: u64,
    /// Error kind (`input_format`, `token_mapping` or `field_parse`).
    pub kind: String,
    /// Human-readable error message.
    pub message: String,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use weather_station_core::make_stub_report;
///
/// let report = make_stub_report("capture.log", 123);
/// assert_eq!(report.report_version, weather_station_core::REPORT_VERSION);
/// assert!(report.readings.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "weather-station".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: LogSummary::default(),
        sensors: vec![],
        readings: vec![],
        unknown: vec![],
        rejections: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_summary_omits_absent_fields() {
        let ok = CandidateSummary {
            protocol: "weather12".to_string(),
            device: "Globaltronics GT-WT-01".to_string(),
            measurement: Some(Measurement {
                sensor_id: 91,
                channel: 1,
                temperature: 18.7,
                humidity: 53,
                low_battery: false,
            }),
            error: None,
        };
        let failed = CandidateSummary {
            measurement: None,
            error: Some("token mapping failed".to_string()),
            ..ok.clone()
        };

        let ok = serde_json::to_value(&ok).expect("candidate json");
        assert!(ok.get("error").is_none());
        assert_eq!(ok["measurement"]["sensor_id"], 91);

        let failed = serde_json::to_value(&failed).expect("candidate json");
        assert!(failed.get("measurement").is_none());
        assert_eq!(failed["error"], "token mapping failed");
    }

    #[test]
    fn candidate_summary_from_failed_candidate() {
        let candidate = Candidate {
            protocol: "weather15",
            device: "Globaltronics GT-WT-01 variant",
            result: Err(DecodeError::FieldParse(
                protocols::common::FieldError::TooShort {
                    needed: 36,
                    actual: 10,
                },
            )),
        };
        let summary = CandidateSummary::from(&candidate);
        assert_eq!(summary.measurement, None);
        assert_eq!(
            summary.error.as_deref(),
            Some("field parse failed: bit string too short: need 36 bits, got 10")
        );
    }

    #[test]
    fn stub_report_round_trips_through_json() {
        let report = make_stub_report("capture.log", 42);
        let json = serde_json::to_string(&report).expect("report json");
        let parsed: Report = serde_json::from_str(&json).expect("parse report");
        assert_eq!(parsed.input.bytes, 42);
        assert_eq!(parsed.tool.name, "weather-station");
        assert_eq!(parsed.summary, LogSummary::default());
    }
}
