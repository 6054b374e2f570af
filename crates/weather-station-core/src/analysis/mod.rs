use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::source::{CaptureLogSource, LineEvent, LineSource, SourceError};
use crate::station::{Classification, LineOutcome, Station};
use crate::{
    CandidateSummary, LogSummary, ReadingRecord, Rejection, Report, UnknownCapture,
    make_stub_report,
};

mod sensors;

use sensors::{SensorStats, add_reading, build_sensor_summaries};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Analyze a relay log file against the station's sensors.
///
/// # Errors
/// Returns `AnalysisError` when the log cannot be opened or read.
pub fn analyze_log_file(path: &Path, station: &Station<'_>) -> Result<Report, AnalysisError> {
    let source = CaptureLogSource::open(path)?;
    analyze_source(path, source, station)
}

/// Analyze lines from any source; `path` names the input in the report.
///
/// # Errors
/// Returns `AnalysisError` on source failures or when `path` has no metadata.
pub fn analyze_source<S: LineSource>(
    path: &Path,
    source: S,
    station: &Station<'_>,
) -> Result<Report, AnalysisError> {
    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    fold_lines(&mut report, source, station)?;
    info!(
        lines = report.summary.lines_total,
        readings = report.summary.readings,
        unknown = report.summary.unknown,
        rejected = report.summary.rejected,
        "log analysed"
    );
    Ok(report)
}

fn fold_lines<S: LineSource>(
    report: &mut Report,
    mut source: S,
    station: &Station<'_>,
) -> Result<(), AnalysisError> {
    let mut summary = LogSummary::default();
    let mut sensor_stats = BTreeMap::<u32, SensorStats>::new();

    while let Some(LineEvent { line_number, text }) = source.next_line()? {
        summary.lines_total += 1;
        let outcome = station.process_line(&text);
        if !matches!(outcome, LineOutcome::Ignored) {
            summary.captures_total += 1;
        }
        match outcome {
            LineOutcome::Ignored => {}
            LineOutcome::Classified(Classification::Known {
                sensor,
                measurement,
            }) => {
                summary.readings += 1;
                add_reading(&mut sensor_stats, &sensor, line_number, measurement);
                report.readings.push(ReadingRecord {
                    line: line_number,
                    location: sensor.location,
                    protocol: sensor.protocol.to_string(),
                    measurement,
                });
            }
            LineOutcome::Classified(Classification::Unknown { candidates }) => {
                summary.unknown += 1;
                report.unknown.push(UnknownCapture {
                    line: line_number,
                    candidates: candidates.iter().map(CandidateSummary::from).collect(),
                });
            }
            LineOutcome::Classified(Classification::NoMatch) => {
                debug!(line = line_number, "no protocol matches capture");
                summary.no_match += 1;
            }
            LineOutcome::Rejected(err) => {
                summary.rejected += 1;
                report.rejections.push(Rejection {
                    line: line_number,
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    report.summary = summary;
    report.sensors = build_sensor_summaries(sensor_stats);
    Ok(())
}
