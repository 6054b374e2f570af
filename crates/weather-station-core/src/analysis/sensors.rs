use std::collections::BTreeMap;

use crate::config::ConfiguredSensor;
use crate::{Measurement, SensorSummary};

#[derive(Debug, Clone)]
pub(crate) struct SensorStats {
    pub location: String,
    pub protocol: &'static str,
    pub readings: u64,
    pub last_line: u64,
    pub measurement: Measurement,
}

pub(crate) fn add_reading(
    stats: &mut BTreeMap<u32, SensorStats>,
    sensor: &ConfiguredSensor,
    line: u64,
    measurement: Measurement,
) {
    let entry = stats.entry(sensor.id).or_insert_with(|| SensorStats {
        location: sensor.location.clone(),
        protocol: sensor.protocol,
        readings: 0,
        last_line: line,
        measurement,
    });
    entry.readings += 1;
    entry.last_line = line;
    entry.measurement = measurement;
}

/// One summary per sensor, ordered by sensor id.
pub(crate) fn build_sensor_summaries(stats: BTreeMap<u32, SensorStats>) -> Vec<SensorSummary> {
    stats
        .into_iter()
        .map(|(sensor_id, stats)| SensorSummary {
            sensor_id,
            location: stats.location,
            protocol: stats.protocol.to_string(),
            readings: stats.readings,
            last_line: stats.last_line,
            measurement: stats.measurement,
        })
        .collect()
}
