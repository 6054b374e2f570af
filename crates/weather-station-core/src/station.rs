//! Resolution of decoded captures against configured sensors.
//!
//! Two GT-WT-01 variants share one timing profile, so a capture usually
//! matches both. A configured sensor disambiguates: the capture belongs to it
//! when decoding with the sensor's protocol yields the sensor's id. Captures
//! no sensor claims are reported with every candidate decoding instead.

use tracing::{debug, info};

use crate::Measurement;
use crate::config::{ConfigError, ConfiguredSensor, DEFAULT_RECEIVE_PREFIX, StationConfig};
use crate::decode::{Candidate, DecodeError, Decoder, decode_with};
use crate::matcher::matching_protocols;
use crate::signal::normalize;

/// What a capture turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Claimed by a configured sensor.
    Known {
        sensor: ConfiguredSensor,
        measurement: Measurement,
    },
    /// Decodable, but no configured sensor claims it.
    Unknown { candidates: Vec<Candidate> },
    /// No protocol matches the signal.
    NoMatch,
}

/// Result of feeding one relay line to the station.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Not a capture line (e.g., the relay's `ready` banner).
    Ignored,
    Classified(Classification),
    Rejected(DecodeError),
}

#[derive(Debug, Clone)]
pub struct Station<'r> {
    decoder: Decoder<'r>,
    receive_prefix: String,
    sensors: Vec<ConfiguredSensor>,
}

impl<'r> Station<'r> {
    /// Build a station from a configuration validated against the decoder's
    /// registry.
    ///
    /// # Errors
    /// Returns `ConfigError` for any invalid sensor entry.
    pub fn new(config: &StationConfig, decoder: Decoder<'r>) -> Result<Self, ConfigError> {
        let sensors = config.validate(decoder.registry())?;
        Ok(Self {
            decoder,
            receive_prefix: config.receive_prefix.clone(),
            sensors,
        })
    }

    /// Station without configured sensors; every decodable capture is
    /// reported as unknown.
    pub fn scanning(decoder: Decoder<'r>) -> Self {
        Self {
            decoder,
            receive_prefix: DEFAULT_RECEIVE_PREFIX.to_string(),
            sensors: Vec::new(),
        }
    }

    pub fn sensors(&self) -> &[ConfiguredSensor] {
        &self.sensors
    }

    pub fn decoder(&self) -> Decoder<'r> {
        self.decoder
    }

    /// The capture part of a relay line, if it is a capture line.
    pub fn strip_prefix<'l>(&self, line: &'l str) -> Option<&'l str> {
        line.trim_end().strip_prefix(self.receive_prefix.as_str())
    }

    pub fn process_line(&self, line: &str) -> LineOutcome {
        let Some(raw) = self.strip_prefix(line) else {
            debug!(line, "ignoring non-capture line");
            return LineOutcome::Ignored;
        };
        match self.classify(raw) {
            Ok(classification) => LineOutcome::Classified(classification),
            Err(err) => {
                debug!(error = %err, "discarding capture");
                LineOutcome::Rejected(err)
            }
        }
    }

    /// Classify a raw capture (without relay prefix).
    ///
    /// # Errors
    /// Returns `DecodeError::InputFormat` for a malformed capture, or the
    /// first candidate's error when protocols match but none decodes.
    pub fn classify(&self, raw: &str) -> Result<Classification, DecodeError> {
        let signal = normalize(raw)?;
        let matching = matching_protocols(&signal, self.decoder.registry());
        if matching.is_empty() {
            return Ok(Classification::NoMatch);
        }

        for sensor in &self.sensors {
            let Some(descriptor) = matching.iter().find(|d| d.name == sensor.protocol) else {
                continue;
            };
            match decode_with(&signal, descriptor) {
                Ok(measurement) if measurement.sensor_id == sensor.id => {
                    info!(
                        sensor = sensor.id,
                        location = %sensor.location,
                        protocol = sensor.protocol,
                        temperature = measurement.temperature,
                        humidity = measurement.humidity,
                        "sensor reading"
                    );
                    return Ok(Classification::Known {
                        sensor: sensor.clone(),
                        measurement,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(sensor = sensor.id, error = %err, "configured protocol failed to decode");
                }
            }
        }

        let candidates = self.decoder.candidates_signal(&signal);
        if let Some(err) = first_error_if_all_failed(&candidates) {
            return Err(err);
        }
        info!(
            candidates = candidates.len(),
            "sensor has no matching configuration"
        );
        Ok(Classification::Unknown { candidates })
    }
}

fn first_error_if_all_failed(candidates: &[Candidate]) -> Option<DecodeError> {
    if candidates.iter().any(|c| c.result.is_ok()) {
        return None;
    }
    candidates.iter().find_map(|c| c.result.clone().err())
}

#[cfg(test)]
mod tests {
    use super::{Classification, LineOutcome, Station};
    use crate::config::StationConfig;
    use crate::decode::Decoder;

    const WEATHER12_CAPTURE: &str = "616 1996 4048 9044 0 0 0 0 0102010202010202010101010101010102010202020102020102020102010202020102020103";
    const WEATHER15_CAPTURE: &str = "564 4116 2068 9112 0 0 0 0 0102020101020201020101020202020102020202020201020102010102010202010101020103";

    fn station(toml: &str) -> Station<'static> {
        let config = StationConfig::parse(toml, "test").unwrap();
        Station::new(&config, Decoder::default()).unwrap()
    }

    #[test]
    fn configured_sensor_claims_capture() {
        let station = station("[sensors.91]\nlocation = \"kitchen\"\nprotocol = \"weather12\"\n");

        let classification = station.classify(WEATHER12_CAPTURE).unwrap();

        match classification {
            Classification::Known {
                sensor,
                measurement,
            } => {
                assert_eq!(sensor.location, "kitchen");
                assert_eq!(sensor.protocol, "weather12");
                assert_eq!(measurement.sensor_id, 91);
                assert_eq!(measurement.temperature, 18.7);
                assert_eq!(measurement.humidity, 53);
            }
            other => panic!("expected known reading, got {other:?}"),
        }
    }

    #[test]
    fn variant_sensor_is_found_after_other_sensors() {
        let station = station(
            "[sensors.91]\nlocation = \"kitchen\"\nprotocol = \"weather12\"\n\
             [sensors.2454]\nlocation = \"garden\"\nprotocol = \"weather15\"\n",
        );

        let classification = station.classify(WEATHER15_CAPTURE).unwrap();

        assert!(matches!(
            classification,
            Classification::Known { ref sensor, ref measurement }
                if sensor.location == "garden" && measurement.temperature == 4.3
        ));
    }

    #[test]
    fn unclaimed_capture_lists_candidates() {
        let station = station("[sensors.1235]\nlocation = \"garden\"\nprotocol = \"weather15\"\n");

        let classification = station.classify(WEATHER12_CAPTURE).unwrap();

        let Classification::Unknown { candidates } = classification else {
            panic!("expected unknown sensor");
        };
        let protocols: Vec<_> = candidates.iter().map(|c| c.protocol).collect();
        assert_eq!(protocols, vec!["weather12", "weather15"]);
        assert_eq!(candidates[0].result.as_ref().unwrap().sensor_id, 91);
        assert_eq!(candidates[1].result.as_ref().unwrap().sensor_id, 1456);
    }

    #[test]
    fn scanning_station_reports_everything_as_unknown() {
        let station = Station::scanning(Decoder::default());
        assert!(matches!(
            station.classify(WEATHER12_CAPTURE).unwrap(),
            Classification::Unknown { .. }
        ));
    }

    #[test]
    fn process_line_requires_prefix() {
        let station = Station::scanning(Decoder::default());
        assert_eq!(station.process_line("ready"), LineOutcome::Ignored);
        assert_eq!(
            station.process_line("RF receive 300 900 0 0 0 0 0 0 0101\r"),
            LineOutcome::Classified(Classification::NoMatch)
        );
    }

    #[test]
    fn process_line_rejects_malformed_capture() {
        let station = Station::scanning(Decoder::default());
        let outcome = station.process_line("RF receive 12 34");
        let LineOutcome::Rejected(err) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(err.kind(), "input_format");
    }

    #[test]
    fn undecodable_candidates_are_rejected() {
        let station = Station::scanning(Decoder::default());
        let raw = format!("616 1996 4048 9044 0 0 0 0 {}0003", "01".repeat(36));
        let err = station.classify(&raw).unwrap_err();
        assert_eq!(err.kind(), "token_mapping");
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let station = station("receive_prefix = \"RX \"\n");
        assert_eq!(station.strip_prefix("RX 1 2 3"), Some("1 2 3"));
        assert_eq!(station.strip_prefix("RF receive 1 2 3"), None);
    }
}
