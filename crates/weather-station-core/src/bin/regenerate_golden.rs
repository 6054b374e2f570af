use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use weather_station_core::{Decoder, Station, StationConfig, analyze_log_file};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.log");
        if !input.exists() {
            continue;
        }
        let config = path.join("station.toml");
        let output = path.join("expected_report.json");
        regenerate_one(&input, &config, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, config: &Path, output: &Path) -> Result<(), String> {
    let config = if config.exists() {
        StationConfig::load(config).map_err(|err| err.to_string())?
    } else {
        StationConfig::default()
    };
    let station = Station::new(&config, Decoder::default()).map_err(|err| err.to_string())?;
    let report = analyze_log_file(input, &station)
        .map_err(|err| format!("analysis failed for {}: {}", input.display(), err))?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json + "\n")
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
