use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const WEATHER12_CAPTURE: &str = "616 1996 4048 9044 0 0 0 0 0102010202010202010101010101010102010202020102020102020102010202020102020103";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("weather-station"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden_case() -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join("configured_sensors")
}

fn sample_log() -> std::path::PathBuf {
    golden_case().join("input.log")
}

fn sample_config() -> std::path::PathBuf {
    golden_case().join("station.toml")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd()
        .arg("log")
        .arg("analyse")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("log")
        .arg("analyze")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn decode_prints_measurement() {
    let assert = cmd().arg("decode").arg(WEATHER12_CAPTURE).assert().success();
    let json = stdout_json(&assert);

    assert_eq!(json["status"], "decoded");
    assert_eq!(json["protocol"], "weather12");
    assert_eq!(json["measurement"]["sensor_id"], 91);
    assert_eq!(json["measurement"]["temperature"], 18.7);
}

#[test]
fn decode_accepts_relay_prefix() {
    let line = format!("RF receive {WEATHER12_CAPTURE}");
    let assert = cmd().arg("decode").arg(line).assert().success();
    let json = stdout_json(&assert);

    assert_eq!(json["measurement"]["humidity"], 53);
}

#[test]
fn decode_candidates_lists_every_matching_protocol() {
    let assert = cmd()
        .arg("decode")
        .arg(WEATHER12_CAPTURE)
        .arg("--candidates")
        .assert()
        .success();
    let json = stdout_json(&assert);

    let candidates = json.as_array().expect("candidate array");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0]["protocol"], "weather12");
    assert_eq!(candidates[1]["protocol"], "weather15");
    assert_eq!(candidates[1]["measurement"]["sensor_id"], 1456);
}

#[test]
fn decode_with_config_attributes_sensor() {
    let assert = cmd()
        .arg("decode")
        .arg(WEATHER12_CAPTURE)
        .arg("--config")
        .arg(sample_config())
        .assert()
        .success();
    let json = stdout_json(&assert);

    assert_eq!(json["status"], "known");
    assert_eq!(json["location"], "kitchen");
}

#[test]
fn decode_without_match_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("300 900 0 0 0 0 0 0 0101")
        .assert()
        .failure()
        .stderr(
            contains("error: no protocol matches the capture")
                .and(contains("hint: supported protocols: weather12, weather15")),
        );
}

#[test]
fn decode_malformed_capture_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("12 34")
        .assert()
        .failure()
        .stderr(contains("error: malformed capture").and(contains("hint:")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.log");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_json_report() {
    let assert = cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("--config")
        .arg(sample_config())
        .arg("--stdout")
        .assert()
        .success();
    let json = stdout_json(&assert);

    assert_eq!(json["report_version"], 1);
    assert_eq!(json["summary"]["readings"], 4);
    assert_eq!(json["sensors"][0]["location"], "kitchen");
    assert_ne!(json["generated_at"], "1970-01-01T00:00:00Z");
}

#[test]
fn without_config_every_capture_is_unknown() {
    let assert = cmd()
        .arg("log")
        .arg("analyse")
        .arg(sample_log())
        .arg("--stdout")
        .assert()
        .success();
    let json = stdout_json(&assert);

    assert_eq!(json["summary"]["readings"], 0);
    assert_eq!(json["summary"]["unknown"], 5);
}

#[test]
fn glob_input_matching_one_file_is_accepted() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::copy(sample_log(), temp.path().join("relay.log")).expect("copy log");
    let pattern = temp.path().join("*.log");

    cmd()
        .arg("log")
        .arg("analyse")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
}

#[test]
fn glob_input_matching_several_files_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::copy(sample_log(), temp.path().join("a.log")).expect("copy log");
    std::fs::copy(sample_log(), temp.path().join("b.log")).expect("copy log");
    let pattern = temp.path().join("*.log");

    cmd()
        .arg("log")
        .arg("analyse")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern").and(contains("hint:")));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_is_written_and_quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());

    let written = std::fs::read_to_string(&report).expect("report written");
    let json: Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(json["summary"]["lines_total"], 12);
}

#[test]
fn report_path_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("relay.log");
    std::fs::copy(sample_log(), &input).expect("copy log");

    cmd()
        .arg("log")
        .arg("analyse")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report path must differ from input"));
}

#[test]
fn list_rejections_outputs_lines_and_kinds() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("-o")
        .arg(report)
        .arg("--list-rejections")
        .assert()
        .success()
        .stderr(contains("Rejected captures:").and(contains("line 9 token_mapping")));
}

#[test]
fn strict_fails_when_captures_are_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("analyze")
        .arg(sample_log())
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("4 capture(s) rejected"));
}

#[test]
fn unknown_protocol_in_config_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("station.toml");
    std::fs::write(
        &config,
        "[sensors.91]\nlocation = \"kitchen\"\nprotocol = \"weather99\"\n",
    )
    .expect("write config");

    cmd()
        .arg("log")
        .arg("analyse")
        .arg(sample_log())
        .arg("--config")
        .arg(config)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("weather99").and(contains("hint:")));
}
