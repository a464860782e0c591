//! Integration tests for the skirmish binary.
//!
//! Spawns the CLI with various arguments and checks its exit status and the
//! JSONL it produces.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skirmish"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start skirmish")
}

fn records(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect()
}

#[test]
fn help_exits_cleanly() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--max-turns"));
}

#[test]
fn writes_one_record_per_match_to_stdout() {
    let out = run(&["--matches", "3", "--max-turns", "2", "--threads", "1", "--seed", "5", "--quiet"]);
    assert!(out.status.success());
    let records = records(&out.stdout);
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["match_id"], i);
        assert_eq!(record["seed"], 5 + i as u64);
        assert!(record["total_turns"].as_u64().unwrap() <= 2);
        assert!(record["turns"].is_array());
        assert!(record["config"]["simulation"].is_object());
    }
}

#[test]
fn idle_source_runs_to_turn_limit() {
    let out = run(&["--matches", "1", "--max-turns", "3", "--source", "idle", "--quiet"]);
    assert!(out.status.success());
    let records = records(&out.stdout);
    assert_eq!(records[0]["outcome"], "tie");
    assert_eq!(records[0]["end"], "turn_limit");
    assert_eq!(records[0]["total_turns"], 3);
}

#[test]
fn output_flag_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    let out = run(&[
        "--matches",
        "2",
        "--max-turns",
        "2",
        "--threads",
        "2",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(String::from_utf8_lossy(&out.stderr).contains("batch summary"));
}

#[test]
fn loads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = serde_json::to_value(skirmish::Config::default()).unwrap();
    config["arena"]["spawn_distance_units"] = serde_json::json!(20.0);
    std::fs::write(&path, config.to_string()).unwrap();

    let out = run(&[
        "--config",
        path.to_str().unwrap(),
        "--matches",
        "1",
        "--max-turns",
        "5",
        "--source",
        "idle",
        "--quiet",
    ]);
    assert!(out.status.success());
    let records = records(&out.stdout);
    assert_eq!(records[0]["end"], "destruction");
    assert_eq!(records[0]["total_turns"], 2);
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let mut config = serde_json::to_value(skirmish::Config::default()).unwrap();
    config["weapon"]["wide"]["arc_degrees"] = serde_json::json!(0.0);
    std::fs::write(&path, config.to_string()).unwrap();

    let out = run(&["--config", path.to_str().unwrap(), "--matches", "1"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("arc_degrees"));
}

#[test]
fn repo_config_file_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.json");
    let config = skirmish::Config::load(path).unwrap();
    assert_eq!(config, skirmish::Config::default());
}

#[test]
fn unknown_arguments_fail() {
    assert_eq!(run(&["--warp"]).status.code(), Some(2));
    assert_eq!(run(&["--source", "llm"]).status.code(), Some(2));
    assert_eq!(run(&["--matches", "many"]).status.code(), Some(2));
}
