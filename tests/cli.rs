use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sleeplog(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sleeplog").unwrap();
    cmd.env("HOME", home.path())
        .env("SLEEPLOG_HOME", home.path().join(".sleeplog"))
        .env_remove("SLEEPLOG_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_sleep_then_wake() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .args(["sleep", "--at", "2024-03-21T23:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sleep started"));

    let record = json_output(sleeplog(&home).args([
        "-o",
        "json",
        "wake",
        "--at",
        "2024-03-22T07:00:00Z",
    ]));
    assert_eq!(record["durationHours"], 8.0);
    assert_eq!(record["isNap"], false);
    assert_eq!(record["startTime"], "2024-03-21T23:00:00Z");
}

#[test]
fn test_wake_without_sleep_fails() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .arg("wake")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not sleeping"))
        .stderr(predicate::str::contains("--verbose").not());
}

#[test]
fn test_broken_config_suggests_verbose() {
    let home = TempDir::new().unwrap();
    let root = home.path().join(".sleeplog");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("config.yaml"), "general: [not, a, map]\n").unwrap();

    sleeplog(&home)
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("--verbose"));
}

#[test]
fn test_double_sleep_fails() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .args(["sleep", "--at", "2024-03-21T23:00:00Z"])
        .assert()
        .success();

    sleeplog(&home)
        .arg("sleep")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already sleeping"));

    let status = json_output(sleeplog(&home).args(["status", "-o", "json"]));
    assert_eq!(status["tracker"]["state"], "inProgress");
    assert_eq!(status["tracker"]["startTime"], "2024-03-21T23:00:00Z");
}

#[test]
fn test_nap_is_recorded() {
    let home = TempDir::new().unwrap();

    let record = json_output(sleeplog(&home).args([
        "-o",
        "json",
        "nap",
        "--duration",
        "30m",
        "--end",
        "2024-03-22T14:00:00Z",
    ]));
    assert_eq!(record["isNap"], true);
    assert_eq!(record["durationHours"], 0.5);
    assert_eq!(record["startTime"], "2024-03-22T13:30:00Z");
}

#[test]
fn test_nap_rejects_bad_duration() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .args(["nap", "--duration", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn test_log_rejects_reversed_interval() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .args([
            "log",
            "--start",
            "2024-03-22T07:00:00Z",
            "--end",
            "2024-03-21T23:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid interval"));
}

#[test]
fn test_history_lists_newest_first() {
    let home = TempDir::new().unwrap();

    for (start, end) in [
        ("2024-03-20T23:00:00Z", "2024-03-21T06:00:00Z"),
        ("2024-03-21T23:00:00Z", "2024-03-22T07:00:00Z"),
    ] {
        sleeplog(&home)
            .args(["log", "--start", start, "--end", end])
            .assert()
            .success();
    }

    let history = json_output(sleeplog(&home).args(["history", "-o", "json"]));
    assert_eq!(history["count"], 2);
    assert_eq!(history["items"][0]["endTime"], "2024-03-22T07:00:00Z");
    assert_eq!(history["items"][1]["durationHours"], 7.0);

    let limited = json_output(sleeplog(&home).args(["history", "-n", "1", "-o", "json"]));
    assert_eq!(limited["count"], 1);
}

#[test]
fn test_status_on_empty_journal() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Awake for: Not enough data"))
        .stdout(predicate::str::contains("1-week average: 0h 0m per night"));

    let status = json_output(sleeplog(&home).args(["status", "-o", "json"]));
    assert!(status["awakeSince"].is_null());
    assert!(status["weeklyAverages"]["week1"].is_null());
    assert_eq!(status["tracker"]["state"], "idle");
}

#[test]
fn test_config_default_output() {
    let home = TempDir::new().unwrap();
    let root = home.path().join(".sleeplog");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("config.yaml"), "general:\n  default_output: json\n").unwrap();

    let averages = json_output(sleeplog(&home).arg("averages"));
    assert!(averages["week3"].is_null());
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();

    sleeplog(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sleeplog"));
}
