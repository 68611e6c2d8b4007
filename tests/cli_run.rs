use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = r##"
live:
  - "#user"
  - ".submit-btn"
"##;

const SCRIPT: &str = r##"
locators:
  username: "#user"
  submit: "button[type='submit']"
steps:
  - target: username
    action: type
    value: testuser
  - target: submit
    action: click
    alternatives: ["input[type='submit']", ".submit-btn"]
"##;

const CONFIG: &str = r#"
retry:
  max_attempts: 3
  delay: "0"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn webheal(dir: &TempDir) -> Command {
    let config = write(dir, "webheal.yaml", CONFIG);
    let mut cmd = Command::cargo_bin("webheal").unwrap();
    cmd.env_remove("WEBHEAL_RETRY_COUNT")
        .env_remove("WEBHEAL_RETRY_DELAY")
        .env_remove("WEBHEAL_AUTO_HEALING")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn read_json(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn run_heals_and_persists() {
    let dir = TempDir::new().unwrap();
    let page = write(&dir, "page.yaml", PAGE);
    let script = write(&dir, "script.yaml", SCRIPT);
    let registry = dir.path().join("state/locators.yaml");
    let recording = dir.path().join("out/recording.json");

    webheal(&dir)
        .args(["run", "--page", page.as_str(), "--script", script.as_str()])
        .arg("--registry")
        .arg(&registry)
        .arg("--record")
        .arg(&recording)
        .assert()
        .success();

    let saved = fs::read_to_string(&registry).unwrap();
    assert!(saved.contains(".submit-btn"));
    assert!(!saved.contains("button[type='submit']"));

    let actions = read_json(&recording);
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0]["action"], "type");
    assert_eq!(actions[0]["value"], "testuser");
    assert_eq!(actions[1]["selector"], "button[type='submit']");
    assert_eq!(actions[2]["selector"], ".submit-btn");

    webheal(&dir)
        .args(["locators", "--registry"])
        .arg(&registry)
        .args(["get", "submit"])
        .assert()
        .success()
        .stdout(".submit-btn\n");
}

#[test]
fn run_fails_when_nothing_heals() {
    let dir = TempDir::new().unwrap();
    let page = write(&dir, "page.yaml", "live: [\"#user\"]\n");
    let script = write(&dir, "script.yaml", SCRIPT);
    let recording = dir.path().join("recording.json");

    webheal(&dir)
        .args(["run", "--page", page.as_str(), "--script", script.as_str()])
        .arg("--record")
        .arg(&recording)
        .assert()
        .failure();

    // the recording is still written: one type plus three failed clicks
    let actions = read_json(&recording);
    assert_eq!(actions.len(), 4);
    assert!(actions[1..]
        .iter()
        .all(|a| a["selector"] == "button[type='submit']"));
}

#[test]
fn negative_retry_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let page = write(&dir, "page.yaml", PAGE);
    let script = write(&dir, "script.yaml", SCRIPT);

    webheal(&dir)
        .env("WEBHEAL_RETRY_COUNT", "-1")
        .args(["run", "--page", page.as_str(), "--script", script.as_str()])
        .assert()
        .failure();
}

#[test]
fn locators_set_list_remove() {
    let dir = TempDir::new().unwrap();
    let registry = dir.path().join("locators.yaml");
    let registry = registry.to_string_lossy().into_owned();

    webheal(&dir)
        .args(["locators", "--registry", registry.as_str(), "set", "login", "#login"])
        .assert()
        .success();
    webheal(&dir)
        .args(["locators", "--registry", registry.as_str(), "list"])
        .assert()
        .success()
        .stdout("login\t#login\n");
    webheal(&dir)
        .args(["locators", "--registry", registry.as_str(), "remove", "login"])
        .assert()
        .success();
    webheal(&dir)
        .args(["locators", "--registry", registry.as_str(), "get", "login"])
        .assert()
        .failure();
}

#[test]
fn config_show_reflects_env_overrides() {
    let dir = TempDir::new().unwrap();

    let output = webheal(&dir)
        .env("WEBHEAL_AUTO_HEALING", "off")
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("auto_healing_enabled: false"));
    assert!(stdout.contains("healing active: false"));
}
