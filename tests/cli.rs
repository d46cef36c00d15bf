use std::process::Command;

use profile_scraper::config::CONFIG_PATH_ENV;

fn scraper() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_profile-scraper"));
    cmd.env_remove(CONFIG_PATH_ENV).env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_url_prints_usage_and_exits_1() {
    let output = scraper().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn broken_config_has_its_own_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("scraper.yaml");
    std::fs::write(&config, "max_retries: [not, a, number]\n").unwrap();

    let output = scraper()
        .env(CONFIG_PATH_ENV, &config)
        .arg("https://www.linkedin.com/in/ada-lovelace")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}
