use assert_cmd::cargo::cargo_bin_cmd;
use opptrack_testing::TestWorld;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_guidance_before_init() {
    let temp = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("opptrack");
    cmd.arg("--data-dir")
        .arg(temp.path().join("data"))
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("opptrack init"));
}

#[test]
fn test_commands_require_init() {
    let world = TestWorld::new();

    let result = world.run(&["opp", "list"]).unwrap();
    assert!(!result.success());
    assert!(
        result.stderr().contains("Run `opptrack init` first"),
        "unexpected stderr: {}",
        result.stderr()
    );
}

#[test]
fn test_init_creates_data_dir() {
    let world = TestWorld::new();

    let result = world.run(&["init"]).unwrap();
    assert!(result.success(), "init failed: {}", result.stderr());
    assert!(result.stdout().contains("Initialized"));

    assert!(world.data_dir().join("opptrack.db").exists());
    assert!(world.data_dir().join("config.toml").exists());

    // Second init keeps the existing database
    let again = world.run(&["init"]).unwrap();
    assert!(again.success());
}

#[test]
fn test_data_dir_from_env() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("from-env");

    let mut cmd = cargo_bin_cmd!("opptrack");
    cmd.arg("init")
        .env("OPPTRACK_PATH", &data_dir)
        .env("NO_COLOR", "1")
        .assert()
        .success();

    assert!(data_dir.join("opptrack.db").exists());
}

#[test]
fn test_help_lists_namespaces() {
    let mut cmd = cargo_bin_cmd!("opptrack");
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("company")
            .and(predicate::str::contains("opp"))
            .and(predicate::str::contains("attach"))
            .and(predicate::str::contains("layout")),
    );
}
