//! TestWorld pattern for declarative integration test setup.

use anyhow::{Result, bail};
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment: a temp root holding the data directory and any
/// files a test wants to upload.
///
/// # Example
/// ```no_run
/// use opptrack_testing::TestWorld;
///
/// let world = TestWorld::new().initialized();
/// let result = world.run(&["opp", "add", "Support copilot"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment. The data directory does not
    /// exist until `init` runs.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".opptrack");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Run `opptrack init`, panicking if it fails.
    pub fn initialized(self) -> Self {
        let result = self.run(&["init"]).expect("Failed to run init");
        assert!(result.success(), "init failed: {}", result.stderr);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a file under the temp root and return its path.
    pub fn write_file(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Configure a CLI command with this environment's data dir, output
    /// format and env vars. Colour and the data-dir env var are cleared so
    /// output is stable.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command, format: &str) -> &'a mut Command {
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--format")
            .arg(format);

        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("OPPTRACK_PATH");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the CLI with plain output.
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_format(args, "plain")
    }

    /// Execute the CLI with JSON output.
    pub fn run_json(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_format(args, "json")
    }

    /// Execute with JSON output, failing unless the command succeeded, and
    /// parse stdout.
    pub fn json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let result = self.run_json(args)?;
        if !result.success() {
            bail!("opptrack {:?} failed: {}", args, result.stderr);
        }
        result.json()
    }

    /// Uses `Command::cargo_bin()`, which relies on the `CARGO_BIN_EXE_`
    /// variable cargo test sets for the binary.
    #[allow(deprecated)]
    fn run_with_format(&self, args: &[&str], format: &str) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("opptrack")
            .map_err(|e| anyhow::anyhow!("Failed to find opptrack binary: {}", e))?;

        self.configure_command(&mut cmd, format);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
