//! Common test utilities for TaskFlow integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/taskflow/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `data_dir`: Holds the board data (via `TF_DATA_DIR`) and its config.kdl
/// - `config_home`: Stands in for `~/.config` so a real system config is never read
///
/// The `tf()` method returns a `Command` that sets both per-invocation,
/// making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    /// Empty board, no login latency.
    pub fn new() -> Self {
        Self::with_config("auth-delay-ms 0\nseed-demo-data #false\n")
    }

    /// Board seeded with the demo users, project, tasks and comment.
    pub fn with_demo() -> Self {
        Self::with_config("auth-delay-ms 0\nseed-demo-data #true\n")
    }

    /// Create an environment whose data-dir config.kdl holds `kdl`.
    pub fn with_config(kdl: &str) -> Self {
        let env = Self {
            data_dir: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
        };
        std::fs::write(env.data_path().join("config.kdl"), kdl).unwrap();
        env
    }

    /// Get a Command for the tf binary with isolated data and config directories.
    pub fn tf(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tf"));
        cmd.env("TF_DATA_DIR", self.data_path());
        cmd.env("XDG_CONFIG_HOME", self.config_home.path());
        cmd.env_remove("TASKFLOW_API_KEY");
        cmd.env_remove("TF_LOG");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Read a stored collection as JSON.
    pub fn read_key(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.data_path().join(format!("{}.json", key));
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Register and sign in a user; returns the new user id.
    pub fn register(&self, name: &str, email: &str, password: &str) -> String {
        let output = self
            .tf()
            .args(["auth", "register", name, email, password])
            .output()
            .unwrap();
        assert!(output.status.success(), "register failed: {:?}", output);
        let json = parse_json(&output.stdout);
        json["user"]["id"].as_str().unwrap().to_string()
    }

    /// Sign in as the demo user Alice.
    pub fn login_alice(&self) {
        self.tf()
            .args(["auth", "login", "alice@tech.com", "password123"])
            .assert()
            .success();
    }

    /// Run `tf` with `args`, assert success and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.tf().args(args).output().unwrap();
        assert!(output.status.success(), "tf {:?} failed: {:?}", args, output);
        parse_json(&output.stdout)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).unwrap()
}
