#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Pinned "today" for every command run through [`TestHome::cmd`].
pub const TODAY: &str = "2024-01-10";

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "hunter22";

pub const FAST_AUTH_CONFIG: &str = "[auth]\npassword_iterations = 1000\n";

pub fn habitual_cmd() -> Command {
    let mut cmd = Command::cargo_bin("habitual").expect("binary");
    cmd.env_remove("HABITUAL_HOME")
        .env_remove("HABITUAL_TODAY")
        .env_remove("RUST_LOG");
    cmd
}

/// A throwaway data directory.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    /// Starts with a config that keeps password stretching cheap.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("config.toml"), FAST_AUTH_CONFIG).expect("write config");
        Self { dir }
    }

    /// A fresh home with an account already signed up and logged in.
    pub fn signed_up() -> Self {
        let home = Self::new();
        home.signup("Ada", EMAIL, PASSWORD);
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        self.cmd_on(TODAY)
    }

    pub fn cmd_on(&self, today: &str) -> Command {
        let mut cmd = habitual_cmd();
        cmd.arg("--home").arg(self.path()).arg("--today").arg(today);
        cmd
    }

    pub fn signup(&self, name: &str, email: &str, password: &str) -> Value {
        self.json(&[
            "signup",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
        ])
    }

    /// Run a command that must succeed and return its JSON envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Run a command that must fail with `code` and return its JSON envelope.
    pub fn json_err(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json error envelope")
    }

    /// Add a task and return its id.
    pub fn add_task(&self, label: &str, extra: &[&str]) -> String {
        let mut args = vec!["task", "add", label];
        args.extend_from_slice(extra);
        let value = self.json(&args);
        value["data"]["task"]["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
