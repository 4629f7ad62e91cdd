//! Common test utilities for slipway integration tests.
//!
//! Provides `TestEnv`: an isolated projects root plus target directory in
//! temp space, stub `git`/`rsync` binaries so no test depends on the
//! network or an installed rsync, and helpers to run the slipway CLI.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a slipway CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment: projects root, target dir, stub tools
pub struct TestEnv {
    pub root: TempDir,
    pub target: TempDir,
    pub bin_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            root: TempDir::new().unwrap(),
            target: TempDir::new().unwrap(),
            bin_dir: TempDir::new().unwrap(),
        };
        env.write_stub("git", "#!/bin/sh\necho \"stub-git $@\"\nexit 0\n");
        env.write_stub("rsync", "#!/bin/sh\necho \"stub-rsync $@\"\nexit 0\n");
        env
    }

    /// Replace a stub tool with a custom script body
    pub fn write_stub(&self, name: &str, script: &str) {
        let path = self.bin_dir.path().join(name);
        fs::write(&path, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// A stub git that fails on `fetch` with the given exit code
    pub fn stub_git_failing_fetch(&self, code: i32) {
        self.write_stub(
            "git",
            &format!(
                "#!/bin/sh\nif [ \"$1\" = fetch ]; then\n  echo \"fatal: unable to access\" >&2\n  exit {code}\nfi\necho \"stub-git $@\"\nexit 0\n"
            ),
        );
    }

    pub fn stub_tool(&self, name: &str) -> String {
        self.bin_dir.path().join(name).to_string_lossy().into_owned()
    }

    /// Create a project directory with the given config.yaml content
    pub fn add_project(&self, name: &str, config_yaml: &str) -> PathBuf {
        let dir = self.root.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yaml"), config_yaml).unwrap();
        dir
    }

    /// A minimal valid config pointing at this env's target directory
    pub fn default_config(&self) -> String {
        format!(
            "git:\n  url: repo.git\n  branch: main\ntarget: {}\nignore:\n  - \"*.log\"\n",
            self.target.path().display()
        )
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Run the slipway binary with stub tools first on PATH
    pub fn run(&self, args: &[&str]) -> TestResult {
        let bin = env!("CARGO_BIN_EXE_slipway");
        let path = std::env::var("PATH").unwrap_or_default();

        let mut cmd = Command::new(bin);
        cmd.arg("--root")
            .arg(self.root.path())
            .args(args)
            .env("PATH", format!("{}:{path}", self.bin_dir.path().display()));

        let output = cmd.output().expect("failed to execute slipway");
        output_to_result(output)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Read a project's counter file, or None if never written
pub fn read_counter(project_dir: &Path) -> Option<String> {
    fs::read_to_string(project_dir.join(".lastbuildnumber")).ok()
}

/// Relative paths of all files under `dir`, sorted, for mirror assertions
pub fn file_set(dir: &Path) -> Vec<String> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                out.push(
                    path.strip_prefix(base)
                        .unwrap()
                        .to_string_lossy()
                        .into_owned(),
                );
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Numbered build records present on disk for a project
pub fn build_files(project_dir: &Path) -> Vec<u64> {
    let builds = project_dir.join("builds");
    if !builds.is_dir() {
        return Vec::new();
    }
    let mut numbers: Vec<u64> = fs::read_dir(builds)
        .unwrap()
        .filter_map(|e| e.unwrap().file_name().to_string_lossy().parse().ok())
        .collect();
    numbers.sort_unstable();
    numbers
}
