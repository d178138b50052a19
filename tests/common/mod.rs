#![allow(dead_code)]

pub mod cli {
    use std::ffi::OsStr;
    use std::path::{Path, PathBuf};
    use std::process::ExitStatus;

    use assert_cmd::Command;
    use serde_json::Value;
    use tempfile::TempDir;

    /// A scratch directory the `dt` binary runs in.
    pub struct DtWorkspace {
        pub temp_dir: TempDir,
        pub root: PathBuf,
    }

    impl DtWorkspace {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("create temp dir");
            let root = temp_dir.path().to_path_buf();
            Self { temp_dir, root }
        }

        pub fn store_path(&self) -> PathBuf {
            self.root.join(".devtrack").join("store.jsonl")
        }

        /// A workspace with `dt init` already run.
        pub fn initialized() -> Self {
            let workspace = Self::new();
            let init = run_dt(&workspace, ["init"], "init");
            assert!(init.status.success(), "init failed: {}", init.stderr);
            workspace
        }
    }

    pub struct DtRun {
        pub status: ExitStatus,
        pub stdout: String,
        pub stderr: String,
    }

    impl DtRun {
        pub fn json(&self) -> Value {
            serde_json::from_str(&self.stdout)
                .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
        }

        pub fn error_code(&self) -> String {
            self.json()["error"]["code"]
                .as_str()
                .unwrap_or_default()
                .to_string()
        }
    }

    /// A `dt` command in `dir` with a clean environment.
    #[allow(deprecated)]
    pub fn dt_command(dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("dt").expect("dt binary");
        cmd.current_dir(dir)
            .env_remove("DEVTRACK_ACTOR")
            .env_remove("DEVTRACK_STORE")
            .env_remove("RUST_LOG")
            .env("USER", "tester");
        cmd
    }

    pub fn run_dt<I, S>(workspace: &DtWorkspace, args: I, label: &str) -> DtRun
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = dt_command(&workspace.root)
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("{label}: failed to run dt: {e}"));
        DtRun {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run `dt --json --actor <actor> <args>`.
    pub fn run_dt_as<'a, I>(workspace: &DtWorkspace, actor: &'a str, args: I, label: &str) -> DtRun
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut full = vec!["--json", "--actor", actor];
        full.extend(args);
        run_dt(workspace, full, label)
    }

    /// Create a project owned by `owner` with `members`; returns its key.
    pub fn seed_project(workspace: &DtWorkspace, owner: &str, key: &str, members: &[&str]) -> String {
        let created = run_dt_as(
            workspace,
            owner,
            ["project", "create", format!("{key} project").as_str(), "--key", key],
            "project create",
        );
        assert!(created.status.success(), "project create failed: {}", created.stdout);
        for member in members {
            let added = run_dt_as(workspace, owner, ["project", "add-member", key, *member], "add-member");
            assert!(added.status.success(), "add-member failed: {}", added.stdout);
        }
        key.to_string()
    }

    /// File an issue and return its ID.
    pub fn seed_issue(workspace: &DtWorkspace, reporter: &str, key: &str, title: &str) -> String {
        let created = run_dt_as(workspace, reporter, ["issue", "create", key, title], "issue create");
        assert!(created.status.success(), "issue create failed: {}", created.stdout);
        created.json()["id"].as_str().expect("issue id").to_string()
    }
}
