//! Configuration management for `devtrack`.
//!
//! Configuration is loaded from the workspace file
//! (`.devtrack/config.yaml`) with environment variable overrides, and CLI
//! flags override both:
//!
//! - actor: `--actor`, `DEVTRACK_ACTOR`, config `actor`, then `$USER`
//! - store: `--store`, `DEVTRACK_STORE`, config `store`, then
//!   `.devtrack/store.jsonl`

use std::fs;
use std::path::{Path, PathBuf};

use devtrack_lib::InMemoryStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DevTrackError, Result};
use crate::model::UserId;

pub const DEVTRACK_DIR: &str = ".devtrack";
pub const CONFIG_FILE: &str = "config.yaml";
pub const STORE_FILE: &str = "store.jsonl";

pub const ACTOR_ENV: &str = "DEVTRACK_ACTOR";
pub const STORE_ENV: &str = "DEVTRACK_STORE";

/// Contents of `.devtrack/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Store file; relative paths are resolved against the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub actor: Option<String>,
    pub store: Option<PathBuf>,
}

/// Environment values that feed resolution.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub actor: Option<String>,
    pub store: Option<PathBuf>,
    pub user: Option<String>,
}

impl EnvOverrides {
    /// Read `DEVTRACK_ACTOR`, `DEVTRACK_STORE` and `USER`, ignoring blanks.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            actor: var(ACTOR_ENV),
            store: var(STORE_ENV).map(PathBuf::from),
            user: var("USER"),
        }
    }
}

/// Walk up from `start` (or the current directory) to find `.devtrack/`.
///
/// # Errors
///
/// Returns `NotInitialized` if no ancestor contains a workspace.
pub fn discover_devtrack_dir(start: Option<&Path>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        let candidate = dir.join(DEVTRACK_DIR);
        if candidate.is_dir() {
            debug!(path = %candidate.display(), "found workspace");
            return Ok(candidate);
        }
        current = dir.parent();
    }
    Err(DevTrackError::NotInitialized)
}

/// Load `config.yaml` from a workspace directory. A missing file is an
/// empty config.
///
/// # Errors
///
/// Returns `Config` if the file exists but is not valid YAML for [`Config`].
pub fn load_config(devtrack_dir: &Path) -> Result<Config> {
    let path = devtrack_dir.join(CONFIG_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e.into()),
    };
    let has_content = contents
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_content {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents)
        .map_err(|e| DevTrackError::Config(format!("{}: {e}", path.display())))
}

/// Pick the acting user by precedence.
///
/// # Errors
///
/// Returns `Config` if no source yields a non-blank identity.
pub fn resolve_actor(config: &Config, cli: &CliOverrides, env: &EnvOverrides) -> Result<UserId> {
    [
        cli.actor.as_deref(),
        env.actor.as_deref(),
        config.actor.as_deref(),
        env.user.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(UserId::new)
    .find(|id| !id.is_empty())
    .ok_or_else(|| {
        DevTrackError::Config(format!(
            "no actor configured; pass --actor or set {ACTOR_ENV}"
        ))
    })
}

/// Pick the store file by precedence.
#[must_use]
pub fn resolve_store_path(
    devtrack_dir: Option<&Path>,
    config: &Config,
    cli: &CliOverrides,
    env: &EnvOverrides,
) -> Option<PathBuf> {
    if let Some(path) = cli.store.clone().or_else(|| env.store.clone()) {
        return Some(path);
    }
    let dir = devtrack_dir?;
    match &config.store {
        Some(path) if path.is_absolute() => Some(path.clone()),
        Some(path) => Some(dir.parent().unwrap_or(dir).join(path)),
        None => Some(dir.join(STORE_FILE)),
    }
}

/// An opened store plus the identity acting on it.
#[derive(Debug)]
pub struct StoreContext {
    pub store: InMemoryStore,
    pub path: PathBuf,
    pub actor: UserId,
}

impl StoreContext {
    /// Write the store back if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn flush(&mut self) -> Result<()> {
        if !self.store.is_dirty() {
            return Ok(());
        }
        debug!(path = %self.path.display(), records = self.store.dirty_count(), "saving store");
        self.store.save_to(&self.path)?;
        self.store.clear_dirty();
        Ok(())
    }
}

/// Discover the workspace, resolve actor and store, and load the store.
///
/// An explicit store path (flag or environment) works without a workspace;
/// a missing file there starts an empty store.
///
/// # Errors
///
/// Returns `NotInitialized` when there is neither a workspace nor an
/// explicit store, or any config/parse error.
pub fn open_store_with_cli(cli: &CliOverrides) -> Result<StoreContext> {
    open_store_with(cli, &EnvOverrides::from_env(), None)
}

/// [`open_store_with_cli`] with explicit environment and start directory.
///
/// # Errors
///
/// See [`open_store_with_cli`].
pub fn open_store_with(
    cli: &CliOverrides,
    env: &EnvOverrides,
    start: Option<&Path>,
) -> Result<StoreContext> {
    let devtrack_dir = match discover_devtrack_dir(start) {
        Ok(dir) => Some(dir),
        Err(DevTrackError::NotInitialized) if cli.store.is_some() || env.store.is_some() => None,
        Err(e) => return Err(e),
    };
    let config = match &devtrack_dir {
        Some(dir) => load_config(dir)?,
        None => Config::default(),
    };

    let actor = resolve_actor(&config, cli, env)?;
    let path = resolve_store_path(devtrack_dir.as_deref(), &config, cli, env)
        .ok_or(DevTrackError::NotInitialized)?;

    let store = match InMemoryStore::open(&path) {
        Ok(store) => store,
        Err(DevTrackError::FileNotFound(_)) => InMemoryStore::new(),
        Err(e) => return Err(e),
    };

    Ok(StoreContext { store, path, actor })
}
