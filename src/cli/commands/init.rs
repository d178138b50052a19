use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE, DEVTRACK_DIR, STORE_FILE};
use crate::error::{DevTrackError, Result};
use crate::output::OutputContext;
use devtrack_lib::jsonl;

const CONFIG_TEMPLATE: &str = r"# DevTrack workspace configuration
# Acting user when --actor and DEVTRACK_ACTOR are not set (defaults to $USER)
# actor: alice
# Store file, relative to the directory containing .devtrack/
# store: .devtrack/store.jsonl
";

const GITIGNORE: &str = r"# Interrupted writes
*.jsonl.tmp
";

#[derive(Serialize)]
struct InitOutput<'a> {
    path: &'a str,
    store: String,
}

/// Execute the init command in the current directory.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a store exists and `--force` was not
/// given, or an I/O error if the files cannot be written.
pub fn execute(args: &InitArgs, ctx: &OutputContext) -> Result<()> {
    init_at(Path::new("."), args.force)?;

    let store = Path::new(DEVTRACK_DIR).join(STORE_FILE);
    if ctx.is_json() {
        ctx.json(&InitOutput {
            path: DEVTRACK_DIR,
            store: store.display().to_string(),
        })?;
    } else {
        ctx.line(format!("Initialized devtrack workspace in {DEVTRACK_DIR}/"));
    }
    Ok(())
}

/// Create `.devtrack/` under `root` with a config template and empty store.
///
/// An existing config file is left alone.
///
/// # Errors
///
/// See [`execute`].
pub fn init_at(root: &Path, force: bool) -> Result<()> {
    let devtrack_dir = root.join(DEVTRACK_DIR);
    let store_path = devtrack_dir.join(STORE_FILE);

    if devtrack_dir.exists() {
        if store_path.exists() && !force {
            return Err(DevTrackError::AlreadyInitialized { path: store_path });
        }
    } else {
        fs::create_dir(&devtrack_dir)?;
    }

    // --force empties an existing store
    jsonl::save(&store_path, &[], &[])?;

    let config_path = devtrack_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(config_path, CONFIG_TEMPLATE)?;
    }

    let gitignore_path = devtrack_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, GITIGNORE)?;
    }

    info!(path = %devtrack_dir.display(), force, "workspace initialized");
    Ok(())
}
