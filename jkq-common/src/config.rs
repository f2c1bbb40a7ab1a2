//! Configuration loading and root folder resolution

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable naming the root folder.
pub const ROOT_FOLDER_ENV: &str = "JKQ_ROOT_FOLDER";

/// Report worker configuration from TOML.
///
/// All paths may be relative; relative paths resolve against the root
/// folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Root folder (lowest-priority source; CLI argument and environment
    /// variable override it).
    pub root_folder: Option<PathBuf>,
    /// Directory the report messages are dropped into.
    pub inbox_dir: PathBuf,
    pub dataset_file: PathBuf,
    pub state_file: PathBuf,
    pub audit_log: PathBuf,
    /// Only messages whose subject starts with this prefix are processed.
    /// Empty accepts everything.
    pub subject_prefix: String,
    /// Watch-mode rescan interval.
    pub scan_interval_secs: u64,
    /// Commit and push dataset changes after a run that updated records.
    pub auto_commit: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            inbox_dir: PathBuf::from("inbox"),
            dataset_file: PathBuf::from("data/questions.final.tagged.json"),
            state_file: PathBuf::from("state/report_worker_state.json"),
            audit_log: PathBuf::from("data/report-fixes.log.jsonl"),
            subject_prefix: "Jagdkurs Meldung:".to_string(),
            scan_interval_secs: 900,
            auto_commit: false,
        }
    }
}

impl WorkerConfig {
    /// Load from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {} failed: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("parse {} failed: {e}", path.display())))
    }

    /// Load from the platform config path, or defaults when none exists.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the configured paths against a root folder.
    pub fn paths(&self, root: &Path) -> WorkerPaths {
        WorkerPaths {
            inbox_dir: resolve_against(root, &self.inbox_dir),
            dataset_file: resolve_against(root, &self.dataset_file),
            state_file: resolve_against(root, &self.state_file),
            audit_log: resolve_against(root, &self.audit_log),
        }
    }
}

/// Fully resolved filesystem locations for one worker run.
#[derive(Debug, Clone)]
pub struct WorkerPaths {
    pub inbox_dir: PathBuf,
    pub dataset_file: PathBuf,
    pub state_file: PathBuf,
    pub audit_log: PathBuf,
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Root folder resolution priority:
/// 1. Command-line argument (highest priority)
/// 2. `JKQ_ROOT_FOLDER` environment variable
/// 3. `root_folder` in the TOML config
/// 4. OS-dependent data directory default
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &WorkerConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_root_folder()
}

/// Platform config file: `~/.config/jkq/jkq-rw.toml` (per-user), falling
/// back to `/etc/jkq/jkq-rw.toml` on Linux. `None` when neither exists.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("jkq").join("jkq-rw.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/jkq/jkq-rw.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

/// OS-dependent default root folder (`~/.local/share/jkq` and platform
/// equivalents).
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("jkq"))
        .unwrap_or_else(|| PathBuf::from("./jkq_data"))
}
