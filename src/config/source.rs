//! Configuration sources: the secrets file, the app file and the environment.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

/// Secrets file loaded into the process environment before resolution.
pub const SECRETS_FILE: &str = ".env";

/// Names tried, in order, for the app config file.
pub const CONFIG_FILE_CANDIDATES: &[&str] = &["app.env", "app"];

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Value of `key`, or `None` if unset or not valid unicode.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Load `<base_dir>/.env` into the process environment.
///
/// Best effort: a missing or broken file is skipped. Variables already set in
/// the process are left alone. Returns the path when the file was loaded.
pub fn load_secrets(base_dir: &Path) -> Option<PathBuf> {
    let path = base_dir.join(SECRETS_FILE);
    match dotenvy::from_path(&path) {
        Ok(()) => Some(path),
        Err(_) => None,
    }
}

/// First config file candidate in `base_dir` that is a regular file.
pub fn find_config_file(base_dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES
        .iter()
        .map(|name| base_dir.join(name))
        .find(|path| path.is_file())
}

/// Parse an env-format file into ordered key/value pairs.
///
/// `$VAR` and `${VAR}` in unquoted or double-quoted values are expanded from
/// earlier lines and the process environment; single-quoted values are literal.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, dotenvy::Error> {
    dotenvy::from_path_iter(path)?.collect()
}
