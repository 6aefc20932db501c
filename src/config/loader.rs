//! Configuration resolution.
//!
//! Precedence, lowest first: `.env` secrets (loaded into the process
//! environment), the `app` config file, environment variables. Overrides are
//! applied per key, then the merged set is bound through a [`FieldBinding`]
//! table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppConfig, FieldBinding};
use crate::config::source::{
    find_config_file, load_secrets, read_env_file, EnvSource, ProcessEnv,
};

/// Error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read or parsed.
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A value could not be coerced into its field's type.
    #[error("failed to bind {key}={value:?}: {reason}")]
    BindFailure {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: AppConfig,

    /// Secrets file that was loaded, if any.
    pub secrets_file: Option<PathBuf>,

    /// Config file that was read, if any.
    pub config_file: Option<PathBuf>,
}

/// Resolves [`AppConfig`] from the sources found in one directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    base_dir: PathBuf,
}

impl ConfigResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load the secrets file, then resolve against the process environment.
    pub fn resolve(&self) -> Result<Resolution, ConfigError> {
        let secrets_file = load_secrets(&self.base_dir);
        let mut resolution = self.resolve_with(&ProcessEnv)?;
        resolution.secrets_file = secrets_file;
        Ok(resolution)
    }

    /// Resolve the config file and `env` without touching the secrets file.
    pub fn resolve_with<E: EnvSource + ?Sized>(
        &self,
        env: &E,
    ) -> Result<Resolution, ConfigError> {
        let mut values = BTreeMap::new();

        let config_file = find_config_file(&self.base_dir);
        if let Some(path) = &config_file {
            let pairs = read_env_file(path).map_err(|source| ConfigError::ReadFailure {
                path: path.clone(),
                source,
            })?;
            values.extend(pairs);
        }

        apply_env_overrides(&mut values, AppConfig::BINDINGS, env);
        let config = bind(&values, AppConfig::BINDINGS)?;

        Ok(Resolution {
            config,
            secrets_file: None,
            config_file,
        })
    }
}

/// Resolve configuration from `base_dir` and the process environment.
pub fn resolve(base_dir: &Path) -> Result<AppConfig, ConfigError> {
    ConfigResolver::new(base_dir)
        .resolve()
        .map(|resolution| resolution.config)
}

/// Resolve configuration from `base_dir` and an explicit environment.
pub fn resolve_with<E: EnvSource + ?Sized>(
    base_dir: &Path,
    env: &E,
) -> Result<AppConfig, ConfigError> {
    ConfigResolver::new(base_dir)
        .resolve_with(env)
        .map(|resolution| resolution.config)
}

/// Overwrite `values` with every recognized key set in `env`.
/// Empty variables count as unset.
fn apply_env_overrides<T, E: EnvSource + ?Sized>(
    values: &mut BTreeMap<String, String>,
    table: &[FieldBinding<T>],
    env: &E,
) {
    for binding in table {
        if let Some(value) = env.lookup(binding.key).filter(|v| !v.is_empty()) {
            values.insert(binding.key.to_string(), value);
        }
    }
}

/// Build a `T` from `values` using `table`. Keys not in the table are ignored;
/// fields without a value keep their default.
pub fn bind<T: Default>(
    values: &BTreeMap<String, String>,
    table: &[FieldBinding<T>],
) -> Result<T, ConfigError> {
    let mut target = T::default();
    for binding in table {
        if let Some(raw) = values.get(binding.key) {
            (binding.apply)(&mut target, raw).map_err(|reason| ConfigError::BindFailure {
                key: binding.key,
                value: raw.clone(),
                reason,
            })?;
        }
    }
    Ok(target)
}
