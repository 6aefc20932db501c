//! Configuration schema definitions.
//!
//! `AppConfig` is the only domain record. Fields are bound from external keys
//! through an explicit table instead of serde attributes, so every key, the
//! field it lands in and the type it is coerced to are visible in one place.

use std::fmt;

/// Resolved application configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment environment (`APP_ENV`). Only `"production"` is special.
    pub environment_name: String,

    /// TCP port to listen on (`PORT`). Validated by the bind, not here.
    pub port: String,

    /// Database connection string (`DB_DSN`). Carried, never used.
    pub database_dsn: String,
}

impl AppConfig {
    /// External key for [`AppConfig::environment_name`].
    pub const APP_ENV: &'static str = "APP_ENV";
    /// External key for [`AppConfig::port`].
    pub const PORT: &'static str = "PORT";
    /// External key for [`AppConfig::database_dsn`].
    pub const DB_DSN: &'static str = "DB_DSN";

    /// Key-to-field table used by the resolver. Keys are case-sensitive.
    pub const BINDINGS: &'static [FieldBinding<AppConfig>] = &[
        FieldBinding {
            key: Self::APP_ENV,
            apply: |config, raw| assign(&mut config.environment_name, raw),
        },
        FieldBinding {
            key: Self::PORT,
            apply: |config, raw| assign(&mut config.port, raw),
        },
        FieldBinding {
            key: Self::DB_DSN,
            apply: |config, raw| assign(&mut config.database_dsn, raw),
        },
    ];
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dsn = if self.database_dsn.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("AppConfig")
            .field("environment_name", &self.environment_name)
            .field("port", &self.port)
            .field("database_dsn", &dsn)
            .finish()
    }
}

/// One row of a binding table: an external key and how to store its value.
pub struct FieldBinding<T> {
    /// Exact external key name.
    pub key: &'static str,

    /// Coerces the raw value and writes it into the target.
    /// Returns a human-readable reason on failure.
    pub apply: fn(&mut T, &str) -> Result<(), String>,
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding").field("key", &self.key).finish()
    }
}

/// Coerce `raw` into the slot's type and store it.
pub fn assign<V: ConfigValue>(slot: &mut V, raw: &str) -> Result<(), String> {
    *slot = V::parse_value(raw)?;
    Ok(())
}

/// A type that can be produced from a raw configuration string.
pub trait ConfigValue: Sized {
    fn parse_value(raw: &str) -> Result<Self, String>;
}

impl ConfigValue for String {
    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl ConfigValue for bool {
    fn parse_value(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(format!("expected a boolean, got {:?}", other)),
        }
    }
}

macro_rules! unsigned_config_value {
    ($($ty:ty),*) => {
        $(
            impl ConfigValue for $ty {
                fn parse_value(raw: &str) -> Result<Self, String> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("expected {}: {}", stringify!($ty), e))
                }
            }
        )*
    };
}

unsigned_config_value!(u16, u32, u64, usize);
