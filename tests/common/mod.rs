//! Shared utilities for integration tests.

use std::env;
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys the resolver reads from the environment.
pub const APP_KEYS: [&str; 3] = ["APP_ENV", "PORT", "DB_DSN"];

/// RAII guard for setting and restoring environment variables.
///
/// Tests using it must be `#[serial]`: the environment is process-global.
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

impl EnvGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}

/// Unset every recognized key until the guards drop. Also undoes anything a
/// `.env` file loads for those keys during the test.
pub fn clear_app_env() -> Vec<EnvGuard> {
    APP_KEYS.iter().map(|key| EnvGuard::remove(key)).collect()
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A port that was free a moment ago.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Poll `url` until it answers or the attempts run out.
#[allow(dead_code)]
pub async fn wait_for(url: &str) -> reqwest::Response {
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(response) = client.get(url).send().await {
            return response;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {} never became ready", url);
}
