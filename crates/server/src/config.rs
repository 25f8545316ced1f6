use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::Context;
use corpus::DEFAULT_RESULT_WINDOW;
use shared::protocol::DEFAULT_MAX_NEW_RESULTS;
use tracing::warn;

pub const DEFAULT_PORT: &str = "3001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub corpus_path: PathBuf,
    pub static_dir: PathBuf,
    pub max_new_results: usize,
    pub result_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: format!("0.0.0.0:{DEFAULT_PORT}"),
            corpus_path: PathBuf::from("completeworks.txt"),
            static_dir: PathBuf::from("static"),
            max_new_results: DEFAULT_MAX_NEW_RESULTS,
            result_window: DEFAULT_RESULT_WINDOW,
        }
    }
}

impl Settings {
    /// Port part of the bind address, used for the startup banner.
    pub fn port(&self) -> &str {
        self.server_bind
            .rsplit_once(':')
            .map(|(_, port)| port)
            .unwrap_or(DEFAULT_PORT)
    }
}

/// Reads `server.toml` from the working directory, then applies environment
/// overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string("server.toml") {
        Ok(raw) => apply_file(&mut settings, &raw).context("failed to parse server.toml")?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err).context("failed to read server.toml"),
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;

    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("corpus_path") {
        settings.corpus_path = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("static_dir") {
        settings.static_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("max_new_results") {
        settings.max_new_results = v
            .parse()
            .with_context(|| format!("max_new_results must be an integer, got '{v}'"))?;
    }
    if let Some(v) = file_cfg.get("result_window") {
        settings.result_window = v
            .parse()
            .with_context(|| format!("result_window must be an integer, got '{v}'"))?;
    }

    Ok(())
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup("PORT").filter(|port| !port.is_empty()) {
        settings.server_bind = format!("0.0.0.0:{port}");
    }
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("CORPUS_PATH") {
        settings.corpus_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__CORPUS_PATH") {
        settings.corpus_path = PathBuf::from(v);
    }

    if let Some(v) = lookup("STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__MAX_NEW_RESULTS") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.max_new_results = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__MAX_NEW_RESULTS"),
        }
    }
    if let Some(v) = lookup("APP__RESULT_WINDOW") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.result_window = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__RESULT_WINDOW"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
