use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub tick_ms: u64,
    /// How long the "Saved" indicator stays up, in ticks.
    pub save_indicator_ticks: u32,
    /// How long a status message stays up, in ticks.
    pub status_ticks: u32,
    pub tree_max_depth: Option<u32>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    /// Where this config was (or would have been) read from.
    pub path: PathBuf,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 120,
            tick_ms: 50,
            save_indicator_ticks: 40,
            status_ticks: 60,
            tree_max_depth: None,
            log_level: None,
            log_file: None,
            path: default_config_path(),
        }
    }
}

impl WorkbenchConfig {
    /// Log file to write to when none is given on the command line.
    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => self
                .path
                .parent()
                .map(|dir| dir.join("workbench.log"))
                .unwrap_or_else(|| PathBuf::from("workbench.log")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server_url: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    tick_ms: Option<u64>,
    #[serde(default)]
    save_indicator_ticks: Option<u32>,
    #[serde(default)]
    status_ticks: Option<u32>,
    #[serde(default)]
    tree_max_depth: Option<u32>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_file: Option<PathBuf>,
}

pub fn default_config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("workbench");
    path.push("config.toml");
    path
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `path` (default `~/.config/workbench/config.toml`),
/// falling back to defaults for a missing or malformed file and for any
/// key the file leaves out.
pub fn load_config(path: Option<&Path>) -> WorkbenchConfig {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let defaults = WorkbenchConfig {
        path: path.clone(),
        ..WorkbenchConfig::default()
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return defaults,
    };

    let file: ConfigFile = match toml::from_str(&contents) {
        Ok(f) => f,
        Err(_) => return defaults,
    };

    WorkbenchConfig {
        server_url: file
            .server_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.server_url),
        request_timeout_secs: file
            .request_timeout_secs
            .filter(|&s| s > 0)
            .unwrap_or(defaults.request_timeout_secs),
        tick_ms: file.tick_ms.filter(|&t| t > 0).unwrap_or(defaults.tick_ms),
        save_indicator_ticks: file
            .save_indicator_ticks
            .unwrap_or(defaults.save_indicator_ticks),
        status_ticks: file.status_ticks.unwrap_or(defaults.status_ticks),
        tree_max_depth: file.tree_max_depth,
        log_level: file.log_level,
        log_file: file.log_file,
        path,
    }
}

/// Persist the server URL to the config file at `path`.
/// Reads the existing file (if any), updates only `server_url`, and writes
/// back, preserving every other key.
pub fn save_settings(path: &Path, server_url: &str) -> Result<()> {
    // Read existing config as a TOML table to preserve unknown fields
    let mut table = if let Ok(contents) = std::fs::read_to_string(path) {
        contents
            .parse::<toml::Table>()
            .unwrap_or_else(|_| toml::Table::new())
    } else {
        toml::Table::new()
    };

    table.insert(
        "server_url".to_string(),
        toml::Value::String(server_url.to_string()),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(&table)?;
    std::fs::write(path, toml_string).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
