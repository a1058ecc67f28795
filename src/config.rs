use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bindings::{Binding, KeySpec};
use crate::error::ConfigError;
use crate::status::{is_valid_time_format, DEFAULT_TIME_FORMAT};
use crate::theme::{parse_color, StatusPalette, BUILTIN_THEMES, DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME};

/// Pseudo command answered by the native host from `sysinfo` instead of spawning a process.
pub const SYSINFO_COMMAND: &str = "@sysinfo";

const CONFIG_CANDIDATES: &[&str] = &["config.yaml", "config.yml", "config.toml", "config.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearancePref {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsMode {
    #[default]
    Auto,
    Command,
    Sysinfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub time_format: String,
    pub stats: StatsMode,
    pub stats_command: Option<Vec<String>>,
    pub interval_ms: u64,
    pub show_hostname: bool,
    pub colors: HashMap<String, String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            stats: StatsMode::Auto,
            stats_command: None,
            interval_ms: 1000,
            show_hostname: true,
            colors: HashMap::new(),
        }
    }
}

fn top_command() -> Vec<String> {
    ["top", "-l", "1", "-n", "0"].iter().map(ToString::to_string).collect()
}

impl StatusConfig {
    /// The argv run on every status tick.
    #[must_use]
    pub fn resolve_stats_command(&self) -> Vec<String> {
        match self.stats {
            StatsMode::Sysinfo => vec![SYSINFO_COMMAND.to_string()],
            StatsMode::Command => self.stats_command.clone().unwrap_or_else(top_command),
            StatsMode::Auto => match &self.stats_command {
                Some(cmd) => cmd.clone(),
                None if cfg!(target_os = "macos") => top_command(),
                None => vec![SYSINFO_COMMAND.to_string()],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub duration_ms: u64,
    pub icon: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 4000,
            icon: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub state_dir: Option<PathBuf>,
    pub appearance: AppearancePref,
    pub dark_theme: String,
    pub light_theme: String,
    /// Replaces the builtin catalog when set.
    pub themes: Option<Vec<String>>,
    pub status: StatusConfig,
    pub notifications: NotifyConfig,
    pub keys: Vec<KeySpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: None,
            appearance: AppearancePref::Auto,
            dark_theme: DEFAULT_DARK_THEME.to_string(),
            light_theme: DEFAULT_LIGHT_THEME.to_string(),
            themes: None,
            status: StatusConfig::default(),
            notifications: NotifyConfig::default(),
            keys: Vec::new(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn theme_names(&self) -> Vec<String> {
        match &self.themes {
            Some(list) => list.clone(),
            None => BUILTIN_THEMES.iter().map(ToString::to_string).collect(),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Parses a config file, picking the format from the extension (TOML otherwise).
///
/// # Errors
/// Returns `ConfigError` when the file cannot be read or does not parse.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parsed = match extension_of(path).as_deref() {
        Some("yml" | "yaml") => serde_yaml::from_str::<Config>(&s).map_err(|e| e.to_string()),
        Some("json") => serde_json::from_str::<Config>(&s).map_err(|e| e.to_string()),
        _ => toml::from_str::<Config>(&s).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

/// `<config_dir>/termrc`, where the config file is looked up.
#[must_use]
pub fn config_home() -> PathBuf {
    crate::store::default_state_dir()
}

#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|c| dir.join(c))
        .find(|p| p.exists())
}

/// Loads an explicit config (which must parse) or the first discovered one.
/// A discovered file that fails to parse is reported and replaced by defaults.
///
/// # Errors
/// Returns an error when an explicitly requested file cannot be loaded.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = load_config_file(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }
    match find_config_file(&config_home()) {
        Some(path) => match load_config_file(&path) {
            Ok(cfg) => Ok((cfg, Some(path))),
            Err(e) => {
                warn!(error = %e, "falling back to default config");
                Ok((Config::default(), Some(path)))
            }
        },
        None => Ok((Config::default(), None)),
    }
}

/// Writes `cfg` as pretty TOML, creating parent directories.
///
/// # Errors
/// Returns an error when serialization or the write fails.
pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let s = toml::to_string_pretty(cfg)?;
    fs::write(path, s)?;
    Ok(())
}

/// Returns `(errors, warnings)`.
#[must_use]
pub fn validate_config(cfg: &Config) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let names = cfg.theme_names();
    if names.is_empty() {
        errors.push("themes is empty; theme rotation needs at least one name".to_string());
    }
    for (label, theme) in [("dark_theme", &cfg.dark_theme), ("light_theme", &cfg.light_theme)] {
        if !names.is_empty() && !names.iter().any(|n| n == theme) {
            warnings.push(format!(
                "{label} '{theme}' is not in the theme list; rotation starts from the first entry"
            ));
        }
    }

    if !is_valid_time_format(&cfg.status.time_format) {
        errors.push(format!(
            "status.time_format '{}' is not a valid strftime format",
            cfg.status.time_format
        ));
    }
    if cfg.status.interval_ms < 250 {
        warnings.push(format!(
            "status.interval_ms={} is very short; the stats command may not keep up",
            cfg.status.interval_ms
        ));
    }
    if let Some(cmd) = &cfg.status.stats_command {
        if cmd.is_empty() || cmd[0].trim().is_empty() {
            errors.push("status.stats_command is empty".to_string());
        }
    }
    let mut palette = StatusPalette::default();
    for (k, v) in &cfg.status.colors {
        if parse_color(v).is_none() {
            errors.push(format!("status.colors.{k}: '{v}' is not a color"));
        } else if !palette.apply_token(k, v) {
            warnings.push(format!("status.colors.{k} is not a status segment"));
        }
    }

    if cfg.notifications.enabled && cfg.notifications.duration_ms == 0 {
        warnings.push("notifications.duration_ms=0 hides notifications immediately".to_string());
    }

    for spec in &cfg.keys {
        if let Err(e) = Binding::try_from(spec) {
            errors.push(format!("keys: {}+{} -> {}: {e}", spec.mods, spec.key, spec.action));
        }
    }

    (errors, warnings)
}
