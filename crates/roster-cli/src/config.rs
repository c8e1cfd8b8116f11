// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TITLE: &str = "friends";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub title: Option<String>,
    pub initial_query: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            title: Some(DEFAULT_TITLE.to_owned()),
            initial_query: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            path: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        Ok(config_root.join(roster_source::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is missing `version = 1`; add it and keep values under [data], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(data_path) = &self.data.path {
            roster_source::validate_roster_path(data_path)
                .with_context(|| format!("invalid data.path in {}", path.display()))?;
        }

        if let Some(title) = &self.ui.title
            && title.trim().is_empty()
        {
            bail!("ui.title in {} must not be blank", path.display());
        }

        if let Some(log_path) = &self.log.path
            && log_path.trim().is_empty()
        {
            bail!("log.path in {} must not be empty", path.display());
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        Ok(())
    }

    /// Configured roster file, falling back to `ROSTER_DATA_PATH`. `None`
    /// leaves the choice to the default roster file or the built-in roster.
    pub fn data_path(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.data.path {
            return Ok(Some(PathBuf::from(path)));
        }
        let Some(value) = env::var_os(roster_source::DATA_PATH_ENV) else {
            return Ok(None);
        };
        roster_source::validate_roster_path(&value.to_string_lossy())
            .with_context(|| format!("invalid {}", roster_source::DATA_PATH_ENV))?;
        Ok(Some(PathBuf::from(value)))
    }

    pub fn title(&self) -> &str {
        self.ui.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn initial_query(&self) -> &str {
        self.ui.initial_query.as_deref().unwrap_or("")
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.path.as_deref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# roster config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Omit to use the built-in roster.\n# path = \"/absolute/path/to/roster.toml\"\n\n[ui]\ntitle = \"{}\"\ninitial_query = \"\"\n\n[log]\n# Optional. Without a path nothing is logged.\n# path = \"/absolute/path/to/roster.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_TITLE,
            DEFAULT_LOG_LEVEL,
        )
    }
}
