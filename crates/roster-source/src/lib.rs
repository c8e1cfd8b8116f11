// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod validation;

pub use validation::*;

use anyhow::{Context, Result, anyhow, bail};
use roster_app::Record;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "roster";
pub const DATA_PATH_ENV: &str = "ROSTER_DATA_PATH";

const BUILTIN_ROSTER: [(&str, &str); 11] = [
    ("シューちゃん", "猫"),
    ("ジェラトーニ", "猫"),
    ("クマたん", "熊"),
    ("クマすけ", "熊"),
    ("テディベア", "熊"),
    ("リボンのくまさん", "熊"),
    ("ハンさん", "ユニコーン"),
    ("ダンテさん", "ドラゴン"),
    ("スカイア", "ドラゴン"),
    ("きりんさん", "キリン"),
    ("あかねまる", "狐"),
];

/// The roster shipped with the binary, used until a roster file is configured.
pub fn builtin_records() -> Vec<Record> {
    BUILTIN_ROSTER
        .iter()
        .map(|(name, category)| Record::new(*name, *category))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Toml,
    Json,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "roster file {} has an unsupported extension; use .toml or .json",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TomlRoster {
    #[serde(default)]
    record: Vec<Record>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonRoster {
    List(Vec<Record>),
    Wrapped { records: Vec<Record> },
}

pub fn parse_roster(raw: &str, format: RosterFormat) -> Result<Vec<Record>> {
    let records = match format {
        RosterFormat::Toml => toml::from_str::<TomlRoster>(raw)
            .context("parse TOML roster")?
            .record,
        RosterFormat::Json => match serde_json::from_str::<JsonRoster>(raw)
            .context("parse JSON roster; expected an array of {name, category} objects")?
        {
            JsonRoster::List(records) | JsonRoster::Wrapped { records } => records,
        },
    };
    validate_records(&records)?;
    Ok(records)
}

pub fn load_roster_file(path: &Path) -> Result<Vec<Record>> {
    let format = RosterFormat::from_path(path)?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster file {}", path.display()))?;
    let records = parse_roster(&raw, format)
        .with_context(|| format!("load roster file {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "roster file loaded");
    Ok(records)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Builtin,
    File(PathBuf),
}

impl RosterSource {
    pub fn load(&self) -> Result<Vec<Record>> {
        match self {
            Self::Builtin => Ok(builtin_records()),
            Self::File(path) => load_roster_file(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Builtin => "built-in roster".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn default_roster_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(DATA_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {DATA_PATH_ENV} to a roster file path")
    })?;

    Ok(data_root.join(APP_NAME).join("roster.toml"))
}

pub fn validate_roster_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("roster path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!("roster path {path:?} looks like a URI ({scheme}://); use a filesystem path");
        }
    }

    if path.starts_with("file:") {
        bail!("roster path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    Ok(())
}
