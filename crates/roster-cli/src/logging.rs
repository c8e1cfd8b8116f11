// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ROSTER_LOG";

/// Installs a file-backed subscriber. The terminal belongs to the UI, so
/// without a log file nothing is installed and events are dropped.
pub fn init(path: Option<&Path>, level: &str) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let directive = log_directive(level, env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).with_context(|| {
        format!("invalid log filter {directive:?}; check {LOG_ENV} or [log].level")
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(true)
}

fn log_directive(configured: &str, env_override: Option<String>) -> String {
    env_override
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| configured.to_owned())
}
