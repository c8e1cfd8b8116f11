// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::Record;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    BlankName { index: usize },
    BlankCategory { index: usize },
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { index } => write!(f, "record {index} has a blank name"),
            Self::BlankCategory { index } => write!(f, "record {index} has a blank category"),
        }
    }
}

impl std::error::Error for RecordError {}

pub type RecordResult<T> = std::result::Result<T, RecordError>;

pub fn validate_record(index: usize, record: &Record) -> RecordResult<()> {
    if record.name.trim().is_empty() {
        return Err(RecordError::BlankName { index });
    }
    if record.category.trim().is_empty() {
        return Err(RecordError::BlankCategory { index });
    }
    Ok(())
}

/// Checks every record and reports the first offender. Duplicate names are
/// accepted since names only serve as display keys.
pub fn validate_records(records: &[Record]) -> RecordResult<()> {
    for (index, record) in records.iter().enumerate() {
        validate_record(index, record)?;
    }

    let duplicates = duplicate_names(records);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "roster contains duplicate names");
    }
    Ok(())
}

pub fn duplicate_names(records: &[Record]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for record in records {
        if !seen.insert(record.name.as_str()) {
            duplicates.insert(record.name.clone());
        }
    }
    duplicates.into_iter().collect()
}
