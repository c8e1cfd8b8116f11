// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use roster_app::Record;
use serde::Serialize;
use std::path::{Path, PathBuf};

const NAME_STEMS: [&str; 10] = [
    "クマ", "ネコ", "キツネ", "リス", "ウサギ", "タヌキ", "シカ", "フクロウ", "ペンギン", "カメ",
];

const NAME_SUFFIXES: [&str; 6] = ["たん", "すけ", "さん", "ちゃん", "まる", "ぼう"];

const CATEGORIES: [&str; 7] = ["くま", "ねこ", "きつね", "りす", "うさぎ", "とり", "かめ"];

/// Fixed roster covering katakana, hiragana and mixed names across four
/// categories.
pub fn sample_records() -> Vec<Record> {
    [
        ("シューちゃん", "ねこ"),
        ("ジェラトーニ", "ねこ"),
        ("クマたん", "くま"),
        ("クマすけ", "くま"),
        ("テディベア", "くま"),
        ("リボンのくまさん", "くま"),
        ("ダンテさん", "どらごん"),
        ("あかねまる", "きつね"),
    ]
    .into_iter()
    .map(|(name, category)| Record::new(name, category))
    .collect()
}

pub fn names(records: &[&Record]) -> Vec<String> {
    records.iter().map(|record| record.name.clone()).collect()
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for rosters of arbitrary size, used by property-style
/// tests that sweep many inputs.
#[derive(Debug, Clone)]
pub struct RosterFaker {
    rng: DeterministicRng,
}

impl RosterFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn category(&mut self) -> &'static str {
        CATEGORIES[self.rng.int_n(CATEGORIES.len())]
    }

    pub fn name(&mut self) -> String {
        let stem = NAME_STEMS[self.rng.int_n(NAME_STEMS.len())];
        let suffix = NAME_SUFFIXES[self.rng.int_n(NAME_SUFFIXES.len())];
        format!("{stem}{suffix}")
    }

    pub fn record(&mut self) -> Record {
        Record::new(self.name(), self.category())
    }

    pub fn roster(&mut self, len: usize) -> Vec<Record> {
        (0..len).map(|_| self.record()).collect()
    }

    /// A substring of a generated name, or an empty query.
    pub fn query(&mut self) -> String {
        match self.rng.int_n(4) {
            0 => String::new(),
            1 => NAME_STEMS[self.rng.int_n(NAME_STEMS.len())].to_owned(),
            _ => NAME_SUFFIXES[self.rng.int_n(NAME_SUFFIXES.len())].to_owned(),
        }
    }
}

pub fn all_categories() -> &'static [&'static str] {
    &CATEGORIES
}

#[derive(Serialize)]
struct TomlRoster<'a> {
    record: &'a [Record],
}

pub fn roster_toml(records: &[Record]) -> Result<String> {
    toml::to_string(&TomlRoster { record: records }).context("encode roster fixture as TOML")
}

pub fn roster_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).context("encode roster fixture as JSON")
}

pub fn write_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn temp_roster_file(
    file_name: &str,
    records: &[Record],
) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let content = if file_name.ends_with(".json") {
        roster_json(records)?
    } else {
        roster_toml(records)?
    };
    let path = write_file(dir.path(), file_name, &content)?;
    Ok((dir, path))
}
