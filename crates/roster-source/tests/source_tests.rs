// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use roster_app::{AppCommand, CategorySet, FilterState, Record, RosterState};
use roster_source::{RosterSource, load_roster_file};
use roster_testkit::{RosterFaker, names, sample_records, temp_roster_file, write_file};
use std::collections::BTreeSet;

#[test]
fn toml_roster_file_loads_in_source_order() -> Result<()> {
    let (_dir, path) = temp_roster_file("friends.toml", &sample_records())?;

    let records = load_roster_file(&path)?;
    assert_eq!(records, sample_records());
    Ok(())
}

#[test]
fn json_roster_file_loads_through_source() -> Result<()> {
    let (_dir, path) = temp_roster_file("friends.json", &sample_records())?;

    let records = RosterSource::File(path).load()?;
    assert_eq!(records.len(), sample_records().len());
    assert_eq!(records[2], Record::new("クマたん", "くま"));
    Ok(())
}

#[test]
fn wrapped_json_roster_file_loads() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let content = concat!(
        r#"{"records": [{"name": "きりんさん", "category": "キリン"},"#,
        r#" {"name": "あかねまる", "category": "狐"}]}"#,
    );
    let path = write_file(dir.path(), "roster.json", content)?;

    let records = load_roster_file(&path)?;
    assert_eq!(
        records,
        vec![Record::new("きりんさん", "キリン"), Record::new("あかねまる", "狐")]
    );
    Ok(())
}

#[test]
fn missing_roster_file_names_the_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.toml");

    let error = load_roster_file(&path).expect_err("missing file should fail");
    let message = format!("{error:#}");
    assert!(message.contains("read roster file"), "got {message}");
    assert!(message.contains("absent.toml"), "got {message}");
    Ok(())
}

#[test]
fn malformed_record_is_rejected_at_the_boundary() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(
        dir.path(),
        "roster.toml",
        "[[record]]\nname = \"クマたん\"\ncategory = \"くま\"\n\n[[record]]\nname = \"\"\ncategory = \"くま\"\n",
    )?;

    let error = load_roster_file(&path).expect_err("blank name should fail");
    let message = format!("{error:#}");
    assert!(message.contains("record 1 has a blank name"), "got {message}");
    Ok(())
}

#[test]
fn builtin_source_feeds_roster_state() -> Result<()> {
    let mut state = RosterState::default();
    state.dispatch(AppCommand::Load(RosterSource::Builtin.load()?))?;
    state.dispatch(AppCommand::SetNameQuery("クマ".to_owned()))?;

    assert_eq!(names(&state.visible()), vec!["クマたん", "クマすけ"]);
    state.dispatch(AppCommand::ToggleCategory {
        category: "熊".to_owned(),
        checked: true,
    })?;
    state.dispatch(AppCommand::SetNameQuery("ん".to_owned()))?;
    assert_eq!(names(&state.visible()), vec!["クマたん", "リボンのくまさん"]);
    Ok(())
}

#[test]
fn derived_categories_are_unique_known_and_first_seen() {
    for seed in 1..=64 {
        let mut faker = RosterFaker::new(seed);
        let len = faker.int_n(40);
        let records = faker.roster(len);
        let categories = CategorySet::derive(&records);

        let unique: BTreeSet<&str> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len(), "seed {seed}");
        assert!(
            records
                .iter()
                .all(|record| categories.contains(&record.category)),
            "seed {seed}"
        );

        let first_seen: Vec<usize> = categories
            .iter()
            .map(|category| {
                records
                    .iter()
                    .position(|record| record.category == category)
                    .unwrap_or(usize::MAX)
            })
            .collect();
        assert!(
            first_seen.windows(2).all(|pair| pair[0] < pair[1]),
            "seed {seed}"
        );
    }
}

#[test]
fn filtering_is_idempotent_and_a_subset() {
    for seed in 1..=64 {
        let mut faker = RosterFaker::new(seed);
        let records = faker.roster(24);
        let categories = CategorySet::derive(&records);

        let mut filter = FilterState::default();
        filter.set_name_query(faker.query());
        for category in categories.iter() {
            if faker.int_n(3) == 0 {
                filter.toggle_category(category, true);
            }
        }

        let once: Vec<Record> = filter.apply(&records).into_iter().cloned().collect();
        let twice: Vec<Record> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice, "seed {seed}");
        assert!(once.iter().all(|record| records.contains(record)), "seed {seed}");
        assert!(
            once.iter()
                .all(|record| record.name.contains(filter.name_query.as_str())),
            "seed {seed}"
        );
    }
}

#[test]
fn unfiltered_state_shows_everything() {
    for seed in 1..=16 {
        let records = RosterFaker::new(seed).roster(12);
        assert_eq!(FilterState::default().apply(&records).len(), records.len());
    }
}
