// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{CategorySet, Record};

/// User-controlled visibility criteria. Both conditions must hold for a
/// record to be shown; an empty query or an empty selection disables that
/// condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub name_query: String,
    pub selected_categories: BTreeSet<String>,
}

impl FilterState {
    pub fn matches(&self, record: &Record) -> bool {
        self.text_matches(record) && self.category_matches(record)
    }

    pub fn text_matches(&self, record: &Record) -> bool {
        self.name_query.is_empty() || record.name.contains(self.name_query.as_str())
    }

    pub fn category_matches(&self, record: &Record) -> bool {
        self.selected_categories.is_empty() || self.selected_categories.contains(&record.category)
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn is_checked(&self, category: &str) -> bool {
        self.selected_categories.contains(category)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.name_query.is_empty() && self.selected_categories.is_empty()
    }

    /// Returns true when the selection changed.
    pub fn toggle_category(&mut self, category: &str, checked: bool) -> bool {
        if checked {
            self.selected_categories.insert(category.to_owned())
        } else {
            self.selected_categories.remove(category)
        }
    }

    pub fn set_name_query(&mut self, query: impl Into<String>) {
        self.name_query = query.into();
    }

    pub fn clear(&mut self) {
        self.name_query.clear();
        self.selected_categories.clear();
    }

    /// Drops selections that no longer name a known category and returns
    /// them in sorted order.
    pub fn retain_known(&mut self, categories: &CategorySet) -> Vec<String> {
        let dropped: Vec<String> = self
            .selected_categories
            .iter()
            .filter(|category| !categories.contains(category))
            .cloned()
            .collect();
        for category in &dropped {
            self.selected_categories.remove(category);
        }
        dropped
    }
}
