// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// One entry in the roster: a display name tagged with a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub category: String,
}

impl Record {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Distinct category labels in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn derive(records: &[Record]) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for record in records {
            if !labels.iter().any(|label| *label == record.category) {
                labels.push(record.category.clone());
            }
        }
        Self(labels)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|label| label == category)
    }

    pub fn position(&self, category: &str) -> Option<usize> {
        self.0.iter().position(|label| label == category)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CategorySet, Record};

    #[test]
    fn derive_keeps_first_seen_order_without_duplicates() {
        let records = vec![
            Record::new("A", "cat"),
            Record::new("B", "dog"),
            Record::new("C", "cat"),
        ];

        let categories = CategorySet::derive(&records);
        assert_eq!(categories.as_slice(), ["cat".to_owned(), "dog".to_owned()]);
    }

    #[test]
    fn derive_of_empty_roster_is_empty() {
        let categories = CategorySet::derive(&[]);
        assert!(categories.is_empty());
        assert_eq!(categories.len(), 0);
    }

    #[test]
    fn derive_orders_by_first_index_not_frequency() {
        let records = vec![
            Record::new("a", "fox"),
            Record::new("b", "bear"),
            Record::new("c", "bear"),
            Record::new("d", "bear"),
            Record::new("e", "fox"),
            Record::new("f", "owl"),
        ];

        let categories = CategorySet::derive(&records);
        assert_eq!(categories.iter().collect::<Vec<_>>(), vec!["fox", "bear", "owl"]);
        assert_eq!(categories.position("owl"), Some(2));
        assert_eq!(categories.get(1), Some("bear"));
        assert!(categories.contains("fox"));
        assert!(!categories.contains("Fox"));
    }
}
