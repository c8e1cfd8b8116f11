// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CategorySet, FilterState, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    NotLoaded,
    UnknownCategory(String),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded => f.write_str("roster is not loaded yet"),
            Self::UnknownCategory(category) => write!(f, "unknown category {category:?}"),
        }
    }
}

impl std::error::Error for StateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterState {
    lifecycle: Lifecycle,
    records: Vec<Record>,
    categories: CategorySet,
    filter: FilterState,
    pub status_line: Option<String>,
}

impl Default for RosterState {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            records: Vec::new(),
            categories: CategorySet::default(),
            filter: FilterState::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Load(Vec<Record>),
    ToggleCategory { category: String, checked: bool },
    SetNameQuery(String),
    ClearFilters,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Loaded { records: usize, categories: usize },
    SelectionReconciled { dropped: Vec<String> },
    CategoryToggled { category: String, checked: bool },
    NameQueryChanged(String),
    FiltersCleared,
    StatusUpdated(String),
    StatusCleared,
}

/// Read-only view of the roster handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot<'a> {
    pub lifecycle: Lifecycle,
    pub categories: &'a CategorySet,
    pub filter: &'a FilterState,
    pub visible: Vec<&'a Record>,
    pub total: usize,
}

impl RosterSnapshot<'_> {
    pub fn is_checked(&self, category: &str) -> bool {
        self.filter.is_checked(category)
    }

    pub fn is_loaded(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }
}

impl RosterState {
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> Vec<&Record> {
        self.filter.apply(&self.records)
    }

    pub fn snapshot(&self) -> RosterSnapshot<'_> {
        RosterSnapshot {
            lifecycle: self.lifecycle,
            categories: &self.categories,
            filter: &self.filter,
            visible: self.visible(),
            total: self.records.len(),
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Result<Vec<AppEvent>, StateError> {
        match command {
            AppCommand::Load(records) => Ok(self.load(records)),
            AppCommand::ToggleCategory { category, checked } => {
                self.ensure_active()?;
                if checked && !self.categories.contains(&category) {
                    tracing::warn!(%category, "rejected toggle for unknown category");
                    return Err(StateError::UnknownCategory(category));
                }
                if !self.filter.toggle_category(&category, checked) {
                    return Ok(Vec::new());
                }
                tracing::debug!(%category, checked, "category toggled");
                Ok(vec![AppEvent::CategoryToggled { category, checked }])
            }
            AppCommand::SetNameQuery(query) => {
                self.ensure_active()?;
                if self.filter.name_query == query {
                    return Ok(Vec::new());
                }
                self.filter.set_name_query(query.clone());
                Ok(vec![AppEvent::NameQueryChanged(query)])
            }
            AppCommand::ClearFilters => {
                self.ensure_active()?;
                self.filter.clear();
                Ok(vec![
                    AppEvent::FiltersCleared,
                    self.set_status("filters cleared"),
                ])
            }
            AppCommand::SetStatus(message) => Ok(vec![self.set_status(&message)]),
            AppCommand::ClearStatus => {
                self.status_line = None;
                Ok(vec![AppEvent::StatusCleared])
            }
        }
    }

    fn load(&mut self, records: Vec<Record>) -> Vec<AppEvent> {
        self.categories = CategorySet::derive(&records);
        self.records = records;
        self.lifecycle = Lifecycle::Active;
        tracing::info!(
            records = self.records.len(),
            categories = self.categories.len(),
            "roster loaded"
        );

        let mut events = vec![AppEvent::Loaded {
            records: self.records.len(),
            categories: self.categories.len(),
        }];
        let dropped = self.filter.retain_known(&self.categories);
        if !dropped.is_empty() {
            tracing::info!(?dropped, "dropped selections for missing categories");
            events.push(AppEvent::SelectionReconciled { dropped });
        }
        events
    }

    fn ensure_active(&self) -> Result<(), StateError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Uninitialized => Err(StateError::NotLoaded),
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, Lifecycle, RosterState, StateError};
    use crate::Record;

    fn records() -> Vec<Record> {
        vec![
            Record::new("シューちゃん", "ねこ"),
            Record::new("クマたん", "くま"),
            Record::new("クマすけ", "くま"),
            Record::new("リボンのくまさん", "くま"),
            Record::new("きりんさん", "きりん"),
        ]
    }

    fn loaded() -> RosterState {
        let mut state = RosterState::default();
        state
            .dispatch(AppCommand::Load(records()))
            .expect("load is always accepted");
        state
    }

    fn toggle(category: &str, checked: bool) -> AppCommand {
        AppCommand::ToggleCategory {
            category: category.to_owned(),
            checked,
        }
    }

    fn visible_names(state: &RosterState) -> Vec<String> {
        state
            .visible()
            .into_iter()
            .map(|record| record.name.clone())
            .collect()
    }

    #[test]
    fn starts_uninitialized_and_empty() {
        let state = RosterState::default();
        let snapshot = state.snapshot();

        assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
        assert!(!snapshot.is_loaded());
        assert!(snapshot.visible.is_empty());
        assert!(snapshot.categories.is_empty());
        assert_eq!(snapshot.total, 0);
    }

    #[test]
    fn mutations_before_load_are_rejected() {
        let mut state = RosterState::default();

        assert_eq!(
            state.dispatch(toggle("くま", true)),
            Err(StateError::NotLoaded)
        );
        assert_eq!(
            state.dispatch(AppCommand::SetNameQuery("ク".to_owned())),
            Err(StateError::NotLoaded)
        );
        assert_eq!(
            state.dispatch(AppCommand::ClearFilters),
            Err(StateError::NotLoaded)
        );
        assert!(state.filter().is_unfiltered());
    }

    #[test]
    fn load_derives_categories_and_activates() -> Result<(), StateError> {
        let mut state = RosterState::default();

        let events = state.dispatch(AppCommand::Load(records()))?;
        assert_eq!(
            events,
            vec![AppEvent::Loaded {
                records: 5,
                categories: 3,
            }]
        );
        assert_eq!(state.lifecycle(), Lifecycle::Active);
        assert_eq!(
            state.categories().iter().collect::<Vec<_>>(),
            vec!["ねこ", "くま", "きりん"]
        );
        assert_eq!(state.snapshot().visible.len(), 5);
        Ok(())
    }

    #[test]
    fn toggle_emits_event_only_on_change() -> Result<(), StateError> {
        let mut state = loaded();

        let events = state.dispatch(toggle("くま", true))?;
        assert_eq!(
            events,
            vec![AppEvent::CategoryToggled {
                category: "くま".to_owned(),
                checked: true,
            }]
        );
        assert!(state.dispatch(toggle("くま", true))?.is_empty());
        assert!(state.dispatch(toggle("ねこ", false))?.is_empty());
        assert!(state.snapshot().is_checked("くま"));
        Ok(())
    }

    #[test]
    fn unknown_category_cannot_be_selected() -> Result<(), StateError> {
        let mut state = loaded();

        assert_eq!(
            state.dispatch(toggle("どらごん", true)),
            Err(StateError::UnknownCategory("どらごん".to_owned()))
        );
        assert!(state.dispatch(toggle("どらごん", false))?.is_empty());
        assert!(state.filter().selected_categories.is_empty());
        Ok(())
    }

    #[test]
    fn combined_filter_through_dispatch() -> Result<(), StateError> {
        let mut state = loaded();

        state.dispatch(AppCommand::SetNameQuery("ん".to_owned()))?;
        state.dispatch(toggle("くま", true))?;
        assert_eq!(visible_names(&state), vec!["クマたん", "リボンのくまさん"]);
        Ok(())
    }

    #[test]
    fn toggle_round_trip_restores_rows() -> Result<(), StateError> {
        let mut state = loaded();
        let before = visible_names(&state);

        state.dispatch(toggle("くま", true))?;
        assert_eq!(
            visible_names(&state),
            vec!["クマたん", "クマすけ", "リボンのくまさん"]
        );
        state.dispatch(toggle("くま", false))?;

        assert_eq!(visible_names(&state), before);
        assert!(state.filter().selected_categories.is_empty());
        Ok(())
    }

    #[test]
    fn repeated_query_is_not_reported() -> Result<(), StateError> {
        let mut state = loaded();

        let first = state.dispatch(AppCommand::SetNameQuery("クマ".to_owned()))?;
        assert_eq!(first, vec![AppEvent::NameQueryChanged("クマ".to_owned())]);
        assert!(
            state
                .dispatch(AppCommand::SetNameQuery("クマ".to_owned()))?
                .is_empty()
        );
        Ok(())
    }

    #[test]
    fn clear_filters_resets_and_reports() -> Result<(), StateError> {
        let mut state = loaded();
        state.dispatch(AppCommand::SetNameQuery("xyz".to_owned()))?;
        assert!(state.visible().is_empty());
        state.dispatch(toggle("ねこ", true))?;

        let events = state.dispatch(AppCommand::ClearFilters)?;
        assert_eq!(
            events,
            vec![
                AppEvent::FiltersCleared,
                AppEvent::StatusUpdated("filters cleared".to_owned()),
            ]
        );
        assert!(state.filter().is_unfiltered());
        assert_eq!(state.visible().len(), 5);
        Ok(())
    }

    #[test]
    fn reload_drops_selections_for_missing_categories() -> Result<(), StateError> {
        let mut state = loaded();
        state.dispatch(toggle("ねこ", true))?;
        state.dispatch(toggle("くま", true))?;
        state.dispatch(AppCommand::SetNameQuery("ク".to_owned()))?;

        let events = state.dispatch(AppCommand::Load(vec![
            Record::new("クマたん", "くま"),
            Record::new("ダンテさん", "どらごん"),
        ]))?;

        assert_eq!(
            events,
            vec![
                AppEvent::Loaded {
                    records: 2,
                    categories: 2,
                },
                AppEvent::SelectionReconciled {
                    dropped: vec!["ねこ".to_owned()],
                },
            ]
        );
        assert!(state.filter().is_checked("くま"));
        assert_eq!(state.filter().name_query, "ク");
        assert_eq!(visible_names(&state), vec!["クマたん"]);
        Ok(())
    }

    #[test]
    fn status_set_and_clear() -> Result<(), StateError> {
        let mut state = RosterState::default();

        let events = state.dispatch(AppCommand::SetStatus("loading".to_owned()))?;
        assert_eq!(events, vec![AppEvent::StatusUpdated("loading".to_owned())]);
        assert_eq!(state.status_line.as_deref(), Some("loading"));

        state.dispatch(AppCommand::ClearStatus)?;
        assert_eq!(state.status_line, None);
        Ok(())
    }
}
