// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use roster_app::Record;
use roster_source::RosterSource;
use roster_tui::{InternalEvent, RosterRuntime};
use std::sync::mpsc::Sender;
use std::thread;

pub struct SourceRuntime {
    source: RosterSource,
}

impl SourceRuntime {
    pub fn new(source: RosterSource) -> Self {
        Self { source }
    }
}

impl RosterRuntime for SourceRuntime {
    fn source_label(&self) -> String {
        self.source.describe()
    }

    fn load_records(&mut self) -> Result<Vec<Record>> {
        self.source.load()
    }

    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let source = self.source.clone();
        thread::Builder::new()
            .name("roster-load".to_owned())
            .spawn(move || {
                let event = match source.load() {
                    Ok(records) => InternalEvent::RecordsLoaded(records),
                    Err(error) => InternalEvent::LoadFailed(format!("{error:#}")),
                };
                let _ = tx.send(event);
            })?;
        Ok(())
    }
}
