// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use roster_app::{AppCommand, AppEvent, Record, RosterSnapshot, RosterState, StateError};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    RecordsLoaded(Vec<Record>),
    LoadFailed(String),
}

/// Data source seam for the view. The default `spawn_load` delivers the
/// records through the event channel so a runtime may load off-thread.
pub trait RosterRuntime {
    fn source_label(&self) -> String;
    fn load_records(&mut self) -> Result<Vec<Record>>;
    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.load_records() {
            Ok(records) => InternalEvent::RecordsLoaded(records),
            Err(error) => InternalEvent::LoadFailed(format!("{error:#}")),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("roster event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    pub title: String,
    pub initial_query: String,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            title: "friends".to_owned(),
            initial_query: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Focus {
    #[default]
    Categories,
    Query,
    Table,
}

impl Focus {
    const ALL: [Self; 3] = [Self::Categories, Self::Query, Self::Table];

    fn rotate(self, delta: isize) -> Self {
        let current = Self::ALL
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(current + delta).rem_euclid(len) as usize]
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Categories => "CATEGORIES",
            Self::Query => "QUERY",
            Self::Table => "TABLE",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    focus: Focus,
    category_cursor: usize,
    table_offset: usize,
    help_visible: bool,
    loading: bool,
    pending_query: Option<String>,
    source_label: String,
    status_token: u64,
}

pub fn run_app<R: RosterRuntime>(
    state: &mut RosterState,
    runtime: &mut R,
    options: &UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        pending_query: Some(options.initial_query.clone()).filter(|query| !query.is_empty()),
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();
    request_load(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data, options)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_input(event::poll, event::read) {
            Ok(Some(Event::Key(key))) => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Waits briefly for one terminal event. Errors are returned rather than
/// propagated so the caller can still restore the terminal.
fn next_input<P, R>(poll: P, read: R) -> Result<Option<Event>>
where
    P: FnOnce(Duration) -> io::Result<bool>,
    R: FnOnce() -> io::Result<Event>,
{
    if !poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    read().context("read event").map(Some)
}

fn request_load<R: RosterRuntime>(
    state: &mut RosterState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    view_data.loading = true;
    view_data.source_label = runtime.source_label();
    tracing::info!(source = %view_data.source_label, "loading roster");
    if let Err(error) = runtime.spawn_load(internal_tx.clone()) {
        view_data.loading = false;
        emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
    }
}

fn process_internal_events(
    state: &mut RosterState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                let _ = state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::RecordsLoaded(records) => {
                handle_records_loaded(state, view_data, tx, records);
            }
            InternalEvent::LoadFailed(error) => {
                view_data.loading = false;
                tracing::error!(%error, "roster load failed");
                emit_status(
                    state,
                    view_data,
                    tx,
                    format!("load failed: {error}; check [data].path or pass --builtin"),
                );
            }
        }
    }
}

fn handle_records_loaded(
    state: &mut RosterState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    records: Vec<Record>,
) {
    view_data.loading = false;
    let mut message = String::new();
    if let Ok(events) = state.dispatch(AppCommand::Load(records)) {
        for event in events {
            match event {
                AppEvent::Loaded { records, .. } => {
                    message = format!("loaded {records} from {}", view_data.source_label);
                }
                AppEvent::SelectionReconciled { dropped } => {
                    message = format!("{message}; dropped {}", dropped.join(", "));
                }
                _ => {}
            }
        }
    }

    if let Some(query) = view_data.pending_query.take() {
        let _ = state.dispatch(AppCommand::SetNameQuery(query));
    }
    clamp_cursors(state, view_data);
    emit_status(state, view_data, tx, message);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut RosterState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    let _ = state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_or_report(
    state: &mut RosterState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    match state.dispatch(command) {
        Ok(_) => clamp_cursors(state, view_data),
        Err(StateError::NotLoaded) if view_data.loading => {
            emit_status(state, view_data, internal_tx, "still loading");
        }
        Err(error) => emit_status(state, view_data, internal_tx, error.to_string()),
    }
}

fn clamp_cursors(state: &RosterState, view_data: &mut ViewData) {
    let categories = state.categories().len();
    view_data.category_cursor = view_data
        .category_cursor
        .min(categories.saturating_sub(1));
    let visible = state.visible().len();
    view_data.table_offset = view_data.table_offset.min(visible.saturating_sub(1));
}

fn handle_key_event<R: RosterRuntime>(
    state: &mut RosterState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match key.code {
        KeyCode::Tab => {
            view_data.focus = view_data.focus.rotate(1);
            return false;
        }
        KeyCode::BackTab => {
            view_data.focus = view_data.focus.rotate(-1);
            return false;
        }
        _ => {}
    }

    if view_data.focus == Focus::Query {
        handle_query_key(state, view_data, internal_tx, key);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('/'), KeyModifiers::NONE) => view_data.focus = Focus::Query,
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            dispatch_or_report(state, view_data, internal_tx, AppCommand::ClearFilters);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            request_load(state, runtime, view_data, internal_tx);
        }
        _ => match view_data.focus {
            Focus::Categories => handle_categories_key(state, view_data, internal_tx, key),
            Focus::Table => handle_table_key(state, view_data, key),
            Focus::Query => {}
        },
    }
    false
}

fn handle_query_key(
    state: &mut RosterState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let mut query = state.filter().name_query.clone();
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.focus = Focus::Categories;
            return;
        }
        (KeyCode::Enter, _) => {
            view_data.focus = Focus::Table;
            return;
        }
        (KeyCode::Backspace, _) => {
            query.pop();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            query.clear();
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            query.push(ch);
        }
        _ => return,
    }
    dispatch_or_report(state, view_data, internal_tx, AppCommand::SetNameQuery(query));
}

fn handle_categories_key(
    state: &mut RosterState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.category_cursor = view_data.category_cursor.saturating_add(1);
            clamp_cursors(state, view_data);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.category_cursor = view_data.category_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let Some(category) = state
                .categories()
                .get(view_data.category_cursor)
                .map(str::to_owned)
            else {
                return;
            };
            let checked = !state.filter().is_checked(&category);
            dispatch_or_report(
                state,
                view_data,
                internal_tx,
                AppCommand::ToggleCategory { category, checked },
            );
        }
        _ => {}
    }
}

fn handle_table_key(state: &RosterState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.table_offset = view_data.table_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.table_offset = view_data.table_offset.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => view_data.table_offset = 0,
        KeyCode::Char('G') | KeyCode::End => view_data.table_offset = usize::MAX,
        _ => return,
    }
    clamp_cursors(state, view_data);
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &RosterState,
    view_data: &ViewData,
    options: &UiOptions,
) {
    let snapshot = state.snapshot();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let query = Paragraph::new(query_line(&snapshot, view_data.focus == Focus::Query)).block(
        Block::default()
            .title(options.title.as_str())
            .borders(Borders::ALL)
            .border_style(focus_style(view_data.focus == Focus::Query)),
    );
    frame.render_widget(query, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(layout[1]);

    let categories = Paragraph::new(
        category_lines(
            &snapshot,
            view_data.category_cursor,
            view_data.focus == Focus::Categories,
        )
        .join("\n"),
    )
    .block(
        Block::default()
            .title("categories")
            .borders(Borders::ALL)
            .border_style(focus_style(view_data.focus == Focus::Categories)),
    );
    frame.render_widget(categories, body[0]);

    render_table(frame, body[1], &snapshot, view_data, options);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    snapshot: &RosterSnapshot<'_>,
    view_data: &ViewData,
    options: &UiOptions,
) {
    let header = Row::new(["name", "category"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = table_rows(snapshot, view_data.table_offset)
        .into_iter()
        .map(|[name, category]| Row::new([Cell::from(name), Cell::from(category)]));

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Min(12)])
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .title(table_title(&options.title, snapshot, view_data.loading))
                .borders(Borders::ALL)
                .border_style(focus_style(view_data.focus == Focus::Table)),
        );
    frame.render_widget(table, area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn query_line(snapshot: &RosterSnapshot<'_>, focused: bool) -> String {
    let cursor = if focused { "_" } else { "" };
    format!("name: {}{cursor}", snapshot.filter.name_query)
}

fn category_lines(snapshot: &RosterSnapshot<'_>, cursor: usize, focused: bool) -> Vec<String> {
    snapshot
        .categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let pointer = if focused && index == cursor { ">" } else { " " };
            let mark = if snapshot.is_checked(category) {
                "x"
            } else {
                " "
            };
            format!("{pointer} [{mark}] {category}")
        })
        .collect()
}

fn table_rows(snapshot: &RosterSnapshot<'_>, offset: usize) -> Vec<[String; 2]> {
    snapshot
        .visible
        .iter()
        .skip(offset)
        .map(|record| [record.name.clone(), record.category.clone()])
        .collect()
}

fn table_title(title: &str, snapshot: &RosterSnapshot<'_>, loading: bool) -> String {
    if loading && !snapshot.is_loaded() {
        return format!("{title} loading...");
    }
    format!("{title} {}/{}", snapshot.visible.len(), snapshot.total)
}

fn status_text(state: &RosterState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let focus = view_data.focus.label();
    let hints = match view_data.focus {
        Focus::Query => "type to filter | backspace ctrl+u | enter table | esc categories",
        Focus::Categories => "j/k move | space toggle | / name | c clear | r reload | ? help | q",
        Focus::Table => "j/k scroll | g/G | / name | c clear | r reload | ? help | q",
    };
    match &state.status_line {
        Some(status) => format!("{focus} | {status} | {hints}"),
        None => format!("{focus} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | tab/shift+tab focus\n\
categories: j/k move | space/enter toggle\n\
name: type filter | backspace delete | ctrl+u clear | enter table | esc back\n\
table: j/k scroll | g/G top/bottom\n\
other: / name | c clear filters | r reload roster | ? help | q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
