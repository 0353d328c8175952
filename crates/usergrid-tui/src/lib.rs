// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use usergrid_app::{
    ControllerState, EditError, EditorHandle, EditorKind, EditorSignal, EditorStatus, FilterSpec,
    GENERIC_FAILURE_MESSAGE, Gender, GridCommand, GridController, GridEvent, LoadState,
    PageRequest, PageResponse, RecordId, SortDirection, SubmitOutcome, UpdateBatch, UpdateKey,
    UserRecord, open_editor, parse_cell_value,
};

const EMPTY_PLACEHOLDER: &str = "No Data Set";
const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const FILTER_MARK: &str = "*";
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Everything the grid needs from the outside world.
pub trait GridRuntime {
    fn fetch_page(&mut self, request: &PageRequest) -> Result<PageResponse>;
    fn submit_updates(&mut self, batch: &UpdateBatch) -> SubmitOutcome;

    fn spawn_fetch(
        &mut self,
        token: u64,
        request: &PageRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .fetch_page(request)
            .map_err(|error| error.to_string());
        tx.send(InternalEvent::PageFetched { token, result })
            .map_err(|_| anyhow!("grid event channel closed"))?;
        Ok(())
    }

    fn spawn_submit(&mut self, batch: &UpdateBatch, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self.submit_updates(batch);
        tx.send(InternalEvent::SubmitFinished(outcome))
            .map_err(|_| anyhow!("grid event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    PageFetched {
        token: u64,
        result: std::result::Result<PageResponse, String>,
    },
    SubmitFinished(SubmitOutcome),
    EditorCommitted {
        id: RecordId,
        key: UpdateKey,
        raw: String,
    },
    FilterCommitted {
        field: String,
        raw: String,
    },
    EditorCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridColumn {
    Id,
    Field(UpdateKey),
}

const COLUMNS: [GridColumn; 8] = [
    GridColumn::Id,
    GridColumn::Field(UpdateKey::Name),
    GridColumn::Field(UpdateKey::Email),
    GridColumn::Field(UpdateKey::PhoneNumber),
    GridColumn::Field(UpdateKey::Location),
    GridColumn::Field(UpdateKey::Gender),
    GridColumn::Field(UpdateKey::Favourite),
    GridColumn::Field(UpdateKey::Dob),
];

impl GridColumn {
    const fn field_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Field(key) => key.as_str(),
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Field(key) => key.label(),
        }
    }

    fn display(self, record: &UserRecord) -> String {
        match self {
            Self::Id => record.id.to_string(),
            Self::Field(key) => record.display(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorTarget {
    Cell { id: RecordId, key: UpdateKey },
    Filter { field: String },
}

#[derive(Debug)]
struct ActiveEditor {
    target: EditorTarget,
    handle: EditorHandle,
}

#[derive(Debug, Default)]
struct ViewData {
    cursor_row: usize,
    cursor_col: usize,
    editor: Option<ActiveEditor>,
    status_token: u64,
    fetch_token: u64,
}

pub fn run_grid<R: GridRuntime>(controller: &mut GridController, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    start_grid(controller, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(
            controller,
            runtime,
            &mut view_data,
            &internal_tx,
            &internal_rx,
        );

        if let Err(error) = terminal.draw(|frame| render(frame, controller, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(controller, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_grid<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let events = controller.dispatch(GridCommand::Reload);
    apply_events(controller, runtime, view_data, tx, events);
}

fn process_internal_events<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        let events = match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                controller.dispatch(GridCommand::ClearStatus)
            }
            InternalEvent::ClearStatus { .. } => Vec::new(),
            InternalEvent::PageFetched { token, .. } if token != view_data.fetch_token => {
                debug!(token, current = view_data.fetch_token, "dropping stale page");
                Vec::new()
            }
            InternalEvent::PageFetched { result, .. } => match result {
                Ok(page) => controller.dispatch(GridCommand::PageLoaded(page)),
                Err(error) => controller.dispatch(GridCommand::PageLoadFailed(error)),
            },
            InternalEvent::SubmitFinished(outcome) => {
                controller.dispatch(GridCommand::SubmitCompleted(outcome))
            }
            InternalEvent::EditorCommitted { id, key, raw } => match parse_cell_value(key, &raw) {
                Ok(value) => controller.dispatch(GridCommand::EditCell { id, key, value }),
                Err(error) => vec![GridEvent::EditRejected(error)],
            },
            InternalEvent::FilterCommitted { field, raw } => {
                controller.dispatch(GridCommand::SetFilter(FilterSpec::new(field, raw.trim())))
            }
            InternalEvent::EditorCancelled => Vec::new(),
        };
        apply_events(controller, runtime, view_data, tx, events);
    }
}

fn apply_events<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<GridEvent>,
) {
    for event in events {
        match event {
            GridEvent::FetchRequested(request) => {
                view_data.fetch_token = view_data.fetch_token.saturating_add(1);
                if let Err(error) = runtime.spawn_fetch(view_data.fetch_token, &request, tx.clone())
                {
                    warn!(%error, "start page fetch");
                    let failed = controller.dispatch(GridCommand::PageLoadFailed(error.to_string()));
                    apply_events(controller, runtime, view_data, tx, failed);
                }
            }
            GridEvent::SubmitRequested(batch) => {
                if let Err(error) = runtime.spawn_submit(&batch, tx.clone()) {
                    warn!(%error, "start update submit");
                    let failed = controller.dispatch(GridCommand::SubmitCompleted(
                        SubmitOutcome::Failure(GENERIC_FAILURE_MESSAGE.to_owned()),
                    ));
                    apply_events(controller, runtime, view_data, tx, failed);
                }
            }
            GridEvent::PageReplaced { count } => {
                view_data.cursor_row = view_data.cursor_row.min(count.saturating_sub(1));
            }
            GridEvent::LoadFailed(reason) => {
                emit_status(controller, view_data, tx, format!("load failed: {reason}"));
            }
            GridEvent::EditRejected(error) => {
                emit_status(controller, view_data, tx, error.to_string());
            }
            GridEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(tx, view_data.status_token);
            }
            GridEvent::SubmitSucceeded { .. }
            | GridEvent::SubmitFailed(_)
            | GridEvent::SelectionChanged(_)
            | GridEvent::RecordEdited(_)
            | GridEvent::CellInvalid { .. }
            | GridEvent::SubmitAffordanceUpdated(_)
            | GridEvent::ConfirmationOpened
            | GridEvent::ConfirmationClosed
            | GridEvent::StatusCleared => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    controller: &mut GridController,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    controller.dispatch(GridCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_and_apply<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: GridCommand,
) {
    let events = controller.dispatch(command);
    apply_events(controller, runtime, view_data, tx, events);
}

fn handle_key_event<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if controller.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            controller.dispatch(GridCommand::DismissNotice);
        }
        return false;
    }

    if controller.prompt().is_open() {
        let command = match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(GridCommand::Confirm),
            KeyCode::Char('n') | KeyCode::Esc => Some(GridCommand::Dismiss),
            _ => None,
        };
        if let Some(command) = command {
            dispatch_and_apply(controller, runtime, view_data, internal_tx, command);
        }
        return false;
    }

    if view_data.editor.is_some() {
        handle_editor_key(view_data, key);
        return false;
    }

    let row_count = controller.grid().records().len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Down | KeyCode::Char('j') => {
            if view_data.cursor_row + 1 < row_count {
                view_data.cursor_row += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.cursor_row = view_data.cursor_row.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if view_data.cursor_col + 1 < COLUMNS.len() {
                view_data.cursor_col += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_data.cursor_col = view_data.cursor_col.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            if let Some(id) = current_record(controller, view_data).map(|record| record.id) {
                dispatch_and_apply(
                    controller,
                    runtime,
                    view_data,
                    internal_tx,
                    GridCommand::ToggleSelect(id),
                );
            }
        }
        KeyCode::Char('a') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::SelectAll,
        ),
        KeyCode::Char('A') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::DeselectAll,
        ),
        KeyCode::Char('e') | KeyCode::Enter => {
            handle_edit_request(controller, runtime, view_data, internal_tx);
        }
        KeyCode::Char('s') => {
            let field = current_column(view_data).field_name().to_owned();
            dispatch_and_apply(
                controller,
                runtime,
                view_data,
                internal_tx,
                GridCommand::CycleSort(field),
            );
        }
        KeyCode::Char('/') => open_filter_editor(controller, view_data, internal_tx),
        KeyCode::Char('c') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::ClearFilters,
        ),
        KeyCode::Char('n') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::NextPage,
        ),
        KeyCode::Char('p') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::PrevPage,
        ),
        KeyCode::Char('u') => {
            if controller.invalid_selected_cells() > 0 {
                dispatch_and_apply(
                    controller,
                    runtime,
                    view_data,
                    internal_tx,
                    GridCommand::SubmitClicked,
                );
            } else if !controller.submit_affordance().is_enabled() {
                emit_status(
                    controller,
                    view_data,
                    internal_tx,
                    "nothing to submit; select and edit rows first",
                );
            } else if controller.state() == ControllerState::Submitting {
                emit_status(controller, view_data, internal_tx, "submit in progress");
            } else {
                dispatch_and_apply(
                    controller,
                    runtime,
                    view_data,
                    internal_tx,
                    GridCommand::SubmitClicked,
                );
            }
        }
        KeyCode::Char('r') => dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::Reload,
        ),
        KeyCode::Esc => {
            controller.dispatch(GridCommand::ClearStatus);
        }
        _ => {}
    }
    false
}

fn handle_editor_key(view_data: &mut ViewData, key: KeyEvent) {
    let Some(editor) = view_data.editor.as_mut() else {
        return;
    };
    let status = match key.code {
        KeyCode::Char(value) => editor.handle.push_char(value),
        KeyCode::Backspace => editor.handle.backspace(),
        KeyCode::Enter => editor.handle.signal(EditorSignal::Enter),
        KeyCode::Tab => editor.handle.signal(EditorSignal::Change),
        KeyCode::Esc => editor.handle.signal(EditorSignal::Escape),
        _ => editor.handle.status(),
    };
    if status != EditorStatus::Open {
        view_data.editor = None;
    }
}

fn handle_edit_request<R: GridRuntime>(
    controller: &mut GridController,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(record) = current_record(controller, view_data).cloned() else {
        emit_status(controller, view_data, internal_tx, "no row to edit");
        return;
    };
    let GridColumn::Field(key) = current_column(view_data) else {
        emit_status(controller, view_data, internal_tx, "id is read-only");
        return;
    };
    if !controller.can_edit(record.id) {
        let error = EditError::NotSelected(record.id);
        emit_status(controller, view_data, internal_tx, error.to_string());
        return;
    }

    if key == UpdateKey::Gender {
        let value = usergrid_app::CellValue::Gender(Gender::cycle(record.gender));
        dispatch_and_apply(
            controller,
            runtime,
            view_data,
            internal_tx,
            GridCommand::EditCell {
                id: record.id,
                key,
                value,
            },
        );
        return;
    }

    let id = record.id;
    let commit_tx = internal_tx.clone();
    let cancel_tx = internal_tx.clone();
    let handle = open_editor(
        EditorKind::for_key(key),
        &record.field(key).raw(),
        move |raw| {
            let _ = commit_tx.send(InternalEvent::EditorCommitted { id, key, raw });
        },
        move || {
            let _ = cancel_tx.send(InternalEvent::EditorCancelled);
        },
    );
    view_data.editor = Some(ActiveEditor {
        target: EditorTarget::Cell { id, key },
        handle,
    });
}

fn open_filter_editor(
    controller: &GridController,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let column = current_column(view_data);
    let kind = match column {
        GridColumn::Id => EditorKind::Plain(usergrid_app::InputType::Text),
        GridColumn::Field(key) => EditorKind::header_for_key(key),
    };
    let field = column.field_name().to_owned();
    let current = controller
        .grid()
        .filter_for(&field)
        .unwrap_or_default()
        .to_owned();

    let commit_tx = internal_tx.clone();
    let cancel_tx = internal_tx.clone();
    let commit_field = field.clone();
    let handle = open_editor(
        kind,
        &current,
        move |raw| {
            let _ = commit_tx.send(InternalEvent::FilterCommitted {
                field: commit_field,
                raw,
            });
        },
        move || {
            let _ = cancel_tx.send(InternalEvent::EditorCancelled);
        },
    );
    view_data.editor = Some(ActiveEditor {
        target: EditorTarget::Filter { field },
        handle,
    });
}

fn current_record<'a>(controller: &'a GridController, view_data: &ViewData) -> Option<&'a UserRecord> {
    controller.grid().records().get(view_data.cursor_row)
}

fn current_column(view_data: &ViewData) -> GridColumn {
    COLUMNS
        .get(view_data.cursor_col)
        .copied()
        .unwrap_or(GridColumn::Id)
}

fn render(frame: &mut ratatui::Frame<'_>, controller: &GridController, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(controller))
        .block(Block::default().title("usergrid").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], controller, view_data);

    let status = Paragraph::new(status_text(controller, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(editor) = &view_data.editor {
        render_overlay(
            frame,
            &editor_title(&editor.target),
            render_editor_overlay_text(editor),
            Style::default(),
        );
    }

    if controller.prompt().is_open() {
        render_overlay(
            frame,
            "confirm",
            confirmation_text(controller),
            Style::default().fg(Color::Cyan),
        );
    }

    if let Some(notice) = controller.notice() {
        render_overlay(
            frame,
            "notice",
            format!("{notice}\n\nenter to dismiss"),
            Style::default(),
        );
    }
}

fn render_overlay(frame: &mut ratatui::Frame<'_>, title: &str, text: String, style: Style) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let overlay = Paragraph::new(text).block(
        Block::default()
            .title(title.to_owned())
            .borders(Borders::ALL)
            .style(style),
    );
    frame.render_widget(overlay, area);
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &GridController,
    view_data: &ViewData,
) {
    if let Some(placeholder) = placeholder_text(controller) {
        let empty = Paragraph::new(placeholder)
            .block(Block::default().borders(Borders::ALL).title("users"));
        frame.render_widget(empty, area);
        return;
    }

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(COLUMNS.iter().map(|_| Constraint::Min(8)));

    let mut header_cells = vec![Cell::from("sel")];
    header_cells.extend(COLUMNS.iter().map(|column| {
        Cell::from(header_label(controller, *column)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let header = Row::new(header_cells);

    let grid = controller.grid();
    let rows = grid.records().iter().enumerate().map(|(row_index, record)| {
        let cursor_row = row_index == view_data.cursor_row;
        let mut cells = vec![Cell::from(selection_mark(
            grid.is_record_selected(record.id),
            record.is_modified,
        ))];
        cells.extend(COLUMNS.iter().enumerate().map(|(column_index, column)| {
            let mut style = Style::default();
            if record.is_modified {
                style = style.fg(Color::Yellow);
            }
            if cursor_row {
                style = style.bg(Color::DarkGray);
            }
            if cursor_row && column_index == view_data.cursor_col {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }
            if let GridColumn::Field(key) = column
                && grid.is_cell_invalid(record.id, *key)
            {
                style = style.bg(Color::Red).add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(column.display(record)).style(style)
        }));
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(controller))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn placeholder_text(controller: &GridController) -> Option<String> {
    let grid = controller.grid();
    match grid.load_state() {
        LoadState::Failed(reason) => Some(format!("load failed: {reason}")),
        LoadState::Loading if grid.records().is_empty() => Some("loading...".to_owned()),
        _ if grid.records().is_empty() => Some(EMPTY_PLACEHOLDER.to_owned()),
        _ => None,
    }
}

fn selection_mark(selected: bool, modified: bool) -> String {
    let mark = if selected { "[x]" } else { "[ ]" };
    if modified {
        format!("{mark}*")
    } else {
        mark.to_owned()
    }
}

fn header_label(controller: &GridController, column: GridColumn) -> String {
    let grid = controller.grid();
    let mut label = column.title().to_owned();
    match grid.sort_for(column.field_name()) {
        Some(SortDirection::Asc) => {
            label.push(' ');
            label.push_str(SORT_MARK_ASC);
        }
        Some(SortDirection::Desc) => {
            label.push(' ');
            label.push_str(SORT_MARK_DESC);
        }
        None => {}
    }
    if grid.filter_for(column.field_name()).is_some() {
        label.push_str(FILTER_MARK);
    }
    label
}

fn table_title(controller: &GridController) -> String {
    let grid = controller.grid();
    format!(
        "users | page {}/{} | {} rows",
        grid.page(),
        grid.last_page(),
        grid.records().len()
    )
}

fn header_text(controller: &GridController) -> String {
    let grid = controller.grid();
    let submit = match (
        controller.state(),
        controller.submit_affordance().is_enabled(),
    ) {
        (ControllerState::Submitting, _) => "submitting...",
        (_, true) => "submit: u",
        (_, false) => "submit: off",
    };
    let mut parts = vec![
        format!("selected {}", grid.selection_len()),
        submit.to_owned(),
    ];
    let filters = grid
        .request()
        .filters
        .iter()
        .map(|filter| format!("{}={}", filter.field, filter.value))
        .collect::<Vec<_>>();
    if !filters.is_empty() {
        parts.push(format!("filter {}", filters.join(" ")));
    }
    parts.join(" | ")
}

fn status_text(controller: &GridController, view_data: &ViewData) -> String {
    let default = if view_data.editor.is_some() {
        "enter commit | tab commit | esc cancel"
    } else {
        "j/k/h/l | space sel | a/A all | e edit | s sort | / filter | c clear | n/p page | u submit | r reload | q"
    };
    match controller.status_line() {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn editor_title(target: &EditorTarget) -> String {
    match target {
        EditorTarget::Cell { id, key } => format!("edit {} (row {id})", key.label()),
        EditorTarget::Filter { field } => format!("filter {field}"),
    }
}

fn render_editor_overlay_text(editor: &ActiveEditor) -> String {
    let hint = match editor.handle.kind() {
        EditorKind::Date => "YYYY-MM-DD",
        EditorKind::HeaderDate => "date prefix",
        EditorKind::Plain(input_type) => input_type.as_str(),
    };
    format!("{}_\n\n{hint}", editor.handle.input())
}

fn confirmation_text(controller: &GridController) -> String {
    let count = controller
        .grid()
        .selected_records()
        .filter(|record| record.is_modified)
        .count();
    let noun = if count == 1 { "record" } else { "records" };
    format!("Submit {count} modified {noun}?\n\ny confirm | n cancel")
}

/// Middle band of `area`, `percent_x` wide and `percent_y` tall.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let band = |percent: u16| {
        let margin = (100 - percent) / 2;
        [
            Constraint::Percentage(margin),
            Constraint::Percentage(percent),
            Constraint::Percentage(margin),
        ]
    };
    let rows = Layout::vertical(band(percent_y)).split(area);
    Layout::horizontal(band(percent_x)).split(rows[1])[1]
}
