// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::dirty::{apply_edit, clear_modified, is_eligible_for_submit, modified_records};
use crate::{
    CellValue, EditError, FilterSpec, PageRequest, PageResponse, RecordId, SortDirection,
    SortSpec, SubmitOutcome, UPDATE_SUCCESS_MESSAGE, UpdateBatch, UpdateKey, UserRecord,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Records of the current page plus the operator's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGrid {
    records: Vec<UserRecord>,
    selected: BTreeSet<RecordId>,
    /// Cells holding a value that fails the required rule. The value is
    /// kept; the cell is only flagged.
    invalid: BTreeSet<(RecordId, UpdateKey)>,
    request: PageRequest,
    last_page: u32,
    load_state: LoadState,
}

impl RecordGrid {
    pub fn new(per_page: u32) -> Self {
        Self {
            records: Vec::new(),
            selected: BTreeSet::new(),
            invalid: BTreeSet::new(),
            request: PageRequest::first(per_page),
            last_page: 1,
            load_state: LoadState::Loading,
        }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn page(&self) -> u32 {
        self.request.page
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_record_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_records(&self) -> impl Iterator<Item = &UserRecord> {
        self.records
            .iter()
            .filter(|record| self.selected.contains(&record.id))
    }

    pub fn is_cell_invalid(&self, id: RecordId, key: UpdateKey) -> bool {
        self.invalid.contains(&(id, key))
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn has_active_filters(&self) -> bool {
        self.request.has_filters()
    }

    pub fn sort_for(&self, field: &str) -> Option<SortDirection> {
        self.request
            .sorts
            .iter()
            .find(|sort| sort.field == field)
            .map(|sort| sort.direction)
    }

    pub fn filter_for(&self, field: &str) -> Option<&str> {
        self.request
            .filters
            .iter()
            .find(|filter| filter.field == field)
            .map(|filter| filter.value.as_str())
    }

    fn replace_page(&mut self, page: PageResponse) {
        self.records = page.data;
        self.selected.clear();
        self.invalid.clear();
        self.last_page = page.last_page.unwrap_or(self.request.page).max(1);
        self.load_state = LoadState::Ready;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitAffordance {
    enabled: bool,
}

impl SubmitAffordance {
    pub fn is_enabled(self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfirmationPrompt {
    open: bool,
}

impl ConfirmationPrompt {
    pub fn is_open(self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingConfirmation,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    PageLoaded(PageResponse),
    PageLoadFailed(String),
    ToggleSelect(RecordId),
    SelectAll,
    DeselectAll,
    EditCell {
        id: RecordId,
        key: UpdateKey,
        value: CellValue,
    },
    SubmitClicked,
    Confirm,
    Dismiss,
    SubmitCompleted(SubmitOutcome),
    GoToPage(u32),
    NextPage,
    PrevPage,
    CycleSort(String),
    SetFilter(FilterSpec),
    ClearFilter(String),
    ClearFilters,
    Reload,
    DismissNotice,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    FetchRequested(PageRequest),
    PageReplaced { count: usize },
    LoadFailed(String),
    SelectionChanged(usize),
    RecordEdited(RecordId),
    CellInvalid { id: RecordId, key: UpdateKey },
    EditRejected(EditError),
    SubmitAffordanceUpdated(bool),
    ConfirmationOpened,
    ConfirmationClosed,
    SubmitRequested(UpdateBatch),
    SubmitSucceeded { cleared: Vec<RecordId> },
    SubmitFailed(String),
    StatusUpdated(String),
    StatusCleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridController {
    grid: RecordGrid,
    submit: SubmitAffordance,
    prompt: ConfirmationPrompt,
    state: ControllerState,
    in_flight: Option<UpdateBatch>,
    notice: Option<String>,
    status_line: Option<String>,
}

impl GridController {
    pub fn new(per_page: u32) -> Self {
        Self {
            grid: RecordGrid::new(per_page),
            submit: SubmitAffordance::default(),
            prompt: ConfirmationPrompt::default(),
            state: ControllerState::Idle,
            in_flight: None,
            notice: None,
            status_line: None,
        }
    }

    pub fn grid(&self) -> &RecordGrid {
        &self.grid
    }

    pub fn submit_affordance(&self) -> SubmitAffordance {
        self.submit
    }

    pub fn prompt(&self) -> ConfirmationPrompt {
        self.prompt
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn in_flight(&self) -> Option<&UpdateBatch> {
        self.in_flight.as_ref()
    }

    /// Blocking message for the operator (submit result).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    /// Edit gate; consulted on every edit attempt.
    pub fn can_edit(&self, id: RecordId) -> bool {
        self.grid.is_record_selected(id)
    }

    /// Flagged cells on selected rows. Any of them blocks a submit.
    pub fn invalid_selected_cells(&self) -> usize {
        self.grid
            .invalid
            .iter()
            .filter(|(id, _)| self.grid.selected.contains(id))
            .count()
    }

    pub fn is_submit_eligible(&self) -> bool {
        is_eligible_for_submit(self.grid.selected_records()) && self.invalid_selected_cells() == 0
    }

    pub fn dispatch(&mut self, command: GridCommand) -> Vec<GridEvent> {
        match command {
            GridCommand::PageLoaded(page) => {
                let count = page.data.len();
                self.grid.replace_page(page);
                debug!(count, page = self.grid.page(), "page loaded");
                vec![
                    GridEvent::PageReplaced { count },
                    GridEvent::SelectionChanged(0),
                    self.refresh_affordance(),
                ]
            }
            GridCommand::PageLoadFailed(reason) => {
                warn!(%reason, "page load failed");
                self.grid.records.clear();
                self.grid.selected.clear();
                self.grid.invalid.clear();
                self.grid.load_state = LoadState::Failed(reason.clone());
                vec![GridEvent::LoadFailed(reason), self.refresh_affordance()]
            }
            GridCommand::ToggleSelect(id) => {
                if self.grid.position(id).is_none() {
                    return vec![self.set_status(format!("record {id} is not on this page"))];
                }
                if !self.grid.selected.remove(&id) {
                    self.grid.selected.insert(id);
                }
                self.selection_events()
            }
            GridCommand::SelectAll => {
                self.grid.selected = self.grid.records.iter().map(|record| record.id).collect();
                self.selection_events()
            }
            GridCommand::DeselectAll => {
                self.grid.selected.clear();
                self.selection_events()
            }
            GridCommand::EditCell { id, key, value } => self.edit_cell(id, key, value),
            GridCommand::SubmitClicked => {
                let invalid = self.invalid_selected_cells();
                if self.state == ControllerState::Idle && invalid > 0 {
                    return vec![self.set_status(required_message(invalid))];
                }
                if self.state != ControllerState::Idle || !self.is_submit_eligible() {
                    return Vec::new();
                }
                self.state = ControllerState::AwaitingConfirmation;
                self.prompt.open = true;
                vec![GridEvent::ConfirmationOpened]
            }
            GridCommand::Confirm => self.confirm(),
            GridCommand::Dismiss => {
                if self.state != ControllerState::AwaitingConfirmation {
                    return Vec::new();
                }
                self.state = ControllerState::Idle;
                self.prompt.open = false;
                vec![GridEvent::ConfirmationClosed]
            }
            GridCommand::SubmitCompleted(outcome) => self.complete_submit(outcome),
            GridCommand::GoToPage(page) => self.go_to_page(page),
            GridCommand::NextPage => {
                if self.grid.page() >= self.grid.last_page {
                    return vec![self.set_status("already on last page")];
                }
                self.go_to_page(self.grid.page() + 1)
            }
            GridCommand::PrevPage => {
                if self.grid.page() <= 1 {
                    return vec![self.set_status("already on first page")];
                }
                self.go_to_page(self.grid.page() - 1)
            }
            GridCommand::CycleSort(field) => {
                let next = match self.grid.sort_for(&field) {
                    None => Some(SortDirection::Asc),
                    Some(SortDirection::Asc) => Some(SortDirection::Desc),
                    Some(SortDirection::Desc) => None,
                };
                self.grid.request.sorts = next
                    .map(|direction| vec![SortSpec::new(field.clone(), direction)])
                    .unwrap_or_default();
                let status = match next {
                    Some(direction) => format!("sort {field} {}", direction.as_str()),
                    None => "sort cleared".to_owned(),
                };
                let mut events = self.refetch_from_first_page();
                events.push(self.set_status(status));
                events
            }
            GridCommand::SetFilter(filter) => {
                let filters = &mut self.grid.request.filters;
                filters.retain(|existing| existing.field != filter.field);
                let status = if filter.value.is_empty() {
                    format!("filter {} cleared", filter.field)
                } else {
                    let status = format!("filter {} = {}", filter.field, filter.value);
                    filters.push(filter);
                    status
                };
                let mut events = self.refetch_from_first_page();
                events.push(self.set_status(status));
                events
            }
            GridCommand::ClearFilter(field) => {
                if self.grid.filter_for(&field).is_none() {
                    return vec![self.set_status(format!("no filter on {field}"))];
                }
                self.dispatch(GridCommand::SetFilter(FilterSpec::new(field, "")))
            }
            GridCommand::ClearFilters => {
                if self.grid.request.filters.is_empty() {
                    return vec![self.set_status("no filters active")];
                }
                self.grid.request.filters.clear();
                let mut events = self.refetch_from_first_page();
                events.push(self.set_status("filters cleared"));
                events
            }
            GridCommand::Reload => {
                self.grid.load_state = LoadState::Loading;
                vec![GridEvent::FetchRequested(self.grid.request.clone())]
            }
            GridCommand::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
            GridCommand::SetStatus(message) => vec![self.set_status(message)],
            GridCommand::ClearStatus => {
                self.status_line = None;
                vec![GridEvent::StatusCleared]
            }
        }
    }

    fn edit_cell(&mut self, id: RecordId, key: UpdateKey, value: CellValue) -> Vec<GridEvent> {
        let Some(index) = self.grid.position(id) else {
            return vec![GridEvent::EditRejected(EditError::UnknownRecord(id))];
        };
        if !self.can_edit(id) {
            return vec![GridEvent::EditRejected(EditError::NotSelected(id))];
        }

        if self.grid.records[index].field(key) == value {
            debug!(%id, field = key.as_str(), "edit kept the current value");
            return vec![GridEvent::RecordEdited(id), self.refresh_affordance()];
        }

        let blank = value.is_blank();
        match apply_edit(&self.grid.records, index, key, value) {
            Ok(records) => {
                self.grid.records = records;
                debug!(%id, field = key.as_str(), blank, "record edited");
                let mut events = vec![GridEvent::RecordEdited(id)];
                if blank {
                    self.grid.invalid.insert((id, key));
                    events.push(GridEvent::CellInvalid { id, key });
                    events.push(self.set_status(format!("{} is required", key.label())));
                } else {
                    self.grid.invalid.remove(&(id, key));
                }
                events.push(self.refresh_affordance());
                events
            }
            Err(error) => vec![GridEvent::EditRejected(error)],
        }
    }

    fn confirm(&mut self) -> Vec<GridEvent> {
        if self.state != ControllerState::AwaitingConfirmation {
            return Vec::new();
        }
        self.prompt.open = false;

        let invalid = self.invalid_selected_cells();
        if invalid > 0 {
            self.state = ControllerState::Idle;
            return vec![
                GridEvent::ConfirmationClosed,
                self.set_status(required_message(invalid)),
            ];
        }

        let batch = UpdateBatch {
            records: modified_records(self.grid.selected_records()),
        };
        if batch.is_empty() {
            self.state = ControllerState::Idle;
            return vec![
                GridEvent::ConfirmationClosed,
                self.set_status("nothing to submit"),
            ];
        }

        info!(count = batch.len(), "submitting update batch");
        self.state = ControllerState::Submitting;
        self.in_flight = Some(batch.clone());
        vec![
            GridEvent::ConfirmationClosed,
            GridEvent::SubmitRequested(batch),
        ]
    }

    fn complete_submit(&mut self, outcome: SubmitOutcome) -> Vec<GridEvent> {
        if self.state != ControllerState::Submitting {
            return Vec::new();
        }
        self.state = ControllerState::Idle;
        let batch = self.in_flight.take().unwrap_or(UpdateBatch {
            records: Vec::new(),
        });

        match outcome {
            SubmitOutcome::Success(_) => {
                let cleared = clear_modified(&mut self.grid.records, &batch.records);
                for id in &cleared {
                    self.grid.selected.remove(id);
                }
                info!(
                    sent = batch.len(),
                    cleared = cleared.len(),
                    "update batch accepted"
                );
                self.notice = Some(UPDATE_SUCCESS_MESSAGE.to_owned());

                let mut events = vec![
                    GridEvent::SubmitSucceeded { cleared },
                    GridEvent::SelectionChanged(self.grid.selection_len()),
                    self.refresh_affordance(),
                ];
                if self.grid.has_active_filters() {
                    self.grid.load_state = LoadState::Loading;
                    events.push(GridEvent::FetchRequested(self.grid.request.clone()));
                }
                events
            }
            SubmitOutcome::Failure(reason) => {
                warn!(%reason, count = batch.len(), "update batch rejected");
                self.notice = Some(reason.clone());
                vec![GridEvent::SubmitFailed(reason)]
            }
        }
    }

    fn go_to_page(&mut self, page: u32) -> Vec<GridEvent> {
        let page = page.clamp(1, self.grid.last_page.max(1));
        self.grid.request.page = page;
        self.grid.load_state = LoadState::Loading;
        vec![GridEvent::FetchRequested(self.grid.request.clone())]
    }

    fn refetch_from_first_page(&mut self) -> Vec<GridEvent> {
        self.grid.request.page = 1;
        self.grid.load_state = LoadState::Loading;
        vec![GridEvent::FetchRequested(self.grid.request.clone())]
    }

    fn selection_events(&mut self) -> Vec<GridEvent> {
        vec![
            GridEvent::SelectionChanged(self.grid.selection_len()),
            self.refresh_affordance(),
        ]
    }

    fn refresh_affordance(&mut self) -> GridEvent {
        self.submit.enabled = self.is_submit_eligible();
        GridEvent::SubmitAffordanceUpdated(self.submit.enabled)
    }

    fn set_status(&mut self, message: impl Into<String>) -> GridEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        GridEvent::StatusUpdated(message)
    }
}

fn required_message(invalid: usize) -> String {
    let noun = if invalid == 1 { "cell" } else { "cells" };
    format!("fill {invalid} required {noun} before submitting")
}
