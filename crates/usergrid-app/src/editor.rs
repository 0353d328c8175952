// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Inline cell editors.
//!
//! An editor is opened with the cell's raw value and two continuations.
//! Exactly one of them fires, at most once, when the editor resolves;
//! afterwards the handle ignores further signals. Dropping an unresolved
//! handle releases both continuations without calling either.

use crate::{InputType, UpdateKey, format_calendar_date, parse_calendar_date};

pub type CommitFn = Box<dyn FnOnce(String)>;
pub type CancelFn = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Plain(InputType),
    Date,
    /// Filter input in a column header; forwards the raw date string.
    HeaderDate,
}

impl EditorKind {
    pub const fn for_key(key: UpdateKey) -> Self {
        match key.input_type() {
            InputType::Date => Self::Date,
            other => Self::Plain(other),
        }
    }

    pub const fn header_for_key(key: UpdateKey) -> Self {
        match key.input_type() {
            InputType::Date => Self::HeaderDate,
            _ => Self::Plain(InputType::Text),
        }
    }

    pub const fn input_type(self) -> InputType {
        match self {
            Self::Plain(input_type) => input_type,
            Self::Date | Self::HeaderDate => InputType::Date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorSignal {
    /// Control contents replaced; does not commit.
    Input(String),
    /// Value-change notification from the control.
    Change,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Open,
    Committed,
    Cancelled,
}

pub struct EditorHandle {
    kind: EditorKind,
    original: String,
    initial: String,
    input: String,
    status: EditorStatus,
    on_commit: Option<CommitFn>,
    on_cancel: Option<CancelFn>,
}

impl std::fmt::Debug for EditorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorHandle")
            .field("kind", &self.kind)
            .field("original", &self.original)
            .field("input", &self.input)
            .field("status", &self.status)
            .finish()
    }
}

pub fn open_editor(
    kind: EditorKind,
    raw_value: &str,
    on_commit: impl FnOnce(String) + 'static,
    on_cancel: impl FnOnce() + 'static,
) -> EditorHandle {
    let initial = match kind {
        EditorKind::Date => parse_calendar_date(raw_value)
            .map(format_calendar_date)
            .unwrap_or_default(),
        EditorKind::Plain(_) | EditorKind::HeaderDate => raw_value.to_owned(),
    };

    EditorHandle {
        kind,
        original: raw_value.to_owned(),
        input: initial.clone(),
        initial,
        status: EditorStatus::Open,
        on_commit: Some(Box::new(on_commit)),
        on_cancel: Some(Box::new(on_cancel)),
    }
}

impl EditorHandle {
    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == EditorStatus::Open
    }

    pub fn push_char(&mut self, value: char) -> EditorStatus {
        let mut next = self.input.clone();
        next.push(value);
        self.signal(EditorSignal::Input(next))
    }

    pub fn backspace(&mut self) -> EditorStatus {
        let mut next = self.input.clone();
        next.pop();
        self.signal(EditorSignal::Input(next))
    }

    pub fn signal(&mut self, signal: EditorSignal) -> EditorStatus {
        if self.status != EditorStatus::Open {
            return self.status;
        }

        match signal {
            EditorSignal::Input(value) => {
                self.input = value;
                EditorStatus::Open
            }
            EditorSignal::Change | EditorSignal::Enter => match self.committed_value() {
                Some(value) => self.commit(value),
                None => self.cancel(),
            },
            EditorSignal::Escape => self.cancel(),
        }
    }

    fn committed_value(&self) -> Option<String> {
        match self.kind {
            EditorKind::Plain(_) => Some(self.input.clone()),
            EditorKind::Date if self.input == self.initial => Some(self.original.clone()),
            EditorKind::Date => parse_calendar_date(&self.input).map(format_calendar_date),
            EditorKind::HeaderDate => Some(self.input.clone()),
        }
    }

    fn commit(&mut self, value: String) -> EditorStatus {
        self.status = EditorStatus::Committed;
        self.on_cancel = None;
        if let Some(on_commit) = self.on_commit.take() {
            on_commit(value);
        }
        self.status
    }

    fn cancel(&mut self) -> EditorStatus {
        self.status = EditorStatus::Cancelled;
        self.on_commit = None;
        self.input = self.initial.clone();
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
        self.status
    }
}
