// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::ids::*;

pub const PAGE_SIZE: u32 = 200;
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";
pub const UPDATE_SUCCESS_MESSAGE: &str = "Records updated successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    /// Next value in the list editor cycle; `None` is the cleared state.
    pub const fn cycle(value: Option<Self>) -> Option<Self> {
        match value {
            None => Some(Self::Male),
            Some(Self::Male) => Some(Self::Female),
            Some(Self::Female) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Date,
}

impl InputType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Date => "date",
        }
    }
}

/// Record fields the operator may edit, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKey {
    Name,
    Email,
    PhoneNumber,
    Location,
    Gender,
    Favourite,
    Dob,
}

impl UpdateKey {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::PhoneNumber,
        Self::Location,
        Self::Gender,
        Self::Favourite,
        Self::Dob,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::Dob => "dob",
            Self::Location => "location",
            Self::PhoneNumber => "phone_number",
            Self::Gender => "gender",
            Self::Favourite => "favourite",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(Self::Email),
            "name" => Some(Self::Name),
            "dob" => Some(Self::Dob),
            "location" => Some(Self::Location),
            "phone_number" => Some(Self::PhoneNumber),
            "gender" => Some(Self::Gender),
            "favourite" => Some(Self::Favourite),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
            Self::Location => "Location",
            Self::Gender => "Gender",
            Self::Favourite => "Favourite Color",
            Self::Dob => "Date Of Birth",
        }
    }

    pub const fn input_type(self) -> InputType {
        match self {
            Self::Email => InputType::Email,
            Self::Dob => InputType::Date,
            _ => InputType::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub favourite: String,
    #[serde(serialize_with = "serialize_dob", deserialize_with = "deserialize_dob")]
    pub dob: Date,
    #[serde(rename = "isModified", alias = "isUpdated", default)]
    pub is_modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Date(Date),
    Gender(Option<Gender>),
}

impl CellValue {
    /// Raw string form handed to an editor.
    pub fn raw(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Date(date) => format_calendar_date(*date),
            Self::Gender(gender) => gender.map(Gender::as_str).unwrap_or_default().to_owned(),
        }
    }

    /// Fails the `required` rule every editable column carries: empty text
    /// or a cleared gender. Whitespace counts as a value.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::Date(_) => false,
            Self::Gender(gender) => gender.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    IndexOutOfRange { index: usize, len: usize },
    NotSelected(RecordId),
    UnknownRecord(RecordId),
    KindMismatch(UpdateKey),
    InvalidValue { key: UpdateKey, raw: String },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range for {len} records")
            }
            Self::NotSelected(id) => write!(f, "record {id} is not selected; select it to edit"),
            Self::UnknownRecord(id) => write!(f, "record {id} is not on this page"),
            Self::KindMismatch(key) => write!(f, "wrong value kind for {}", key.as_str()),
            Self::InvalidValue { key, raw } => {
                write!(f, "invalid {} value {raw:?}", key.as_str())
            }
        }
    }
}

impl std::error::Error for EditError {}

impl UserRecord {
    pub fn field(&self, key: UpdateKey) -> CellValue {
        match key {
            UpdateKey::Name => CellValue::Text(self.name.clone()),
            UpdateKey::Email => CellValue::Text(self.email.clone()),
            UpdateKey::PhoneNumber => CellValue::Text(self.phone_number.clone()),
            UpdateKey::Location => CellValue::Text(self.location.clone()),
            UpdateKey::Favourite => CellValue::Text(self.favourite.clone()),
            UpdateKey::Gender => CellValue::Gender(self.gender),
            UpdateKey::Dob => CellValue::Date(self.dob),
        }
    }

    pub fn set_field(&mut self, key: UpdateKey, value: CellValue) -> Result<(), EditError> {
        match (key, value) {
            (UpdateKey::Name, CellValue::Text(value)) => self.name = value,
            (UpdateKey::Email, CellValue::Text(value)) => self.email = value,
            (UpdateKey::PhoneNumber, CellValue::Text(value)) => self.phone_number = value,
            (UpdateKey::Location, CellValue::Text(value)) => self.location = value,
            (UpdateKey::Favourite, CellValue::Text(value)) => self.favourite = value,
            (UpdateKey::Gender, CellValue::Gender(value)) => self.gender = value,
            (UpdateKey::Dob, CellValue::Date(value)) => self.dob = value,
            (key, _) => return Err(EditError::KindMismatch(key)),
        }
        Ok(())
    }

    pub fn display(&self, key: UpdateKey) -> String {
        match key {
            UpdateKey::Gender => self.gender.map(Gender::label).unwrap_or_default().to_owned(),
            UpdateKey::Dob => format!(
                "{:02}/{:02}/{:04}",
                self.dob.day(),
                u8::from(self.dob.month()),
                self.dob.year()
            ),
            _ => self.field(key).raw(),
        }
    }
}

/// Converts an editor's committed string into a typed cell value.
pub fn parse_cell_value(key: UpdateKey, raw: &str) -> Result<CellValue, EditError> {
    let invalid = || EditError::InvalidValue {
        key,
        raw: raw.to_owned(),
    };
    match key {
        UpdateKey::Dob => parse_calendar_date(raw).map(CellValue::Date).ok_or_else(invalid),
        UpdateKey::Gender => {
            if raw.trim().is_empty() {
                return Ok(CellValue::Gender(None));
            }
            Gender::parse(raw)
                .map(|gender| CellValue::Gender(Some(gender)))
                .ok_or_else(invalid)
        }
        _ => Ok(CellValue::Text(raw.to_owned())),
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    let date_part = match trimmed.get(10..11) {
        Some("T") | Some(" ") => &trimmed[..10],
        _ => trimmed,
    };
    let mut parts = date_part.splitn(3, '-');
    let year_raw = parts.next()?;
    let month_raw = parts.next()?;
    let day_raw = parts.next()?;
    if year_raw.len() != 4 || month_raw.len() != 2 || day_raw.len() != 2 {
        return None;
    }
    let year: i32 = year_raw.parse().ok()?;
    let month: u8 = month_raw.parse().ok()?;
    let day: u8 = day_raw.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

pub fn format_calendar_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn serialize_dob<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_calendar_date(*date))
}

fn deserialize_dob<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid date of birth {raw:?}")))
}

fn deserialize_gender<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Gender>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Gender::parse(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown gender {value:?}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub value: String,
}

impl FilterSpec {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub sorts: Vec<SortSpec>,
    pub filters: Vec<FilterSpec>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn first(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            sorts: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.page < 1 {
            anyhow::bail!("page must be at least 1, got {}", self.page);
        }
        if self.per_page == 0 {
            anyhow::bail!("per_page must be positive");
        }
        Ok(())
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }
}

/// One page of records in the remote-pagination shape (`data` + `last_page`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub data: Vec<UserRecord>,
    #[serde(default, alias = "total_pages")]
    pub last_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateBatch {
    #[serde(rename = "updates")]
    pub records: Vec<UserRecord>,
}

impl UpdateBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(serde_json::Value),
    Failure(String),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
