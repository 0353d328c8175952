// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::cmp::Ordering;
use std::path::PathBuf;
use time::{Date, Month};
use usergrid_app::{
    FilterSpec, Gender, PageRequest, PageResponse, RecordId, SortDirection, UpdateBatch, UpdateKey,
    UserRecord, format_calendar_date,
};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const CITIES: [&str; 14] = [
    "Austin",
    "Seattle",
    "Denver",
    "Madison",
    "Raleigh",
    "Pittsburgh",
    "Portland",
    "Boise",
    "Phoenix",
    "Nashville",
    "Columbus",
    "Minneapolis",
    "Omaha",
    "Tucson",
];
const COLORS: [&str; 12] = [
    "red", "orange", "yellow", "green", "teal", "blue", "indigo", "violet", "black", "white",
    "silver", "gold",
];
const EMAIL_DOMAINS: [&str; 4] = [
    "example.com",
    "mail.example.org",
    "users.test",
    "inbox.example.net",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic generator of plausible user rows.
#[derive(Debug, Clone)]
pub struct UserFaker {
    rng: DeterministicRng,
}

impl UserFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn user(&mut self, id: i64) -> UserRecord {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let domain = self.pick(&EMAIL_DOMAINS);
        let gender = if self.rng.bool() {
            Gender::Female
        } else {
            Gender::Male
        };

        UserRecord {
            id: RecordId::new(id),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{id}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone_number: format!(
                "({:03}) {:03}-{:04}",
                self.int_range(200, 999),
                self.int_range(200, 999),
                self.int_range(0, 9_999),
            ),
            location: self.pick(&CITIES).to_owned(),
            gender: Some(gender),
            favourite: self.pick(&COLORS).to_owned(),
            dob: self.birth_date(),
            is_modified: false,
        }
    }

    pub fn users(&mut self, count: usize) -> Vec<UserRecord> {
        (1..=count as i64).map(|id| self.user(id)).collect()
    }

    fn birth_date(&mut self) -> Date {
        let year = self.int_range(1950, 2005);
        let month = Month::try_from(self.int_range(1, 12) as u8).unwrap_or(Month::January);
        let day = self.int_range(1, 28) as u8;
        Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

/// In-memory stand-in for the user service: answers page queries and
/// applies update batches the way the remote endpoints do.
#[derive(Debug, Clone, Default)]
pub struct DemoServer {
    users: Vec<UserRecord>,
}

impl DemoServer {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::new(UserFaker::new(seed).users(count))
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn user(&self, id: RecordId) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        request.validate()?;

        let mut matching: Vec<&UserRecord> = self
            .users
            .iter()
            .filter(|user| request.filters.iter().all(|filter| matches(user, filter)))
            .collect();

        matching.sort_by(|left, right| {
            for sort in &request.sorts {
                let ordering = compare_field(left, right, &sort.field);
                let ordering = match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            left.id.cmp(&right.id)
        });

        let per_page = request.per_page as usize;
        let last_page = matching.len().div_ceil(per_page).max(1);
        let start = (request.page as usize - 1).saturating_mul(per_page);
        let data = matching
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        Ok(PageResponse {
            data,
            last_page: Some(u32::try_from(last_page).context("page count overflow")?),
        })
    }

    /// Stores every record in the batch or none of them.
    pub fn apply_updates(&mut self, batch: &UpdateBatch) -> Result<usize> {
        if batch.is_empty() {
            bail!("no updates supplied");
        }
        let mut positions = Vec::with_capacity(batch.len());
        for record in &batch.records {
            let Some(position) = self.users.iter().position(|user| user.id == record.id) else {
                bail!("user {} not found", record.id);
            };
            positions.push(position);
        }

        for (position, record) in positions.into_iter().zip(&batch.records) {
            let mut stored = record.clone();
            stored.is_modified = false;
            self.users[position] = stored;
        }
        Ok(batch.len())
    }
}

fn matches(user: &UserRecord, filter: &FilterSpec) -> bool {
    let needle = filter.value.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return true;
    }
    if filter.field == "id" {
        return user.id.get().to_string() == needle;
    }
    match UpdateKey::parse(&filter.field) {
        Some(UpdateKey::Gender) => user.gender.map(Gender::as_str) == Some(needle.as_str()),
        Some(UpdateKey::Dob) => format_calendar_date(user.dob).starts_with(&needle),
        Some(key) => user
            .field(key)
            .raw()
            .to_ascii_lowercase()
            .contains(&needle),
        None => true,
    }
}

fn compare_field(left: &UserRecord, right: &UserRecord, field: &str) -> Ordering {
    if field == "id" {
        return left.id.cmp(&right.id);
    }
    match UpdateKey::parse(field) {
        Some(UpdateKey::Dob) => left.dob.cmp(&right.dob),
        Some(UpdateKey::Gender) => left.gender.cmp(&right.gender),
        Some(key) => left
            .field(key)
            .raw()
            .to_ascii_lowercase()
            .cmp(&right.field(key).raw().to_ascii_lowercase()),
        None => Ordering::Equal,
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

pub fn fixture_user(id: i64) -> UserRecord {
    UserRecord {
        id: RecordId::new(id),
        name: format!("Fixture User {id}"),
        email: format!("fixture{id}@example.com"),
        phone_number: "(555) 010-0100".to_owned(),
        location: "Austin".to_owned(),
        gender: Some(Gender::Female),
        favourite: "teal".to_owned(),
        dob: Date::from_calendar_date(1990, Month::April, 2).unwrap_or(Date::MIN),
        is_modified: false,
    }
}
