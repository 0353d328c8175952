// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CellValue, EditError, RecordId, UpdateKey, UserRecord};

/// Returns a copy of `records` with one field replaced and the record
/// flagged as modified. The input collection is left untouched.
pub fn apply_edit(
    records: &[UserRecord],
    index: usize,
    key: UpdateKey,
    value: CellValue,
) -> Result<Vec<UserRecord>, EditError> {
    let mut copy = records.to_vec();
    let len = copy.len();
    let target = copy
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })?;
    target.set_field(key, value)?;
    target.is_modified = true;
    Ok(copy)
}

pub fn is_eligible_for_submit<'a, I>(records: I) -> bool
where
    I: IntoIterator<Item = &'a UserRecord>,
{
    records.into_iter().any(|record| record.is_modified)
}

pub fn modified_records<'a, I>(records: I) -> Vec<UserRecord>
where
    I: IntoIterator<Item = &'a UserRecord>,
{
    records
        .into_iter()
        .filter(|record| record.is_modified)
        .cloned()
        .collect()
}

/// Clears the dirty flag on every record whose contents still match the
/// synced copy. Returns the ids that were cleared.
pub fn clear_modified(records: &mut [UserRecord], synced: &[UserRecord]) -> Vec<RecordId> {
    let mut cleared = Vec::new();
    for record in records.iter_mut() {
        let unchanged = synced.iter().any(|sent| *sent == *record);
        if unchanged && record.is_modified {
            record.is_modified = false;
            cleared.push(record.id);
        }
    }
    cleared
}
