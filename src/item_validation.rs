use crate::item::{Item, ItemDraft, ItemId, ItemPatch};
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    #[error("item name must not be empty")]
    EmptyName,
    #[error("item start date is required")]
    MissingStart,
    #[error("item end date is required")]
    MissingEnd,
    #[error("item start date {start} must be on or before end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("moving item {id} by {delta_days} days leaves the supported date range")]
    DateOutOfRange { id: ItemId, delta_days: i64 },
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
}

fn validate_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    Ok(())
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), ItemValidationError> {
    if start > end {
        return Err(ItemValidationError::StartAfterEnd { start, end });
    }
    Ok(())
}

pub fn validate_item(item: &Item) -> Result<(), ItemValidationError> {
    validate_name(&item.name)?;
    validate_range(item.start, item.end)
}

/// Rules for items that already exist: any non-empty name is kept as written.
pub fn validate_stored_item(item: &Item) -> Result<(), ItemValidationError> {
    if item.name.is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    validate_range(item.start, item.end)
}

/// Checks `merged`, the result of applying `patch`. A name is only held to
/// the entry rules when the patch supplies one.
pub fn validate_update(merged: &Item, patch: &ItemPatch) -> Result<(), ItemValidationError> {
    if patch.name.is_some() {
        validate_item(merged)
    } else {
        validate_stored_item(merged)
    }
}

/// Checks a draft and hands back its resolved date range.
pub fn validate_draft(draft: &ItemDraft) -> Result<(NaiveDate, NaiveDate), ItemValidationError> {
    validate_name(&draft.name)?;
    let start = draft.start.ok_or(ItemValidationError::MissingStart)?;
    let end = draft.end.ok_or(ItemValidationError::MissingEnd)?;
    validate_range(start, end)?;
    Ok((start, end))
}

pub fn validate_item_collection(items: &[Item]) -> Result<(), ItemValidationError> {
    let mut seen_ids = HashSet::with_capacity(items.len());
    for item in items {
        if !seen_ids.insert(item.id) {
            return Err(ItemValidationError::DuplicateId(item.id));
        }
        validate_stored_item(item)?;
    }
    Ok(())
}

/// Splits a loaded collection into the items that pass [`validate_stored_item`]
/// and the ids rejected along the way. The first item with a given id wins.
pub fn retain_valid_items(items: Vec<Item>) -> (Vec<Item>, Vec<(ItemId, ItemValidationError)>) {
    let mut seen_ids = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for item in items {
        if seen_ids.contains(&item.id) {
            rejected.push((item.id, ItemValidationError::DuplicateId(item.id)));
            continue;
        }
        match validate_stored_item(&item) {
            Ok(()) => {
                seen_ids.insert(item.id);
                kept.push(item);
            }
            Err(err) => rejected.push((item.id, err)),
        }
    }
    (kept, rejected)
}
