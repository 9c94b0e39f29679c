//! Greedy packing of items into rows of non-overlapping intervals.
//!
//! Items are visited in ascending `start` order (stable, so equal starts keep
//! their input order) and each one goes into the first lane with no conflicting
//! interval. A new lane is opened only when every existing lane conflicts.

use crate::item::{Item, ItemId};
use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive-date overlap test. Sharing a single boundary day counts.
pub fn intervals_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_end >= b_start && b_end >= a_start
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Lane {
    items: Vec<Item>,
}

impl Lane {
    fn accepts(&self, item: &Item) -> bool {
        !self.items.iter().any(|existing| existing.overlaps(item))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn assign_lanes(items: &[Item]) -> Vec<Lane> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by_key(|item| item.start);

    let mut lanes: Vec<Lane> = Vec::new();
    for item in sorted {
        match lanes.iter_mut().find(|lane| lane.accepts(item)) {
            Some(lane) => lane.items.push(item.clone()),
            None => lanes.push(Lane {
                items: vec![item.clone()],
            }),
        }
    }
    lanes
}

/// Index of the lane holding `id`, if any.
pub fn lane_of(lanes: &[Lane], id: ItemId) -> Option<usize> {
    lanes.iter().position(|lane| lane.contains(id))
}
