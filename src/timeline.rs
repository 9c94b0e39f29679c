use crate::item::Item;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Horizontal extent of the timeline: earliest start to latest end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineBounds {
    /// Zero-span bounds anchored on a single day.
    pub fn collapsed(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Whole days from `start` to `end`. Zero for collapsed bounds.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

pub fn compute_bounds(items: &[Item]) -> TimelineBounds {
    compute_bounds_at(items, Local::now().date_naive())
}

/// Same as [`compute_bounds`] with the empty-collection anchor supplied by the caller.
pub fn compute_bounds_at(items: &[Item], today: NaiveDate) -> TimelineBounds {
    let start = items.iter().map(|item| item.start).min();
    let end = items.iter().map(|item| item.end).max();
    match (start, end) {
        (Some(start), Some(end)) => TimelineBounds { start, end },
        _ => TimelineBounds::collapsed(today),
    }
}
