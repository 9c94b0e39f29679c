use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ItemId = i64;

/// Board column an item is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Upcoming,
    InProgress,
    ToReview,
    Done,
}

impl Status {
    /// Columns in board order.
    pub const ALL: [Status; 4] = [
        Status::Upcoming,
        Status::InProgress,
        Status::ToReview,
        Status::Done,
    ];

    /// Column new and unclassified items land in.
    pub const fn initial() -> Self {
        Status::Upcoming
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Upcoming => "upcoming",
            Status::InProgress => "in_progress",
            Status::ToReview => "to_review",
            Status::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Upcoming => "📅 Upcoming",
            Status::InProgress => "🚧 In Progress",
            Status::ToReview => "📝 To Review",
            Status::Done => "✅ Done",
        }
    }

    pub fn variants() -> impl Iterator<Item = (&'static str, &'static str)> {
        Self::ALL.iter().map(|status| (status.as_str(), status.label()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "upcoming" => Ok(Status::Upcoming),
            "in_progress" => Ok(Status::InProgress),
            "to_review" => Ok(Status::ToReview),
            "done" => Ok(Status::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A time-bounded work item. Both `start` and `end` are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            status: Status::initial(),
            description: String::new(),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Number of calendar days covered, counting both ends.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn overlaps(&self, other: &Item) -> bool {
        crate::lanes::intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Input to `BoardManager::create`. Dates are optional so that an incomplete
/// form submission can be rejected with a precise reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            end: Some(end),
            status: None,
            description: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field-wise patch merged into an existing item by `BoardManager::update`.
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }

    /// Returns a copy of `item` with every provided field replaced.
    pub fn apply_to(&self, item: &Item) -> Item {
        let mut merged = item.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(start) = self.start {
            merged.start = start;
        }
        if let Some(end) = self.end {
            merged.end = end;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        merged
    }
}
