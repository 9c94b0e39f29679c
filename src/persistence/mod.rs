use crate::item::{Item, ItemId, Status};
use crate::item_validation;
use crate::seed::seed_items;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("no board stored")]
    NotFound,
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(Box::new(value))
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Load/save collaborator for the full item collection.
///
/// `load_items` returns `Ok(None)` when nothing has been stored yet and an
/// error when a stored record cannot be decoded. Seed fallback is applied
/// by [`load_items_or_seed`], not by implementors.
pub trait BoardStore {
    fn save_items(&self, items: &[Item]) -> PersistenceResult<()>;
    fn load_items(&self) -> PersistenceResult<Option<Vec<Item>>>;
}

/// Raw string record storage addressed by an opaque key.
pub trait RecordStore {
    fn read_record(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn write_record(&self, key: &str, value: &str) -> PersistenceResult<()>;
}

/// Adapts any [`RecordStore`] into a [`BoardStore`] holding the collection
/// as one JSON record under `key`.
pub struct KeyedBoardStore<S> {
    store: S,
    key: String,
}

impl<S: RecordStore> KeyedBoardStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: RecordStore> BoardStore for KeyedBoardStore<S> {
    fn save_items(&self, items: &[Item]) -> PersistenceResult<()> {
        let encoded = encode_items(items)?;
        self.store.write_record(&self.key, &encoded)
    }

    fn load_items(&self) -> PersistenceResult<Option<Vec<Item>>> {
        match self.store.read_record(&self.key)? {
            Some(raw) => decode_items(&raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Wire shape of a persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            start: item.start,
            end: item.end,
            name: item.name.clone(),
            status: Some(item.status.as_str().to_string()),
            description: if item.description.is_empty() {
                None
            } else {
                Some(item.description.clone())
            },
        }
    }
}

impl ItemRecord {
    /// Missing and unrecognised statuses land in the initial column.
    pub fn into_item(self) -> Item {
        let status = match self.status.as_deref() {
            None => Status::initial(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(item_id = self.id, "{err}; using initial column");
                Status::initial()
            }),
        };
        Item {
            id: self.id,
            name: self.name,
            start: self.start,
            end: self.end,
            status,
            description: self.description.unwrap_or_default(),
        }
    }
}

pub fn encode_items(items: &[Item]) -> PersistenceResult<String> {
    let records: Vec<ItemRecord> = items.iter().map(ItemRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses a record written by [`encode_items`]. Anything other than a JSON
/// array of item records is an error. Individual items that fail validation
/// (reversed dates, empty name, repeated id) are dropped with a warning and
/// the rest are kept.
pub fn decode_items(raw: &str) -> PersistenceResult<Vec<Item>> {
    let records: Vec<ItemRecord> = serde_json::from_str(raw)?;
    let items: Vec<Item> = records.into_iter().map(ItemRecord::into_item).collect();
    let (kept, rejected) = item_validation::retain_valid_items(items);
    for (item_id, err) in rejected {
        tracing::warn!(item_id, "dropping stored item: {err}");
    }
    Ok(kept)
}

pub fn validate_items(items: &[Item]) -> PersistenceResult<()> {
    item_validation::validate_item_collection(items)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Reads the stored collection, falling back to the seed dataset when the
/// record is absent, unreadable, or holds no valid item. Never fails.
pub fn load_items_or_seed(store: &dyn BoardStore) -> Vec<Item> {
    match store.load_items() {
        Ok(Some(items)) if !items.is_empty() => {
            tracing::info!(count = items.len(), "loaded stored board");
            items
        }
        Ok(Some(_)) => {
            tracing::warn!("stored board has no valid items; using seed dataset");
            seed_items()
        }
        Ok(None) => {
            tracing::info!("no stored board; using seed dataset");
            seed_items()
        }
        Err(err) => {
            tracing::warn!("failed to load stored board: {err}; using seed dataset");
            seed_items()
        }
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileStore, load_items_from_csv, load_items_from_json, save_items_to_csv,
    save_items_to_json,
};
pub use memory::MemoryStore;
