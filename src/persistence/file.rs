use super::{BoardStore, PersistenceError, PersistenceResult, decode_items, encode_items};
use crate::item::{Item, Status};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file holding the whole item collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardStore for JsonFileStore {
    fn save_items(&self, items: &[Item]) -> PersistenceResult<()> {
        save_items_to_json(items, &self.path)
    }

    fn load_items(&self) -> PersistenceResult<Option<Vec<Item>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode_items(&raw).map(Some)
    }
}

pub fn save_items_to_json<P: AsRef<Path>>(items: &[Item], path: P) -> PersistenceResult<()> {
    super::validate_items(items)?;
    let encoded = encode_items(items)?;
    fs::write(path, encoded)?;
    Ok(())
}

pub fn load_items_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Item>> {
    let raw = fs::read_to_string(path)?;
    decode_items(&raw)
}

#[derive(Serialize, Deserialize)]
struct ItemCsvRecord {
    id: i64,
    name: String,
    start: String,
    end: String,
    status: String,
    description: String,
}

impl From<&Item> for ItemCsvRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            start: format_date(item.start),
            end: format_date(item.end),
            status: item.status.as_str().to_string(),
            description: item.description.clone(),
        }
    }
}

impl ItemCsvRecord {
    fn into_item(self) -> PersistenceResult<Item> {
        let start = parse_date(&self.start)?;
        let end = parse_date(&self.end)?;
        let status = if self.status.trim().is_empty() {
            Status::initial()
        } else {
            self.status
                .parse::<Status>()
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?
        };
        Ok(Item::new(self.id, self.name, start, end)
            .with_status(status)
            .with_description(self.description))
    }
}

pub fn save_items_to_csv<P: AsRef<Path>>(items: &[Item], path: P) -> PersistenceResult<()> {
    super::validate_items(items)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for item in items {
        writer.serialize(ItemCsvRecord::from(item))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_items_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Item>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut items = Vec::new();
    for record in reader.deserialize::<ItemCsvRecord>() {
        items.push(record?.into_item()?);
    }

    if items.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no items".into(),
        ));
    }

    super::validate_items(&items)?;
    Ok(items)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}
