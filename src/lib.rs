pub mod board;
pub mod config;
pub mod drag;
pub mod geometry;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod item;
pub(crate) mod item_validation;
pub mod lanes;
pub mod persistence;
pub mod seed;
pub mod timeline;

pub use board::{BoardError, BoardManager, BoardSnapshot, ColumnView, SubscriptionId};
pub use config::{BoardConfig, ConfigError, DragConfig, LayoutConfig, StorageConfig, ZoomConfig};
pub use drag::{DragMachine, DragOutcome, DragState, DragSubject};
pub use geometry::{
    CardPlacement, Geometry, InvalidZoom, TimelineLayout, Zoom, days_between, layout_timeline,
    map_to_geometry, pixels_to_day_delta, preview_offset,
};
pub use item::{Item, ItemDraft, ItemId, ItemPatch, Status, UnknownStatus};
pub use item_validation::ItemValidationError;
pub use lanes::{Lane, assign_lanes, intervals_overlap};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRecordStore;
pub use persistence::{
    BoardStore, ItemRecord, JsonFileStore, KeyedBoardStore, MemoryStore, PersistenceError,
    RecordStore, decode_items, encode_items, load_items_from_csv, load_items_from_json,
    load_items_or_seed, save_items_to_csv, save_items_to_json, validate_items,
};
pub use seed::seed_items;
pub use timeline::{TimelineBounds, compute_bounds, compute_bounds_at};

/// Lane partition of `items`. Alias of [`assign_lanes`].
pub fn compute_lanes(items: &[Item]) -> Vec<Lane> {
    assign_lanes(items)
}
