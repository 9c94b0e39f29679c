use crate::item::{Item, ItemDraft, ItemId, ItemPatch, Status};
use crate::item_validation::{self, ItemValidationError};
use crate::lanes::{self, Lane, assign_lanes};
use crate::persistence::{BoardStore, PersistenceResult, load_items_or_seed};
use crate::timeline::{TimelineBounds, compute_bounds};
use chrono::{TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ItemValidationError),
}

/// Immutable view of the board: the items plus everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    items: Vec<Item>,
    lanes: Vec<Lane>,
    bounds: TimelineBounds,
}

/// Items filed under one status column, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView<'a> {
    pub status: Status,
    pub label: &'static str,
    pub items: Vec<&'a Item>,
}

impl BoardSnapshot {
    pub fn new(items: Vec<Item>) -> Self {
        let lanes = assign_lanes(&items);
        let bounds = compute_bounds(&items);
        Self {
            items,
            lanes,
            bounds,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn bounds(&self) -> TimelineBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn lane_of(&self, id: ItemId) -> Option<usize> {
        lanes::lane_of(&self.lanes, id)
    }

    pub fn column(&self, status: Status) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.status == status)
            .collect()
    }

    pub fn columns(&self) -> Vec<ColumnView<'_>> {
        self.columns_hiding(None)
    }

    /// Column grouping with the item being dragged (if any) left out, so the
    /// view can render it in a drag overlay instead.
    pub fn columns_hiding(&self, active: Option<ItemId>) -> Vec<ColumnView<'_>> {
        Status::ALL
            .iter()
            .map(|&status| ColumnView {
                status,
                label: status.label(),
                items: self
                    .items
                    .iter()
                    .filter(|item| item.status == status && Some(item.id) != active)
                    .collect(),
            })
            .collect()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

pub type SubscriptionId = u64;

type Observer = Box<dyn Fn(&BoardSnapshot) + Send + Sync>;
type SharedStore = Box<dyn BoardStore + Send + Sync>;

/// Single writer of the item collection.
///
/// Every mutation that changes the collection builds a fresh snapshot,
/// writes the full collection to the attached store (best effort) and then
/// notifies subscribers. Snapshots handed out earlier are never touched.
pub struct BoardManager {
    snapshot: Arc<BoardSnapshot>,
    last_issued_id: ItemId,
    store: Option<SharedStore>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

impl Default for BoardManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardManager {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    pub fn with_items(items: Vec<Item>) -> Result<Self, BoardError> {
        item_validation::validate_item_collection(&items)?;
        Ok(Self::from_parts(items, None))
    }

    /// Starts from whatever `store` holds, or the seed dataset when it holds
    /// nothing usable. Later mutations are written back to `store`.
    pub fn load<S>(store: S) -> Self
    where
        S: BoardStore + Send + Sync + 'static,
    {
        let items = load_items_or_seed(&store);
        Self::from_parts(items, Some(Box::new(store)))
    }

    fn from_parts(items: Vec<Item>, store: Option<SharedStore>) -> Self {
        let last_issued_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        Self {
            snapshot: Arc::new(BoardSnapshot::new(items)),
            last_issued_id,
            store,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn attach_store<S>(&mut self, store: S)
    where
        S: BoardStore + Send + Sync + 'static,
    {
        self.store = Some(Box::new(store));
    }

    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn items(&self) -> &[Item] {
        self.snapshot.items()
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.snapshot.find(id)
    }

    /// Writes the current collection to the attached store, surfacing errors.
    pub fn save(&self) -> PersistenceResult<()> {
        match &self.store {
            Some(store) => store.save_items(self.snapshot.items()),
            None => Ok(()),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&BoardSnapshot) + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);
        self.observers.len() != before
    }

    pub fn create(&mut self, draft: ItemDraft) -> Result<Arc<BoardSnapshot>, BoardError> {
        let (start, end) = item_validation::validate_draft(&draft)?;
        let id = self.allocate_id();
        let item = Item {
            id,
            name: draft.name,
            start,
            end,
            status: draft.status.unwrap_or_else(Status::initial),
            description: draft.description.unwrap_or_default(),
        };
        tracing::debug!(item_id = id, "created item");
        let mut items = self.snapshot.items().to_vec();
        items.push(item);
        Ok(self.commit(items))
    }

    /// Merges `patch` into item `id`. Unknown ids are a successful no-op.
    pub fn update(
        &mut self,
        id: ItemId,
        patch: &ItemPatch,
    ) -> Result<Arc<BoardSnapshot>, BoardError> {
        let Some(idx) = self.snapshot.position(id) else {
            return Ok(self.snapshot());
        };
        let current = &self.snapshot.items()[idx];
        let merged = patch.apply_to(current);
        item_validation::validate_update(&merged, patch)?;
        if &merged == current {
            return Ok(self.snapshot());
        }
        let mut items = self.snapshot.items().to_vec();
        items[idx] = merged;
        Ok(self.commit(items))
    }

    pub fn delete(&mut self, id: ItemId) -> Arc<BoardSnapshot> {
        let Some(idx) = self.snapshot.position(id) else {
            return self.snapshot();
        };
        let mut items = self.snapshot.items().to_vec();
        items.remove(idx);
        tracing::debug!(item_id = id, "deleted item");
        self.commit(items)
    }

    /// Moves item `id` by `delta_days` keeping its duration. A zero delta or
    /// unknown id leaves the board (and the store) untouched.
    pub fn shift(&mut self, id: ItemId, delta_days: i64) -> Result<Arc<BoardSnapshot>, BoardError> {
        if delta_days == 0 {
            return Ok(self.snapshot());
        }
        let Some(idx) = self.snapshot.position(id) else {
            return Ok(self.snapshot());
        };
        let out_of_range = ItemValidationError::DateOutOfRange { id, delta_days };
        let delta = TimeDelta::try_days(delta_days).ok_or_else(|| out_of_range.clone())?;
        let current = &self.snapshot.items()[idx];
        let start = current
            .start
            .checked_add_signed(delta)
            .ok_or_else(|| out_of_range.clone())?;
        let end = current.end.checked_add_signed(delta).ok_or(out_of_range)?;

        let mut items = self.snapshot.items().to_vec();
        items[idx].start = start;
        items[idx].end = end;
        Ok(self.commit(items))
    }

    pub fn reclassify(&mut self, id: ItemId, status: Status) -> Arc<BoardSnapshot> {
        let Some(idx) = self.snapshot.position(id) else {
            return self.snapshot();
        };
        if self.snapshot.items()[idx].status == status {
            return self.snapshot();
        }
        let mut items = self.snapshot.items().to_vec();
        items[idx].status = status;
        self.commit(items)
    }

    /// Swaps in a whole new collection, e.g. after an import.
    pub fn replace_all(&mut self, items: Vec<Item>) -> Result<Arc<BoardSnapshot>, BoardError> {
        item_validation::validate_item_collection(&items)?;
        if let Some(max_id) = items.iter().map(|item| item.id).max() {
            self.last_issued_id = self.last_issued_id.max(max_id);
        }
        Ok(self.commit(items))
    }

    /// Wall-clock milliseconds, bumped past every id seen so far.
    fn allocate_id(&mut self) -> ItemId {
        let clock = Utc::now().timestamp_millis();
        let id = clock.max(self.last_issued_id.saturating_add(1));
        self.last_issued_id = id;
        id
    }

    fn commit(&mut self, items: Vec<Item>) -> Arc<BoardSnapshot> {
        let snapshot = Arc::new(BoardSnapshot::new(items));
        tracing::debug!(
            items = snapshot.len(),
            lanes = snapshot.lanes().len(),
            "recomputed board"
        );
        self.snapshot = Arc::clone(&snapshot);
        if let Err(err) = self.save() {
            tracing::warn!("failed to save board: {err}");
        }
        for (_, observer) in &self.observers {
            observer(&snapshot);
        }
        snapshot
    }
}
