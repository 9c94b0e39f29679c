use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use timeline_board::{
    BoardError, BoardManager, BoardStore, Item, ItemDraft, ItemPatch, ItemValidationError,
    KeyedBoardStore, MemoryStore, PersistenceError, Status, decode_items, seed_items,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn abc_board() -> BoardManager {
    BoardManager::with_items(vec![
        Item::new(1, "A", d(2021, 1, 1), d(2021, 1, 5)),
        Item::new(2, "B", d(2021, 1, 3), d(2021, 1, 10)),
        Item::new(3, "C", d(2021, 1, 6), d(2021, 1, 8)),
    ])
    .unwrap()
}

fn stored_board(store: &MemoryStore) -> BoardManager {
    let mut board = abc_board();
    board.attach_store(KeyedBoardStore::new(store.clone(), "timelineItems"));
    board
}

struct FailingStore;

impl BoardStore for FailingStore {
    fn save_items(&self, _items: &[Item]) -> Result<(), PersistenceError> {
        Err(PersistenceError::InvalidData("disk full".into()))
    }

    fn load_items(&self) -> Result<Option<Vec<Item>>, PersistenceError> {
        Err(PersistenceError::InvalidData("unreadable".into()))
    }
}

#[test]
fn create_assigns_fresh_id_and_defaults() {
    let mut board = abc_board();

    let snapshot = board
        .create(ItemDraft::new("Write docs", d(2021, 1, 2), d(2021, 1, 4)))
        .unwrap();

    assert_eq!(snapshot.len(), 4);
    let created = snapshot.items().last().unwrap();
    assert!(created.id > 3);
    assert_eq!(created.status, Status::Upcoming);
    assert_eq!(created.description, "");
    assert_eq!(snapshot.lanes().len(), 3);
}

#[test]
fn create_honours_explicit_status_and_description() {
    let mut board = BoardManager::new();

    let snapshot = board
        .create(
            ItemDraft::new("Review", d(2021, 3, 1), d(2021, 3, 1))
                .with_status(Status::ToReview)
                .with_description("second pass"),
        )
        .unwrap();

    let created = &snapshot.items()[0];
    assert_eq!(created.status, Status::ToReview);
    assert_eq!(created.description, "second pass");
}

#[test]
fn create_ids_are_unique_and_increasing() {
    let mut board = BoardManager::new();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let snapshot = board
            .create(ItemDraft::new("x", d(2021, 1, 1), d(2021, 1, 1)))
            .unwrap();
        ids.push(snapshot.items().last().unwrap().id);
    }

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn deleted_ids_are_not_reissued() {
    let mut board = BoardManager::new();
    let first = board
        .create(ItemDraft::new("x", d(2021, 1, 1), d(2021, 1, 1)))
        .unwrap()
        .items()[0]
        .id;
    board.delete(first);

    let second = board
        .create(ItemDraft::new("y", d(2021, 1, 1), d(2021, 1, 1)))
        .unwrap()
        .items()[0]
        .id;

    assert!(second > first);
}

#[test]
fn create_rejects_invalid_drafts_without_changing_state() {
    let mut board = abc_board();
    let before = board.snapshot();

    let empty_name = board.create(ItemDraft::new("  ", d(2021, 1, 1), d(2021, 1, 2)));
    assert_eq!(
        empty_name.unwrap_err(),
        BoardError::Validation(ItemValidationError::EmptyName)
    );

    let missing_end = board.create(ItemDraft {
        name: "no end".into(),
        start: Some(d(2021, 1, 1)),
        ..ItemDraft::default()
    });
    assert_eq!(
        missing_end.unwrap_err(),
        BoardError::Validation(ItemValidationError::MissingEnd)
    );

    let backwards = board.create(ItemDraft::new("backwards", d(2021, 1, 9), d(2021, 1, 2)));
    assert!(matches!(
        backwards,
        Err(BoardError::Validation(ItemValidationError::StartAfterEnd { .. }))
    ));

    assert!(Arc::ptr_eq(&before, &board.snapshot()));
}

#[test]
fn update_merges_patch_fields() {
    let mut board = abc_board();

    let snapshot = board
        .update(
            2,
            &ItemPatch {
                name: Some("B2".into()),
                description: Some("moved".into()),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    let item = snapshot.find(2).unwrap();
    assert_eq!(item.name, "B2");
    assert_eq!(item.description, "moved");
    assert_eq!(item.start, d(2021, 1, 3));
    assert_eq!(item.end, d(2021, 1, 10));
}

#[test]
fn update_rejects_start_after_end() {
    let mut board = abc_board();
    let before = board.snapshot();

    let result = board.update(
        1,
        &ItemPatch {
            start: Some(d(2021, 1, 9)),
            ..ItemPatch::default()
        },
    );

    assert_eq!(
        result.unwrap_err(),
        BoardError::Validation(ItemValidationError::StartAfterEnd {
            start: d(2021, 1, 9),
            end: d(2021, 1, 5),
        })
    );
    assert_eq!(*board.snapshot(), *before);
}

#[test]
fn update_of_unknown_id_is_a_successful_no_op() {
    let mut board = abc_board();
    let before = board.snapshot();

    let after = board.update(99, &ItemPatch::name("ghost")).unwrap();

    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn delete_is_idempotent() {
    let mut board = abc_board();

    let once = board.delete(2);
    let twice = board.delete(2);

    assert_eq!(once.len(), 2);
    assert!(Arc::ptr_eq(&once, &twice));
    assert_eq!(once.lanes().len(), 1);
}

#[test]
fn shift_there_and_back_restores_dates() {
    let mut board = abc_board();
    let original = board.find(2).unwrap().clone();

    let moved = board.shift(2, 17).unwrap();
    let item = moved.find(2).unwrap();
    assert_eq!(item.start, d(2021, 1, 20));
    assert_eq!(item.end, d(2021, 1, 27));
    assert_eq!(item.span_days(), original.span_days());

    let back = board.shift(2, -17).unwrap();
    assert_eq!(back.find(2).unwrap(), &original);
}

#[test]
fn shift_recomputes_lanes() {
    let mut board = abc_board();

    let snapshot = board.shift(2, 30).unwrap();

    assert_eq!(snapshot.lanes().len(), 1);
    assert_eq!(snapshot.bounds().end, d(2021, 2, 9));
}

#[test]
fn zero_shift_leaves_snapshot_and_store_untouched() {
    let store = MemoryStore::new();
    let mut board = stored_board(&store);
    let before = board.snapshot();

    let after = board.shift(1, 0).unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.lanes(), before.lanes());
    assert!(store.get("timelineItems").is_none());
}

#[test]
fn shift_out_of_date_range_is_rejected() {
    let mut board = abc_board();

    let result = board.shift(1, i64::MAX / 2);

    assert!(matches!(
        result,
        Err(BoardError::Validation(ItemValidationError::DateOutOfRange { id: 1, .. }))
    ));
    assert_eq!(board.find(1).unwrap().start, d(2021, 1, 1));
}

#[test]
fn reclassify_twice_equals_once() {
    let mut board = abc_board();

    let once = board.reclassify(3, Status::Done);
    let twice = board.reclassify(3, Status::Done);

    assert_eq!(once.find(3).unwrap().status, Status::Done);
    assert!(Arc::ptr_eq(&once, &twice));
    assert_eq!(once.column(Status::Done).len(), 1);
    assert_eq!(once.column(Status::Upcoming).len(), 2);
}

#[test]
fn earlier_snapshots_are_not_mutated() {
    let mut board = abc_board();
    let before = board.snapshot();

    board.shift(1, 3).unwrap();
    board.reclassify(2, Status::InProgress);
    board.delete(3);

    assert_eq!(before.len(), 3);
    assert_eq!(before.find(1).unwrap().start, d(2021, 1, 1));
    assert_eq!(before.find(2).unwrap().status, Status::Upcoming);
    assert_eq!(before.lanes().len(), 2);
}

#[test]
fn mutations_write_full_collection_to_store() {
    let store = MemoryStore::new();
    let mut board = stored_board(&store);

    board.reclassify(1, Status::InProgress);

    let saved = decode_items(&store.get("timelineItems").unwrap()).unwrap();
    assert_eq!(saved, board.items());

    board.delete(2);
    let saved = decode_items(&store.get("timelineItems").unwrap()).unwrap();
    assert_eq!(saved.len(), 2);
}

#[test]
fn failed_writes_do_not_block_mutations() {
    let mut board = abc_board();
    board.attach_store(FailingStore);

    let snapshot = board.shift(3, 1).unwrap();

    assert_eq!(snapshot.find(3).unwrap().start, d(2021, 1, 7));
    assert!(board.save().is_err());
}

#[test]
fn unreadable_store_loads_seed() {
    let board = BoardManager::load(FailingStore);

    assert_eq!(board.items(), seed_items().as_slice());
}

#[test]
fn empty_record_loads_seed_not_empty_board() {
    let store = MemoryStore::with_record("timelineItems", "[]");

    let board = BoardManager::load(KeyedBoardStore::new(store, "timelineItems"));

    assert_eq!(board.items().len(), 16);
}

#[test]
fn subscribers_see_each_committed_snapshot() {
    let mut board = abc_board();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let sub = board.subscribe(move |snapshot| {
        assert_eq!(snapshot.len(), 3);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    board.shift(1, 2).unwrap();
    board.shift(1, 0).unwrap();
    board.reclassify(1, Status::Done);
    board.reclassify(1, Status::Done);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert!(board.unsubscribe(sub));
    board.shift(1, 1).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!board.unsubscribe(sub));
}

#[test]
fn with_items_rejects_duplicate_ids() {
    let result = BoardManager::with_items(vec![
        Item::new(1, "a", d(2021, 1, 1), d(2021, 1, 1)),
        Item::new(1, "b", d(2021, 1, 2), d(2021, 1, 2)),
    ]);

    assert!(matches!(
        result,
        Err(BoardError::Validation(ItemValidationError::DuplicateId(1)))
    ));
}

#[test]
fn columns_group_items_in_board_order() {
    let mut board = abc_board();
    board.reclassify(2, Status::InProgress);

    let snapshot = board.snapshot();
    let columns = snapshot.columns();
    let labels: Vec<&str> = columns.iter().map(|c| c.label).collect();
    assert_eq!(
        labels,
        vec!["📅 Upcoming", "🚧 In Progress", "📝 To Review", "✅ Done"]
    );
    assert_eq!(columns[0].items.len(), 2);
    assert_eq!(columns[1].items[0].id, 2);

    let hidden = snapshot.columns_hiding(Some(2));
    assert!(hidden[1].items.is_empty());
}

#[test]
fn loaded_blank_name_does_not_block_other_edits() {
    let mut board =
        BoardManager::with_items(vec![Item::new(1, "  ", d(2021, 1, 1), d(2021, 1, 5))]).unwrap();

    let snapshot = board
        .update(1, &ItemPatch::dates(d(2021, 1, 2), d(2021, 1, 6)))
        .unwrap();
    assert_eq!(snapshot.find(1).unwrap().start, d(2021, 1, 2));

    let renamed = board.update(1, &ItemPatch::name(" "));
    assert_eq!(
        renamed.unwrap_err(),
        BoardError::Validation(ItemValidationError::EmptyName)
    );
}
