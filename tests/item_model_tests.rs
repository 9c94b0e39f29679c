use chrono::NaiveDate;
use timeline_board::{Item, ItemDraft, ItemPatch, Status, UnknownStatus};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn status_parses_its_own_keys() {
    for status in Status::ALL {
        assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
    assert_eq!(
        "blocked".parse::<Status>(),
        Err(UnknownStatus("blocked".into()))
    );
}

#[test]
fn status_columns_are_in_board_order() {
    let keys: Vec<&str> = Status::variants().map(|(key, _)| key).collect();

    assert_eq!(keys, vec!["upcoming", "in_progress", "to_review", "done"]);
    assert_eq!(Status::initial(), Status::Upcoming);
    assert_eq!(Status::default(), Status::initial());
    assert_eq!(Status::InProgress.label(), "🚧 In Progress");
}

#[test]
fn item_deserializes_without_optional_fields() {
    let item: Item =
        serde_json::from_str(r#"{"id":4,"name":"x","start":"2021-02-07","end":"2021-03-08"}"#)
            .unwrap();

    assert_eq!(item.status, Status::Upcoming);
    assert_eq!(item.description, "");
    assert_eq!(item.span_days(), 30);
}

#[test]
fn item_overlap_is_inclusive() {
    let a = Item::new(1, "a", d(2021, 1, 1), d(2021, 1, 5));
    let b = Item::new(2, "b", d(2021, 1, 5), d(2021, 1, 9));
    let c = Item::new(3, "c", d(2021, 1, 6), d(2021, 1, 9));

    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&c));
}

#[test]
fn patch_replaces_only_provided_fields() {
    let item = Item::new(1, "a", d(2021, 1, 1), d(2021, 1, 5)).with_description("keep");
    let patch = ItemPatch {
        end: Some(d(2021, 1, 9)),
        status: Some(Status::Done),
        ..ItemPatch::default()
    };

    let merged = patch.apply_to(&item);

    assert_eq!(merged.name, "a");
    assert_eq!(merged.start, d(2021, 1, 1));
    assert_eq!(merged.end, d(2021, 1, 9));
    assert_eq!(merged.status, Status::Done);
    assert_eq!(merged.description, "keep");
    assert!(ItemPatch::default().is_empty());
    assert!(!patch.is_empty());
}

#[test]
fn draft_accepts_partial_json() {
    let draft: ItemDraft = serde_json::from_str(r#"{"name":"half","start":"2021-01-01"}"#).unwrap();

    assert_eq!(draft.start, Some(d(2021, 1, 1)));
    assert_eq!(draft.end, None);
    assert_eq!(draft.status, None);
}
