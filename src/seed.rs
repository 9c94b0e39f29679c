use crate::item::{Item, ItemId};
use chrono::NaiveDate;

const SEED: [(ItemId, &str, (i32, u32, u32), (i32, u32, u32)); 16] = [
    (1, "Recruit translators", (2021, 1, 14), (2021, 1, 22)),
    (2, "Create lesson plan 1", (2021, 1, 17), (2021, 1, 31)),
    (3, "Translate phrases for lesson 1", (2021, 2, 5), (2021, 2, 13)),
    (4, "Create dark mode design", (2021, 2, 7), (2021, 3, 8)),
    (5, "Recruit copyeditors", (2021, 2, 14), (2021, 2, 22)),
    (6, "Proofread translations for lesson 1", (2021, 2, 18), (2021, 2, 24)),
    (7, "Finalize logo", (2021, 2, 20), (2021, 2, 22)),
    (8, "Implement dark mode", (2021, 2, 21), (2021, 3, 22)),
    (9, "Finalize lesson plan 1", (2021, 2, 21), (2021, 2, 28)),
    (10, "Approve logo", (2021, 2, 23), (2021, 2, 23)),
    (11, "Create lesson plan 2", (2021, 3, 3), (2021, 3, 29)),
    (12, "Translate phrases for lesson 2", (2021, 3, 30), (2021, 4, 8)),
    (13, "Debug mobile notification error", (2021, 4, 1), (2021, 4, 4)),
    (14, "Test debugged mobile notifications", (2021, 4, 5), (2021, 4, 6)),
    (15, "Beta test", (2021, 4, 16), (2021, 4, 30)),
    (16, "Launch day", (2021, 5, 1), (2021, 5, 1)),
];

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Built-in dataset used whenever no usable persisted record exists.
pub fn seed_items() -> Vec<Item> {
    SEED.iter()
        .map(|&(id, name, start, end)| Item::new(id, name, date(start), date(end)))
        .collect()
}
