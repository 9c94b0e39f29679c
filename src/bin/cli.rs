use chrono::NaiveDate;
use std::io::{self, Write};
use timeline_board::{
    BoardConfig, BoardManager, BoardSnapshot, ItemDraft, ItemId, ItemPatch, JsonFileStore,
    KeyedBoardStore, MemoryStore, Status, Zoom, layout_timeline, load_items_from_csv,
    load_items_from_json, save_items_to_csv, save_items_to_json,
};
use tracing_subscriber::EnvFilter;

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers.to_vec()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_items(snapshot: &BoardSnapshot) -> String {
    let rows: Vec<Vec<String>> = snapshot
        .items()
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.name.clone(),
                item.start.to_string(),
                item.end.to_string(),
                item.status.to_string(),
                snapshot
                    .lane_of(item.id)
                    .map(|lane| lane.to_string())
                    .unwrap_or_default(),
                item.description.clone(),
            ]
        })
        .collect();
    render_text_table(
        &["id", "name", "start", "end", "status", "lane", "description"],
        &rows,
    )
}

fn render_lanes(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    let bounds = snapshot.bounds();
    out.push_str(&format!(
        "Timeline {} -> {} ({} days, {} lanes)\n",
        bounds.start,
        bounds.end,
        bounds.total_days(),
        snapshot.lanes().len()
    ));
    for (idx, lane) in snapshot.lanes().iter().enumerate() {
        let names = lane
            .items()
            .iter()
            .map(|item| format!("{} [{}..{}]", item.name, item.start, item.end))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  lane {idx}: {names}\n"));
    }
    out
}

fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    for column in snapshot.columns() {
        out.push_str(&format!("{} ({})\n", column.label, column.items.len()));
        for item in column.items {
            out.push_str(&format!("  - {} {}\n", item.id, item.name));
        }
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show all items\n  lanes                              Show timeline lanes\n  board                              Show items grouped by status column\n  add <start> <end> <name...>        Create an item (dates YYYY-MM-DD)\n  rename <id> <name...>              Rename an item\n  dates <id> <start> <end>           Change an item's dates\n  desc <id> <text...>                Set an item's description\n  delete <id>                        Delete an item\n  shift <id> <days>                  Move an item along the timeline\n  move <id> <status>                 Move an item to another column\n  statuses                           List status columns\n  zoom [in|out|<px>]                 Show or change the zoom level\n  layout                             Show card geometry at the current zoom\n  save <json|csv> <path>             Write items to disk\n  load <json|csv> <path>             Replace items from disk\n  quit|exit                          Exit"
    );
}

fn parse_date(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn parse_id(input: Option<&str>) -> Option<ItemId> {
    input.and_then(|s| s.parse::<ItemId>().ok())
}

fn rest(parts: std::str::SplitWhitespace<'_>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

fn open_board(config: &BoardConfig) -> BoardManager {
    match &config.storage.path {
        Some(path) => BoardManager::load(JsonFileStore::new(path)),
        None => BoardManager::load(KeyedBoardStore::new(
            MemoryStore::new(),
            config.storage.key.as_str(),
        )),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Config error: {err}; using defaults");
            BoardConfig::default()
        }
    };
    let mut zoom = config.initial_zoom().unwrap_or_default();
    let mut board = open_board(&config);

    println!("Timeline Board (CLI) - type 'help' for commands\n");
    println!("{}", render_items(&board.snapshot()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_items(&board.snapshot())),
            "lanes" => print!("{}", render_lanes(&board.snapshot())),
            "board" => print!("{}", render_board(&board.snapshot())),
            "statuses" => {
                for (key, label) in Status::variants() {
                    println!("  {key:<12} {label}");
                }
            }
            "add" => {
                let start = parse_date(parts.next());
                let end = parse_date(parts.next());
                let name = rest(parts);
                let draft = ItemDraft {
                    name,
                    start,
                    end,
                    ..ItemDraft::default()
                };
                match board.create(draft) {
                    Ok(snapshot) => {
                        if let Some(item) = snapshot.items().last() {
                            println!("Created item {}.", item.id);
                        }
                        println!("{}", render_items(&snapshot));
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "rename" | "desc" => {
                let Some(id) = parse_id(parts.next()) else {
                    println!("Usage: {cmd} <id> <text...>");
                    continue;
                };
                let text = rest(parts);
                let patch = if cmd == "rename" {
                    ItemPatch::name(text)
                } else {
                    ItemPatch::description(text)
                };
                match board.update(id, &patch) {
                    Ok(snapshot) => println!("Updated item {id}.\n{}", render_items(&snapshot)),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "dates" => {
                let id = parse_id(parts.next());
                let start = parse_date(parts.next());
                let end = parse_date(parts.next());
                match (id, start, end) {
                    (Some(id), Some(start), Some(end)) => {
                        match board.update(id, &ItemPatch::dates(start, end)) {
                            Ok(snapshot) => {
                                println!("Updated item {id}.\n{}", render_items(&snapshot))
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: dates <id> <YYYY-MM-DD> <YYYY-MM-DD>"),
                }
            }
            "delete" => match parse_id(parts.next()) {
                Some(id) => {
                    let existed = board.find(id).is_some();
                    let snapshot = board.delete(id);
                    if existed {
                        println!("Deleted item {id}.");
                    } else {
                        println!("Item {id} not found.");
                    }
                    println!("{}", render_items(&snapshot));
                }
                None => println!("Usage: delete <id>"),
            },
            "shift" => {
                let id = parse_id(parts.next());
                let days = parts.next().and_then(|s| s.parse::<i64>().ok());
                match (id, days) {
                    (Some(id), Some(days)) => match board.shift(id, days) {
                        Ok(snapshot) => {
                            println!("Shifted item {id} by {days} days.\n{}", render_items(&snapshot))
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    _ => println!("Usage: shift <id> <days>"),
                }
            }
            "move" => {
                let id = parse_id(parts.next());
                let status = parts.next().map(str::parse::<Status>);
                match (id, status) {
                    (Some(id), Some(Ok(status))) => {
                        let snapshot = board.reclassify(id, status);
                        println!("Moved item {id} to {}.", status.label());
                        print!("{}", render_board(&snapshot));
                    }
                    (_, Some(Err(e))) => println!("Error: {e}"),
                    _ => println!("Usage: move <id> <status>"),
                }
            }
            "zoom" => {
                match parts.next() {
                    Some("in") => zoom = zoom.zoom_in(&config.zoom),
                    Some("out") => zoom = zoom.zoom_out(&config.zoom),
                    Some(other) => match other.parse::<f64>().map(Zoom::new) {
                        Ok(Ok(value)) => zoom = value,
                        _ => {
                            println!("Usage: zoom [in|out|<pixels-per-day>]");
                            continue;
                        }
                    },
                    None => {}
                }
                println!("Zoom: {} px/day", zoom.pixels_per_day());
            }
            "layout" => {
                let snapshot = board.snapshot();
                let layout =
                    layout_timeline(snapshot.lanes(), &snapshot.bounds(), zoom, &config.layout);
                println!(
                    "Canvas {}x{} px at {} px/day",
                    layout.canvas_width,
                    layout.canvas_height,
                    zoom.pixels_per_day()
                );
                let rows: Vec<Vec<String>> = layout
                    .cards
                    .iter()
                    .map(|card| {
                        vec![
                            card.item_id.to_string(),
                            card.lane.to_string(),
                            card.top_pixels.to_string(),
                            card.geometry.offset_pixels.to_string(),
                            card.geometry.width_pixels.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_text_table(&["id", "lane", "top", "left", "width"], &rows)
                );
            }
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                let (Some(fmt), Some(path)) = (fmt, path) else {
                    println!("Usage: save <json|csv> <path>");
                    continue;
                };
                let res = match fmt {
                    "json" => save_items_to_json(board.items(), path),
                    "csv" => save_items_to_csv(board.items(), path),
                    _ => {
                        println!("Unknown format '{fmt}'");
                        continue;
                    }
                };
                match res {
                    Ok(()) => println!("Items saved to {path}."),
                    Err(e) => println!("Save error: {e}"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                let (Some(fmt), Some(path)) = (fmt, path) else {
                    println!("Usage: load <json|csv> <path>");
                    continue;
                };
                let loaded = match fmt {
                    "json" => load_items_from_json(path),
                    "csv" => load_items_from_csv(path),
                    _ => {
                        println!("Unknown format '{fmt}'");
                        continue;
                    }
                };
                match loaded.map(|items| board.replace_all(items)) {
                    Ok(Ok(snapshot)) => {
                        println!("Items loaded from {path}.\n{}", render_items(&snapshot))
                    }
                    Ok(Err(e)) => println!("Load error: {e}"),
                    Err(e) => println!("Load error: {e}"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
