//! Versioned JSON encoding of the board collection.
//!
//! Documents written by this crate carry `schemaVersion: 2`. Anything
//! without a version is a v1 document written before versioning and is
//! upgraded once, here, before it reaches the typed model.

use serde_json::{Map, Value};
use tracing::info;

use crate::model::board::BoardCollection;
use crate::model::card::Priority;

pub const SCHEMA_VERSION: u64 = 2;
const VERSION_KEY: &str = "schemaVersion";

/// Serialize a collection into a storable document
pub fn encode(collection: &BoardCollection) -> Result<Value, serde_json::Error> {
    let mut doc = serde_json::to_value(collection)?;
    if let Value::Object(map) = &mut doc {
        map.insert(VERSION_KEY.to_string(), Value::from(SCHEMA_VERSION));
    }
    Ok(doc)
}

/// Deserialize a stored document, upgrading older layouts first.
/// The result is normalized (never empty, valid active board).
pub fn decode(mut doc: Value) -> Result<BoardCollection, serde_json::Error> {
    let version = doc.get(VERSION_KEY).and_then(Value::as_u64).unwrap_or(1);
    if version < 2 {
        let upgraded = upgrade_v1(&mut doc);
        info!(from = version, to = SCHEMA_VERSION, cards = upgraded, "upgraded stored boards");
    }
    if let Value::Object(map) = &mut doc {
        map.remove(VERSION_KEY);
    }
    serde_json::from_value(doc)
}

/// v1 → v2: legacy field names and the `important` flag.
/// Returns the number of cards whose `important` flag became a priority.
fn upgrade_v1(doc: &mut Value) -> usize {
    let mut promoted = 0;
    for board in objects_mut(doc, "boards") {
        rename_key(board, "bgImage", "backgroundImage");
        rename_key(board, "bg", "backgroundColor");
        let Some(lists) = board.get_mut("lists") else {
            continue;
        };
        for list in objects_in(lists) {
            let Some(cards) = list.get_mut("cards") else {
                continue;
            };
            for card in objects_in(cards) {
                rename_key(card, "_prevListId", "previousListId");
                drop_blank_due(card);
                if promote_important(card) {
                    promoted += 1;
                }
            }
        }
    }
    promoted
}

/// `important: true` with no priority reads as high priority.
/// The `important` key is dropped either way.
fn promote_important(card: &mut Map<String, Value>) -> bool {
    let Some(important) = card.remove("important") else {
        return false;
    };
    let has_priority = card.get("priority").is_some_and(|p| !p.is_null());
    if important.as_bool() == Some(true) && !has_priority {
        card.insert(
            "priority".to_string(),
            Value::String(Priority::High.to_string()),
        );
        return true;
    }
    false
}

/// Cards used to be created with `due: ""`; absent is the only "no date".
fn drop_blank_due(card: &mut Map<String, Value>) {
    let blank = card
        .get("due")
        .is_some_and(|d| d.is_null() || d.as_str().is_some_and(|s| s.trim().is_empty()));
    if blank {
        card.remove("due");
    }
}

fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = obj.remove(from)
        && !obj.contains_key(to)
        && !value.is_null()
    {
        obj.insert(to.to_string(), value);
    }
}

fn objects_mut<'a>(doc: &'a mut Value, key: &str) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    doc.get_mut(key).into_iter().flat_map(objects_in)
}

fn objects_in(array: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    array
        .as_array_mut()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}
