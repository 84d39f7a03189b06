//! Common test fixtures and helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gridstate::source::StateStore;
use gridstate::{Column, GridEngine, GridOptions, Row};
use serde_json::json;

/// A small, varied record set: stable ids, duplicate ages and cities,
/// a null city, and a tags list.
pub fn people() -> Vec<serde_json::Value> {
    vec![
        json!({"id": 1, "name": "Ada Lovelace", "age": 36, "city": "London", "tags": ["math"]}),
        json!({"id": 2, "name": "Alan Turing", "age": 41, "city": "London", "tags": ["math", "crypto"]}),
        json!({"id": 3, "name": "Grace Hopper", "age": 85, "city": "New York", "tags": ["navy"]}),
        json!({"id": 4, "name": "Edsger Dijkstra", "age": 72, "city": "Austin", "tags": []}),
        json!({"id": 5, "name": "Barbara Liskov", "age": 36, "city": null, "tags": ["types"]}),
        json!({"id": 6, "name": "Donald Knuth", "age": 87, "city": "Stanford", "tags": ["tex"]}),
        json!({"id": 7, "name": "anita borg", "age": 54, "city": "Palo Alto", "tags": []}),
    ]
}

pub fn people_columns() -> Vec<Column<serde_json::Value>> {
    vec![
        Column::new("id").header("ID"),
        Column::new("name").header("Name"),
        Column::new("age").header("Age"),
        Column::new("city").header("City"),
        Column::new("tags").header("Tags"),
    ]
}

/// Engine over the people fixture with the given options.
pub fn people_engine(options: GridOptions) -> GridEngine<serde_json::Value> {
    let mut engine = GridEngine::new();
    engine.initialize(people(), people_columns(), options);
    engine
}

/// Tie-break records: two rows share age 25.
pub fn tie_records() -> Vec<serde_json::Value> {
    vec![
        json!({"id": 1, "age": 30}),
        json!({"id": 2, "age": 25}),
        json!({"id": 3, "age": 25}),
    ]
}

/// Extract the `id` field of each row as i64, in order.
pub fn ids(rows: &[Row<serde_json::Value>]) -> Vec<i64> {
    rows.iter()
        .map(|r| r.record["id"].as_i64().unwrap())
        .collect()
}

/// Extract the `name` field of each row, in order.
pub fn names(rows: &[Row<serde_json::Value>]) -> Vec<String> {
    rows.iter()
        .map(|r| r.record["name"].as_str().unwrap().to_string())
        .collect()
}

/// In-memory snapshot store; clone the handle to inspect saved state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: Rc<RefCell<HashMap<String, String>>>,
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, snapshot: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), snapshot.to_string());
    }
}
