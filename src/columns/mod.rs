//! Column layout management: order, widths, visibility, locking, groups.
//!
//! Independent of row data — the manager owns column definitions plus
//! layout state and composes them into derived views (`ordered_columns`,
//! `visible_columns`, lock partitions, group buckets). Unknown column ids
//! in mutating calls are silent no-ops, matching the crate's UI-race
//! policy.

mod groups;

pub use groups::ColumnGroup;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Column;

/// Padding added on top of a measured width by `auto_size`.
const AUTO_SIZE_PADDING: f32 = 16.0;
/// Per-character estimate when auto-sizing from the header text.
const HEADER_CHAR_WIDTH: f32 = 8.0;
/// Floor for estimated widths.
const MIN_AUTO_WIDTH: f32 = 60.0;

/// Which edge a column is pinned to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LockSide {
    Left,
    Right,
}

/// Emitted by reorder operations, one per column whose position actually
/// changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEvent {
    Moved { id: String, from: usize, to: usize },
    Removed { id: String },
    Resized { id: String, width: f32 },
}

/// Visible columns partitioned by lock membership, in display order.
#[derive(Debug)]
pub struct ColumnPartition<'a, T> {
    pub left: Vec<&'a Column<T>>,
    pub center: Vec<&'a Column<T>>,
    pub right: Vec<&'a Column<T>>,
}

/// One rendered header bucket: a group's visible members, or the trailing
/// ungrouped columns (`group` is `None`).
#[derive(Debug)]
pub struct GroupBucket<'a, T> {
    pub group: Option<&'a ColumnGroup>,
    pub columns: Vec<&'a Column<T>>,
}

/// Owns column definitions and layout state.
#[derive(Debug)]
pub struct ColumnManager<T> {
    columns: Vec<Column<T>>,
    /// Display order by id; columns absent from the list render after it.
    order: Vec<String>,
    widths: HashMap<String, f32>,
    locked_left: Vec<String>,
    locked_right: Vec<String>,
    hidden: HashSet<String>,
    groups: Vec<ColumnGroup>,
}

impl<T> Default for ColumnManager<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ColumnManager<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            order: Vec::new(),
            widths: HashMap::new(),
            locked_left: Vec::new(),
            locked_right: Vec::new(),
            hidden: HashSet::new(),
            groups: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn has_column(&self, id: &str) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    /// Append a new column. It renders after the ordered ones until a
    /// reorder places it.
    pub fn add_column(&mut self, column: Column<T>) {
        if !self.has_column(&column.id) {
            self.columns.push(column);
        }
    }

    /// Remove a column and purge it from order, widths, locks, the hidden
    /// set, and any group's member list.
    pub fn remove_column(&mut self, id: &str) -> Option<ColumnEvent> {
        if !self.has_column(id) {
            return None;
        }
        self.columns.retain(|c| c.id != id);
        self.order.retain(|o| o != id);
        self.widths.remove(id);
        self.locked_left.retain(|o| o != id);
        self.locked_right.retain(|o| o != id);
        self.hidden.remove(id);
        for group in &mut self.groups {
            group.children.retain(|c| c != id);
        }
        Some(ColumnEvent::Removed { id: id.to_string() })
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    /// Ids in effective display order: the order list first, then any
    /// column missing from it, in definition order.
    fn ordered_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .order
            .iter()
            .filter(|id| self.has_column(id))
            .map(String::as_str)
            .collect();
        for col in &self.columns {
            if !ids.contains(&col.id.as_str()) {
                ids.push(&col.id);
            }
        }
        ids
    }

    /// Columns in effective display order.
    pub fn ordered_columns(&self) -> Vec<&Column<T>> {
        self.ordered_ids()
            .iter()
            .filter_map(|id| self.column(id))
            .collect()
    }

    /// Ordered columns minus the hidden set and per-column hidden flags.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.ordered_columns()
            .into_iter()
            .filter(|c| !c.hidden && !self.hidden.contains(&c.id))
            .collect()
    }

    /// Visible columns split by lock membership.
    pub fn partition(&self) -> ColumnPartition<'_, T> {
        let mut partition = ColumnPartition {
            left: Vec::new(),
            center: Vec::new(),
            right: Vec::new(),
        };
        for col in self.visible_columns() {
            if self.locked_left.contains(&col.id) {
                partition.left.push(col);
            } else if self.locked_right.contains(&col.id) {
                partition.right.push(col);
            } else {
                partition.center.push(col);
            }
        }
        partition
    }

    // -------------------------------------------------------------------------
    // Ordering
    // -------------------------------------------------------------------------

    /// Apply a new display order. Every id in `new_order` must exist or
    /// the call is ignored; existing ids missing from it keep their
    /// relative order after the validated prefix. Returns one `Moved`
    /// event per column whose position actually changed.
    pub fn reorder(&mut self, new_order: &[String]) -> Vec<ColumnEvent> {
        if new_order.iter().any(|id| !self.has_column(id)) {
            return Vec::new();
        }
        let before: Vec<String> = self.ordered_ids().iter().map(|s| (*s).to_string()).collect();

        let mut next: Vec<String> = new_order.to_vec();
        for id in &before {
            if !next.contains(id) {
                next.push(id.clone());
            }
        }
        self.order = next;

        let after = self.ordered_ids();
        before
            .iter()
            .enumerate()
            .filter_map(|(from, id)| {
                let to = after.iter().position(|a| a == id)?;
                (to != from).then(|| ColumnEvent::Moved {
                    id: id.clone(),
                    from,
                    to,
                })
            })
            .collect()
    }

    /// Splice-move one column to a new index. No-op when the id is
    /// unknown or already at `new_index`.
    pub fn move_column(&mut self, id: &str, new_index: usize) -> Option<ColumnEvent> {
        let current: Vec<String> = self.ordered_ids().iter().map(|s| (*s).to_string()).collect();
        let from = current.iter().position(|c| c == id)?;
        let to = new_index.min(current.len().saturating_sub(1));
        if from == to {
            return None;
        }
        let mut next = current;
        let moved = next.remove(from);
        next.insert(to, moved);
        self.order = next;
        Some(ColumnEvent::Moved {
            id: id.to_string(),
            from,
            to,
        })
    }

    // -------------------------------------------------------------------------
    // Widths
    // -------------------------------------------------------------------------

    pub fn width(&self, id: &str) -> Option<f32> {
        self.widths
            .get(id)
            .copied()
            .or_else(|| self.column(id).and_then(|c| c.width))
    }

    pub fn set_width(&mut self, id: &str, width: f32) -> Option<ColumnEvent> {
        if !self.has_column(id) {
            return None;
        }
        self.widths.insert(id.to_string(), width);
        Some(ColumnEvent::Resized {
            id: id.to_string(),
            width,
        })
    }

    /// Size a column to fit. With a measured content width, pad it; with
    /// none, estimate from the header text with a floor.
    pub fn auto_size(&mut self, id: &str, measured: Option<f32>) -> Option<ColumnEvent> {
        let column = self.column(id)?;
        let width = match measured {
            Some(w) => w + AUTO_SIZE_PADDING,
            None => {
                (column.header.chars().count() as f32 * HEADER_CHAR_WIDTH + AUTO_SIZE_PADDING)
                    .max(MIN_AUTO_WIDTH)
            }
        };
        self.set_width(id, width)
    }

    // -------------------------------------------------------------------------
    // Visibility and locking
    // -------------------------------------------------------------------------

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id) || self.column(id).is_some_and(|c| c.hidden)
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        if !self.has_column(id) {
            return;
        }
        if hidden {
            self.hidden.insert(id.to_string());
        } else {
            self.hidden.remove(id);
        }
    }

    pub fn lock_side(&self, id: &str) -> Option<LockSide> {
        if self.locked_left.iter().any(|o| o == id) {
            Some(LockSide::Left)
        } else if self.locked_right.iter().any(|o| o == id) {
            Some(LockSide::Right)
        } else {
            None
        }
    }

    /// Pin a column to one edge. Locking to one side silently unlocks the
    /// other — a column is never in both lists.
    pub fn lock(&mut self, id: &str, side: LockSide) {
        if !self.has_column(id) {
            return;
        }
        self.locked_left.retain(|o| o != id);
        self.locked_right.retain(|o| o != id);
        match side {
            LockSide::Left => self.locked_left.push(id.to_string()),
            LockSide::Right => self.locked_right.push(id.to_string()),
        }
    }

    pub fn unlock(&mut self, id: &str) {
        self.locked_left.retain(|o| o != id);
        self.locked_right.retain(|o| o != id);
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    pub fn set_groups(&mut self, groups: Vec<ColumnGroup>) {
        self.groups = groups;
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn toggle_group(&mut self, id: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.expanded = !group.expanded;
        }
    }

    /// Visible columns bucketed by group, groups first in declaration
    /// order, then one trailing bucket of ungrouped columns. The first
    /// group whose member list names a column wins it.
    pub fn grouped_columns(&self) -> Vec<GroupBucket<'_, T>> {
        let visible = self.visible_columns();
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut buckets = Vec::new();
        for group in &self.groups {
            let members: Vec<&Column<T>> = visible
                .iter()
                .filter(|c| group.children.iter().any(|m| m == &c.id) && !claimed.contains(c.id.as_str()))
                .copied()
                .collect();
            for col in &members {
                claimed.insert(col.id.as_str());
            }
            buckets.push(GroupBucket {
                group: Some(group),
                columns: members,
            });
        }
        let rest: Vec<&Column<T>> = visible
            .iter()
            .filter(|c| !claimed.contains(c.id.as_str()))
            .copied()
            .collect();
        if !rest.is_empty() {
            buckets.push(GroupBucket {
                group: None,
                columns: rest,
            });
        }
        buckets
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Serialize `{order, widths, lockedLeft, lockedRight, hidden,
    /// groups}`.
    pub fn export_state(&self) -> String {
        let mut hidden: Vec<String> = self.hidden.iter().cloned().collect();
        hidden.sort();
        let snap = ColumnSnapshot {
            order: Some(self.order.clone()),
            widths: Some(self.widths.iter().map(|(k, v)| (k.clone(), *v)).collect()),
            locked_left: Some(self.locked_left.clone()),
            locked_right: Some(self.locked_right.clone()),
            hidden: Some(hidden),
            groups: Some(self.groups.clone()),
        };
        serde_json::to_string(&snap).unwrap_or_else(|e| {
            log::warn!("failed to serialize column snapshot: {e}");
            "{}".to_string()
        })
    }

    /// Restore layout state; malformed input is logged and ignored.
    /// Column definitions themselves are never part of a snapshot.
    pub fn import_state(&mut self, json: &str) {
        if let Err(e) = self.try_import_state(json) {
            log::warn!("ignoring malformed column snapshot: {e}");
        }
    }

    /// Like [`import_state`] but surfaces the parse error.
    ///
    /// [`import_state`]: ColumnManager::import_state
    pub fn try_import_state(&mut self, json: &str) -> Result<()> {
        let snap: ColumnSnapshot = serde_json::from_str(json)?;
        if let Some(order) = snap.order {
            self.order = order;
        }
        if let Some(widths) = snap.widths {
            self.widths = widths.into_iter().collect();
        }
        if let Some(left) = snap.locked_left {
            self.locked_left = left;
        }
        if let Some(right) = snap.locked_right {
            self.locked_right = right;
        }
        // A column can only be on one side; left wins on conflicting input.
        self.locked_right
            .retain(|id| !self.locked_left.contains(id));
        if let Some(hidden) = snap.hidden {
            self.hidden = hidden.into_iter().collect();
        }
        if let Some(groups) = snap.groups {
            self.groups = groups;
        }
        Ok(())
    }
}

/// Serializable column layout state.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// BTreeMap so exports are byte-stable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<BTreeMap<String, f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_left: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_right: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ColumnGroup>>,
}
