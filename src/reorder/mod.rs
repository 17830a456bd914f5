use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gap between neighbouring sort orders, leaving room for later inserts.
pub const SORT_ORDER_STEP: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("index {index} out of range for list of {len}")]
    OutOfRange { index: usize, len: usize },
}

pub type ReorderResult<T> = std::result::Result<T, ReorderError>;

/// Moves the item at `from` so that it ends up at `to`.
///
/// This is a move, not a swap: items between the two positions shift by one.
/// Both indices are checked first, so an error leaves `items` untouched.
pub fn reorder<T>(items: &mut [T], from: usize, to: usize) -> ReorderResult<()> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfRange { index, len });
        }
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
    Ok(())
}

pub fn sparse_sort_order(index: usize) -> i64 {
    let position = i64::try_from(index).unwrap_or(i64::MAX / SORT_ORDER_STEP - 1);
    position.saturating_add(1).saturating_mul(SORT_ORDER_STEP)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderUpdate {
    pub id: String,
    pub sort_order: i64,
}

/// Body of a batch reorder request: the full list, in its new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReorderBatch {
    pub items: Vec<SortOrderUpdate>,
}

impl ReorderBatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Items that carry an id and a persisted sort order.
pub trait Sortable {
    fn id(&self) -> &str;
    fn sort_order(&self) -> i64;
    fn set_sort_order(&mut self, sort_order: i64);
}

/// Renumbers `items` in place with sparse sort orders.
pub fn renumber<T: Sortable>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_sort_order(sparse_sort_order(index));
    }
}

pub fn batch_for<T: Sortable>(items: &[T]) -> ReorderBatch {
    ReorderBatch {
        items: items
            .iter()
            .map(|item| SortOrderUpdate {
                id: item.id().to_string(),
                sort_order: item.sort_order(),
            })
            .collect(),
    }
}

/// Moves one item, renumbers the list and returns the batch that persists it.
pub fn move_and_renumber<T: Sortable>(
    items: &mut [T],
    from: usize,
    to: usize,
) -> ReorderResult<ReorderBatch> {
    reorder(items, from, to)?;
    renumber(items);
    tracing::debug!(from, to, len = items.len(), "list reordered");
    Ok(batch_for(items))
}
