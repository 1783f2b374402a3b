use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::board::Board;
use crate::model::card::{Card, Priority};

use super::BoardError;

/// How to order the cards of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Case-insensitive by name
    Alphabetical,
    /// Earliest due date first; undated cards last
    ByDueDate,
    /// High → medium → low → none, then by name
    ByPriority,
}

/// Sort a list's cards in place. All sorts are stable.
pub fn sort_cards(board: &mut Board, list_id: &str, mode: SortMode) -> Result<(), BoardError> {
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    sort_in_place(&mut list.cards, mode);
    Ok(())
}

pub fn sort_in_place(cards: &mut [Card], mode: SortMode) {
    match mode {
        SortMode::Alphabetical => cards.sort_by_cached_key(|c| c.name.to_lowercase()),
        SortMode::ByDueDate => cards.sort_by(compare_due),
        SortMode::ByPriority => cards.sort_by(|a, b| {
            Priority::rank(b.priority)
                .cmp(&Priority::rank(a.priority))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
    }
}

fn compare_due(a: &Card, b: &Card) -> Ordering {
    match (a.due_date(), b.due_date()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
