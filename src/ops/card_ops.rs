use chrono::NaiveDate;

use crate::id::IdGenerator;
use crate::model::board::Board;
use crate::model::card::{Card, DUE_DATE_FORMAT, Priority};

use super::list_ops::ensure_done_list;
use super::move_ops::transfer_card;
use super::{BoardError, clean_title};

/// Result of toggling a card's completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Card moved to the done list; the UI celebrates
    Completed,
    /// Card went back to an active list
    Reopened,
}

// ---------------------------------------------------------------------------
// Card CRUD
// ---------------------------------------------------------------------------

/// Append a new card to a list. Returns the new card id.
pub fn add_card(
    board: &mut Board,
    ids: &mut IdGenerator,
    list_id: &str,
    name: &str,
) -> Result<String, BoardError> {
    let name = clean_title(name)?;
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    let card = Card::new(ids.next_id(), name);
    let id = card.id.clone();
    list.cards.push(card);
    Ok(id)
}

/// Rename a card. An empty name leaves the previous one in place.
pub fn rename_card(board: &mut Board, list_id: &str, card_id: &str, name: &str) -> Result<(), BoardError> {
    let name = clean_title(name)?;
    find_card_mut(board, list_id, card_id)?.name = name;
    Ok(())
}

/// Delete a card. Returns the removed card.
pub fn delete_card(board: &mut Board, list_id: &str, card_id: &str) -> Result<Card, BoardError> {
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    let idx = list
        .card_index(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;
    Ok(list.cards.remove(idx))
}

// ---------------------------------------------------------------------------
// Card fields
// ---------------------------------------------------------------------------

/// Set (`YYYY-MM-DD`) or clear a card's due date
pub fn set_due(board: &mut Board, list_id: &str, card_id: &str, due: Option<&str>) -> Result<(), BoardError> {
    let due = match due.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => {
            let date = NaiveDate::parse_from_str(d, DUE_DATE_FORMAT)
                .map_err(|_| BoardError::InvalidDate(d.to_string()))?;
            Some(date.format(DUE_DATE_FORMAT).to_string())
        }
        None => None,
    };
    find_card_mut(board, list_id, card_id)?.due = due;
    Ok(())
}

pub fn set_priority(
    board: &mut Board,
    list_id: &str,
    card_id: &str,
    priority: Option<Priority>,
) -> Result<(), BoardError> {
    find_card_mut(board, list_id, card_id)?.priority = priority;
    Ok(())
}

/// Step the priority none → low → medium → high → none. Returns the new value.
pub fn cycle_priority(board: &mut Board, list_id: &str, card_id: &str) -> Result<Option<Priority>, BoardError> {
    let card = find_card_mut(board, list_id, card_id)?;
    card.priority = Priority::cycle(card.priority);
    Ok(card.priority)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Toggle a card between active and completed.
///
/// Completing remembers the card's list and moves it to the end of the
/// "done" list, creating that list if the board has none. Reopening moves
/// it back to the remembered list, or to the first list that is not a
/// "done" list when the remembered one is gone. With no such list the card
/// is reopened where it sits.
pub fn toggle_complete(board: &mut Board, ids: &mut IdGenerator, card_id: &str) -> Result<Toggle, BoardError> {
    let (li, ci) = board
        .find_card(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;

    if board.lists[li].cards[ci].completed {
        let previous = board.lists[li].cards[ci].previous_list_id.take();
        board.lists[li].cards[ci].completed = false;
        let dest = previous
            .as_deref()
            .and_then(|id| board.list_index(id))
            .filter(|&i| !board.lists[i].is_done())
            .or_else(|| board.first_open_list_index());
        if let Some(dest) = dest {
            transfer_card(board, li, ci, dest);
        }
        Ok(Toggle::Reopened)
    } else {
        let list_id = board.lists[li].id.clone();
        let card = &mut board.lists[li].cards[ci];
        card.previous_list_id = Some(list_id);
        card.completed = true;
        let done = ensure_done_list(board, ids);
        transfer_card(board, li, ci, done);
        Ok(Toggle::Completed)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn find_card_mut<'a>(board: &'a mut Board, list_id: &str, card_id: &str) -> Result<&'a mut Card, BoardError> {
    board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?
        .card_mut(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
