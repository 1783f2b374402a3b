use crate::model::board::Board;

use super::BoardError;

/// Move a card from one list to another (or within one list).
///
/// The card lands just before `before_card_id` in the destination, or at
/// the end when that is absent or not found there. Every other card keeps
/// its relative order. Asking to move a card to its own list with no
/// target position is a no-op and reported as `Unchanged`.
pub fn move_card(
    board: &mut Board,
    card_id: &str,
    source_list_id: &str,
    dest_list_id: &str,
    before_card_id: Option<&str>,
) -> Result<(), BoardError> {
    if source_list_id == dest_list_id && before_card_id.is_none() {
        return Err(BoardError::Unchanged);
    }
    let src = board
        .list_index(source_list_id)
        .ok_or_else(|| BoardError::ListNotFound(source_list_id.to_string()))?;
    let dest = board
        .list_index(dest_list_id)
        .ok_or_else(|| BoardError::ListNotFound(dest_list_id.to_string()))?;
    let idx = board.lists[src]
        .card_index(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;

    let card = board.lists[src].cards.remove(idx);
    let cards = &mut board.lists[dest].cards;
    let at = before_card_id
        .and_then(|before| cards.iter().position(|c| c.id == before))
        .unwrap_or(cards.len());
    cards.insert(at, card);
    Ok(())
}

/// Move a card to the end of another list by index. Caller has checked both
/// indices.
pub(crate) fn transfer_card(board: &mut Board, src: usize, card_idx: usize, dest: usize) {
    if src == dest {
        return;
    }
    let card = board.lists[src].cards.remove(card_idx);
    board.lists[dest].cards.push(card);
}

/// Reorder lists by drag: put `dragged_list_id` where `target_list_id` is.
///
/// The pinned "done" list cannot be dragged, and nothing can be dropped at
/// or after it: a target at or past the done list, or a target that does
/// not resolve, lands the list just before done (or at the end when there
/// is no done list).
pub fn move_list(board: &mut Board, dragged_list_id: &str, target_list_id: &str) -> Result<(), BoardError> {
    let idx = board
        .list_index(dragged_list_id)
        .ok_or_else(|| BoardError::ListNotFound(dragged_list_id.to_string()))?;
    if board.lists[idx].is_done() {
        return Err(BoardError::DoneListPinned);
    }

    let list = board.lists.remove(idx);
    let done = board.done_list_index();
    let mut at = board
        .list_index(target_list_id)
        .unwrap_or_else(|| done.unwrap_or(board.lists.len()));
    if let Some(done) = done
        && at >= done
    {
        at = done;
    }
    board.lists.insert(at, list);
    Ok(())
}
