use crate::id::IdGenerator;
use crate::model::board::Board;
use crate::model::list::{DONE_LIST_TITLE, List, clamp_width};

use super::{BoardError, clean_color, clean_title};

/// Add a list. It goes just before the pinned "done" list when there is
/// one, otherwise at the end. Returns the new list id.
pub fn add_list(board: &mut Board, ids: &mut IdGenerator, title: &str) -> Result<String, BoardError> {
    let title = clean_title(title)?;
    let list = List::new(ids.next_id(), title);
    let id = list.id.clone();
    match board.done_list_index() {
        Some(done) => board.lists.insert(done, list),
        None => board.lists.push(list),
    }
    Ok(id)
}

/// Rename a list. The "done" list keeps its title.
pub fn rename_list(board: &mut Board, list_id: &str, title: &str) -> Result<(), BoardError> {
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    if list.is_done() {
        return Err(BoardError::DoneListLocked);
    }
    list.title = clean_title(title)?;
    Ok(())
}

/// Delete a list together with its cards. Returns the removed list.
pub fn delete_list(board: &mut Board, list_id: &str) -> Result<List, BoardError> {
    let idx = board
        .list_index(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    Ok(board.lists.remove(idx))
}

/// Set or clear a list's color
pub fn set_list_color(board: &mut Board, list_id: &str, color: Option<&str>) -> Result<(), BoardError> {
    let color = color.map(clean_color).transpose()?;
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    list.color = color;
    Ok(())
}

/// Set or reset a list's pixel width. Widths are clamped to the allowed
/// range; returns what was stored.
pub fn set_list_width(board: &mut Board, list_id: &str, width: Option<u32>) -> Result<Option<u32>, BoardError> {
    let list = board
        .list_mut(list_id)
        .ok_or_else(|| BoardError::ListNotFound(list_id.to_string()))?;
    list.width = width.map(clamp_width);
    Ok(list.width)
}

/// Index of the "done" list, creating it at the end of the board if missing
pub fn ensure_done_list(board: &mut Board, ids: &mut IdGenerator) -> usize {
    if let Some(idx) = board.done_list_index() {
        return idx;
    }
    board
        .lists
        .push(List::new(ids.next_id(), DONE_LIST_TITLE.to_string()));
    board.lists.len() - 1
}
