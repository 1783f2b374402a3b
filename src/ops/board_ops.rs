use crate::id::IdGenerator;
use crate::model::board::{Board, BoardCollection, UNTITLED_BOARD_TITLE, clamp_opacity};

use super::{BoardError, clean_color, clean_title};

// ---------------------------------------------------------------------------
// Board lifecycle
// ---------------------------------------------------------------------------

/// Add a board seeded with the standard lists and make it active.
/// An empty title falls back to "Untitled Board". Returns the new board id.
pub fn add_board(collection: &mut BoardCollection, ids: &mut IdGenerator, title: &str) -> String {
    let title = clean_title(title).unwrap_or_else(|_| UNTITLED_BOARD_TITLE.to_string());
    let id = ids.next_id();
    let board = Board::with_default_lists(id.clone(), title, &mut || ids.next_id());
    collection.boards.push(board);
    collection.active_board_id = id.clone();
    id
}

/// Rename a board. An empty title leaves the previous one in place.
pub fn rename_board(
    collection: &mut BoardCollection,
    board_id: &str,
    title: &str,
) -> Result<(), BoardError> {
    let title = clean_title(title)?;
    let board = collection
        .board_mut(board_id)
        .ok_or_else(|| BoardError::BoardNotFound(board_id.to_string()))?;
    board.title = title;
    Ok(())
}

/// Delete a board. Refused when it is the only one left.
/// If the active board goes, the first remaining board becomes active.
pub fn delete_board(collection: &mut BoardCollection, board_id: &str) -> Result<(), BoardError> {
    let idx = collection
        .boards
        .iter()
        .position(|b| b.id == board_id)
        .ok_or_else(|| BoardError::BoardNotFound(board_id.to_string()))?;
    if collection.boards.len() == 1 {
        return Err(BoardError::LastBoard);
    }
    collection.boards.remove(idx);
    if collection.active_board_id == board_id {
        collection.active_board_id = collection.boards[0].id.clone();
    }
    Ok(())
}

/// Switch the active board
pub fn set_active_board(collection: &mut BoardCollection, board_id: &str) -> Result<(), BoardError> {
    if collection.board(board_id).is_none() {
        return Err(BoardError::BoardNotFound(board_id.to_string()));
    }
    collection.active_board_id = board_id.to_string();
    Ok(())
}

/// Remove every list (and so every card) from a board
pub fn clear_board(board: &mut Board) {
    board.lists.clear();
}

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

/// Set or clear the background image (URL or data URI)
pub fn set_background_image(board: &mut Board, image: Option<&str>) {
    board.background_image = image
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
}

/// Set or clear the background color
pub fn set_background_color(board: &mut Board, color: Option<&str>) -> Result<(), BoardError> {
    board.background_color = color.map(clean_color).transpose()?;
    Ok(())
}

/// Set list opacity, clamped to [0, 1]. Returns the value stored.
pub fn set_list_opacity(board: &mut Board, opacity: f64) -> f64 {
    board.list_opacity = clamp_opacity(opacity);
    board.list_opacity
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
