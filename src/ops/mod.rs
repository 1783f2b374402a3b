//! Mutations over the board model.
//!
//! Every function here validates before it touches anything: when one
//! returns `Err`, the model is exactly as it was. The application context
//! relies on this to decide whether to keep an undo snapshot.

pub mod board_ops;
pub mod card_ops;
pub mod list_ops;
pub mod move_ops;
pub mod sort;

/// Error type for board, list and card operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board not found: {0}")]
    BoardNotFound(String),
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("card not found: {0}")]
    CardNotFound(String),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("cannot delete the last board")]
    LastBoard,
    #[error("the done list cannot be renamed")]
    DoneListLocked,
    #[error("the done list cannot be moved")]
    DoneListPinned,
    #[error("invalid due date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("invalid color (expected #rgb or #rrggbb): {0}")]
    InvalidColor(String),
    #[error("nothing to change")]
    Unchanged,
}

impl BoardError {
    /// Stale ids and no-op requests: benign races between UI and model,
    /// never shown to the user.
    pub fn is_stale_reference(&self) -> bool {
        matches!(
            self,
            BoardError::BoardNotFound(_)
                | BoardError::ListNotFound(_)
                | BoardError::CardNotFound(_)
                | BoardError::Unchanged
        )
    }
}

/// Trim a user-supplied title, rejecting one that is empty afterwards
pub(crate) fn clean_title(title: &str) -> Result<String, BoardError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(BoardError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Accept `#rgb` or `#rrggbb`, normalized to lowercase
pub(crate) fn clean_color(color: &str) -> Result<String, BoardError> {
    let color = color.trim();
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(color.to_ascii_lowercase())
    } else {
        Err(BoardError::InvalidColor(color.to_string()))
    }
}
