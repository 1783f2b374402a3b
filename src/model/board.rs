use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::list::{DONE_LIST_TITLE, List};

/// Title of the board seeded into an empty collection
pub const DEFAULT_BOARD_TITLE: &str = "Default Board";

/// Title given to a new board created without one
pub const UNTITLED_BOARD_TITLE: &str = "Untitled Board";

/// Default alpha applied to list backgrounds
pub const DEFAULT_LIST_OPACITY: f64 = 0.4;

/// Lists every new board starts with
pub const SEED_LIST_TITLES: [&str; 3] = ["To-do", "In Progress", DONE_LIST_TITLE];

fn default_list_opacity() -> f64 {
    DEFAULT_LIST_OPACITY
}

/// Clamp an opacity into [0, 1]; NaN falls back to the default
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        DEFAULT_LIST_OPACITY
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// A board: an ordered sequence of lists plus its appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    /// URL or data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default = "default_list_opacity")]
    pub list_opacity: f64,
    #[serde(default)]
    pub lists: Vec<List>,
}

impl Board {
    /// An empty board with no lists
    pub fn new(id: String, title: String) -> Self {
        Board {
            id,
            title,
            background_image: None,
            background_color: None,
            list_opacity: DEFAULT_LIST_OPACITY,
            lists: Vec::new(),
        }
    }

    /// A board with the standard To-do / In Progress / Done lists
    pub fn with_default_lists(
        id: String,
        title: String,
        next_id: &mut dyn FnMut() -> String,
    ) -> Self {
        let mut board = Board::new(id, title);
        board.lists = SEED_LIST_TITLES
            .iter()
            .map(|t| List::new(next_id(), t.to_string()))
            .collect();
        board
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn list_mut(&mut self, list_id: &str) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    pub fn list_index(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    /// Index of the first pinned "done" list
    pub fn done_list_index(&self) -> Option<usize> {
        self.lists.iter().position(List::is_done)
    }

    /// Index of the first list that is not a "done" list
    pub fn first_open_list_index(&self) -> Option<usize> {
        self.lists.iter().position(|l| !l.is_done())
    }

    /// Locate a card anywhere on the board: (list index, card index)
    pub fn find_card(&self, card_id: &str) -> Option<(usize, usize)> {
        self.lists
            .iter()
            .enumerate()
            .find_map(|(li, l)| l.card_index(card_id).map(|ci| (li, ci)))
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }

    /// Lists in display order: everything else first, "done" lists last.
    pub fn render_order(&self) -> impl Iterator<Item = &List> {
        self.lists
            .iter()
            .filter(|l| !l.is_done())
            .chain(self.lists.iter().filter(|l| l.is_done()))
    }

    /// Drop cards whose id already appeared earlier on this board.
    /// Returns the number of cards removed.
    fn dedup_cards(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut removed = 0;
        for list in &mut self.lists {
            let before = list.cards.len();
            list.cards.retain(|c| seen.insert(c.id.clone()));
            removed += before - list.cards.len();
        }
        removed
    }
}

/// Wire shape of a collection, before normalization
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionDoc {
    #[serde(default)]
    boards: Vec<Board>,
    #[serde(default)]
    active_board_id: Option<String>,
}

/// Every board the user has, plus which one is showing.
///
/// Never empty, and `active_board_id` always names a member; both are
/// restored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CollectionDoc")]
pub struct BoardCollection {
    pub(crate) boards: Vec<Board>,
    pub(crate) active_board_id: String,
}

impl From<CollectionDoc> for BoardCollection {
    fn from(doc: CollectionDoc) -> Self {
        let mut collection = BoardCollection {
            boards: doc.boards,
            active_board_id: doc.active_board_id.unwrap_or_default(),
        };
        collection.normalize(&mut crate::id::new_id);
        collection
    }
}

impl BoardCollection {
    /// A collection holding a single board, which is active
    pub fn new(board: Board) -> Self {
        BoardCollection {
            active_board_id: board.id.clone(),
            boards: vec![board],
        }
    }

    /// A collection holding the standard "Default Board"
    pub fn seeded(next_id: &mut dyn FnMut() -> String) -> Self {
        let id = next_id();
        BoardCollection::new(Board::with_default_lists(
            id,
            DEFAULT_BOARD_TITLE.to_string(),
            next_id,
        ))
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn active_board_id(&self) -> &str {
        &self.active_board_id
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    pub fn board_mut(&mut self, board_id: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == board_id)
    }

    fn active_index(&self) -> usize {
        self.boards
            .iter()
            .position(|b| b.id == self.active_board_id)
            .unwrap_or(0)
    }

    /// The active board. Falls back to the first board if the reference dangles.
    pub fn active_board(&self) -> &Board {
        &self.boards[self.active_index()]
    }

    pub fn active_board_mut(&mut self) -> &mut Board {
        let idx = self.active_index();
        &mut self.boards[idx]
    }

    /// Re-point a dangling active reference: prefer the board titled
    /// "Default Board", else the first board.
    pub(crate) fn heal_active(&mut self) {
        if self.board(&self.active_board_id).is_some() {
            return;
        }
        let fallback = self
            .boards
            .iter()
            .find(|b| b.title == DEFAULT_BOARD_TITLE)
            .or_else(|| self.boards.first())
            .map(|b| b.id.clone());
        if let Some(id) = fallback {
            warn!(stale = %self.active_board_id, active = %id, "active board reference repaired");
            self.active_board_id = id;
        }
    }

    /// Restore invariants on data that came from storage.
    pub(crate) fn normalize(&mut self, next_id: &mut dyn FnMut() -> String) {
        if self.boards.is_empty() {
            warn!("stored collection had no boards; seeding default board");
            let id = next_id();
            self.boards.push(Board::with_default_lists(
                id,
                DEFAULT_BOARD_TITLE.to_string(),
                next_id,
            ));
        }
        for board in &mut self.boards {
            board.list_opacity = clamp_opacity(board.list_opacity);
            let dropped = board.dedup_cards();
            if dropped > 0 {
                warn!(board_id = %board.id, dropped, "dropped cards with duplicate ids");
            }
        }
        self.heal_active();
    }
}
