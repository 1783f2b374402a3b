use serde::{Deserialize, Serialize};

use super::card::Card;

/// Title of the completion list created on demand
pub const DONE_LIST_TITLE: &str = "Done";

/// Pixel bounds for a list width override
pub const MIN_LIST_WIDTH: u32 = 250;
pub const MAX_LIST_WIDTH: u32 = 600;

/// Whether a list title marks the pinned completion list.
///
/// There is no dedicated flag: any list whose trimmed, lowercased title is
/// `done` is the pinned list. Stored boards depend on this.
pub fn is_done_title(title: &str) -> bool {
    title.trim().eq_ignore_ascii_case("done")
}

/// An ordered column of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(id: String, title: String) -> Self {
        List {
            id,
            title,
            color: None,
            width: None,
            cards: Vec::new(),
        }
    }

    /// Is this the pinned "done" list?
    pub fn is_done(&self) -> bool {
        is_done_title(&self.title)
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn card_index(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// Clamp a requested list width into the allowed range
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_LIST_WIDTH, MAX_LIST_WIDTH)
}
