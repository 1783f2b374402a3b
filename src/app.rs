use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::id::IdGenerator;
use crate::io::adapter::PersistenceAdapter;
use crate::io::store::{StoreError, UserId};
use crate::io::worker::{PersistEvent, PersistenceWorker};
use crate::model::board::{Board, BoardCollection};
use crate::model::card::{Card, Priority};
use crate::model::config::{DefaultsConfig, KanbanConfig};
use crate::ops::card_ops::Toggle;
use crate::ops::sort::SortMode;
use crate::ops::{BoardError, board_ops, card_ops, clean_title, list_ops, move_ops, sort};
use crate::undo::UndoStack;

/// The live board collection and everything that acts on it.
///
/// List and card operations work on the active board. Every undoable call
/// takes a snapshot first and keeps it only if the operation succeeds; a
/// successful change is then handed to the persistence worker. A rejected
/// call leaves the boards, the undo history and storage untouched.
pub struct KanbanApp {
    collection: BoardCollection,
    undo: UndoStack,
    ids: IdGenerator,
    user: Option<UserId>,
    worker: Option<PersistenceWorker>,
    notices: Vec<PersistEvent>,
}

impl KanbanApp {
    /// Load stored boards (migrating local boards to a signed-in user's
    /// remote store on first login) and start the persistence worker.
    ///
    /// A load failure is not fatal: the app starts on a fresh default board
    /// and reports `PersistEvent::LoadFailed` through `poll_persistence()`.
    pub fn start(config: &KanbanConfig, adapter: Arc<PersistenceAdapter>) -> Result<Self, StoreError> {
        crate::logging::init(&config.logging.filter);
        let mut ids = IdGenerator::new();
        let mut notices = Vec::new();

        let (user, loaded) = match adapter.bootstrap() {
            Ok(boot) => (boot.user, boot.collection),
            Err(e) => {
                warn!(error = %e, "could not load boards; starting with defaults");
                notices.push(PersistEvent::LoadFailed { message: e.to_string() });
                (adapter.identify_current_user(), None)
            }
        };
        let collection = match loaded {
            Some(c) => {
                info!(boards = c.boards().len(), user = ?user, "boards loaded");
                c
            }
            None => seeded_collection(&config.defaults, &mut ids),
        };

        let worker = PersistenceWorker::spawn(adapter, user.clone())?;
        Ok(KanbanApp {
            collection,
            undo: UndoStack::new(),
            ids,
            user,
            worker: Some(worker),
            notices,
        })
    }

    /// An app over `collection` that never writes anywhere
    pub fn detached(collection: BoardCollection) -> Self {
        KanbanApp {
            collection,
            undo: UndoStack::new(),
            ids: IdGenerator::new(),
            user: None,
            worker: None,
            notices: Vec::new(),
        }
    }

    /// Flush pending saves and stop the worker.
    /// Returns persistence events not yet polled.
    pub fn shutdown(mut self) -> Vec<PersistEvent> {
        let mut events = std::mem::take(&mut self.notices);
        if let Some(worker) = self.worker.take() {
            events.extend(worker.shutdown());
        }
        info!("kanban app shut down");
        events
    }

    pub fn collection(&self) -> &BoardCollection {
        &self.collection
    }

    pub fn active_board(&self) -> &Board {
        self.collection.active_board()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Persistence outcomes since the last call
    pub fn poll_persistence(&mut self) -> Vec<PersistEvent> {
        let mut events = std::mem::take(&mut self.notices);
        if let Some(worker) = &self.worker {
            events.extend(worker.poll());
        }
        events
    }

    // -----------------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------------

    /// Restore the state before the most recent undoable change.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.collection = snapshot;
        debug!(depth = self.undo.len(), "undo");
        self.persist();
        true
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    // -----------------------------------------------------------------------
    // Boards
    // -----------------------------------------------------------------------

    /// Add a board with the standard lists and switch to it
    pub fn add_board(&mut self, title: &str) -> String {
        let result = self.commit("add_board", |c, ids| Ok(board_ops::add_board(c, ids, title)));
        // add_board cannot fail
        result.unwrap_or_default()
    }

    pub fn rename_board(&mut self, board_id: &str, title: &str) -> Result<(), BoardError> {
        self.commit("rename_board", |c, _| board_ops::rename_board(c, board_id, title))
    }

    pub fn delete_board(&mut self, board_id: &str) -> Result<(), BoardError> {
        self.commit("delete_board", |c, _| board_ops::delete_board(c, board_id))
    }

    /// Remove every list and card from a board
    pub fn clear_board(&mut self, board_id: &str) -> Result<(), BoardError> {
        self.commit("clear_board", |c, _| {
            let board = c
                .board_mut(board_id)
                .ok_or_else(|| BoardError::BoardNotFound(board_id.to_string()))?;
            board_ops::clear_board(board);
            Ok(())
        })
    }

    /// Switch boards. Saved, but not part of the undo history.
    pub fn set_active_board(&mut self, board_id: &str) -> Result<(), BoardError> {
        self.apply_unrecorded("set_active_board", |c| board_ops::set_active_board(c, board_id))
    }

    pub fn set_background_image(&mut self, image: Option<&str>) {
        board_ops::set_background_image(self.collection.active_board_mut(), image);
        debug!(op = "set_background_image", "applied");
        self.persist();
    }

    pub fn set_background_color(&mut self, color: Option<&str>) -> Result<(), BoardError> {
        self.apply_unrecorded("set_background_color", |c| {
            board_ops::set_background_color(c.active_board_mut(), color)
        })
    }

    /// Returns the opacity actually stored
    pub fn set_list_opacity(&mut self, opacity: f64) -> f64 {
        let stored = board_ops::set_list_opacity(self.collection.active_board_mut(), opacity);
        debug!(op = "set_list_opacity", opacity = stored, "applied");
        self.persist();
        stored
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    pub fn add_list(&mut self, title: &str) -> Result<String, BoardError> {
        self.commit_active("add_list", |b, ids| list_ops::add_list(b, ids, title))
    }

    pub fn rename_list(&mut self, list_id: &str, title: &str) -> Result<(), BoardError> {
        self.commit_active("rename_list", |b, _| list_ops::rename_list(b, list_id, title))
    }

    pub fn delete_list(&mut self, list_id: &str) -> Result<(), BoardError> {
        self.commit_active("delete_list", |b, _| list_ops::delete_list(b, list_id).map(drop))
    }

    pub fn set_list_color(&mut self, list_id: &str, color: Option<&str>) -> Result<(), BoardError> {
        self.commit_active("set_list_color", |b, _| list_ops::set_list_color(b, list_id, color))
    }

    pub fn set_list_width(&mut self, list_id: &str, width: Option<u32>) -> Result<Option<u32>, BoardError> {
        self.commit_active("set_list_width", |b, _| list_ops::set_list_width(b, list_id, width))
    }

    /// Drag a list onto another. Returns whether anything moved.
    pub fn move_list(&mut self, dragged_list_id: &str, target_list_id: &str) -> bool {
        self.commit_active("move_list", |b, _| {
            move_ops::move_list(b, dragged_list_id, target_list_id)
        })
        .is_ok()
    }

    /// Returns whether the list was sorted
    pub fn sort_cards(&mut self, list_id: &str, mode: SortMode) -> bool {
        self.commit_active("sort_cards", |b, _| sort::sort_cards(b, list_id, mode))
            .is_ok()
    }

    // -----------------------------------------------------------------------
    // Cards
    // -----------------------------------------------------------------------

    pub fn add_card(&mut self, list_id: &str, name: &str) -> Result<String, BoardError> {
        self.commit_active("add_card", |b, ids| card_ops::add_card(b, ids, list_id, name))
    }

    /// An empty name is rejected and the card keeps its old one
    pub fn rename_card(&mut self, list_id: &str, card_id: &str, name: &str) -> Result<(), BoardError> {
        self.commit_active("rename_card", |b, _| card_ops::rename_card(b, list_id, card_id, name))
    }

    pub fn delete_card(&mut self, list_id: &str, card_id: &str) -> Result<Card, BoardError> {
        self.commit_active("delete_card", |b, _| card_ops::delete_card(b, list_id, card_id))
    }

    pub fn set_due(&mut self, list_id: &str, card_id: &str, due: Option<&str>) -> Result<(), BoardError> {
        self.commit_active("set_due", |b, _| card_ops::set_due(b, list_id, card_id, due))
    }

    pub fn set_priority(
        &mut self,
        list_id: &str,
        card_id: &str,
        priority: Option<Priority>,
    ) -> Result<(), BoardError> {
        self.commit_active("set_priority", |b, _| {
            card_ops::set_priority(b, list_id, card_id, priority)
        })
    }

    pub fn cycle_priority(&mut self, list_id: &str, card_id: &str) -> Result<Option<Priority>, BoardError> {
        self.commit_active("cycle_priority", |b, _| card_ops::cycle_priority(b, list_id, card_id))
    }

    /// Drop a card into a list, before `before_card_id` or at the end.
    /// Returns whether anything moved.
    pub fn move_card(
        &mut self,
        card_id: &str,
        source_list_id: &str,
        dest_list_id: &str,
        before_card_id: Option<&str>,
    ) -> bool {
        self.commit_active("move_card", |b, _| {
            move_ops::move_card(b, card_id, source_list_id, dest_list_id, before_card_id)
        })
        .is_ok()
    }

    /// `None` when the card no longer exists
    pub fn toggle_complete(&mut self, card_id: &str) -> Option<Toggle> {
        self.commit_active("toggle_complete", |b, ids| card_ops::toggle_complete(b, ids, card_id))
            .ok()
    }

    // -----------------------------------------------------------------------
    // Commit path
    // -----------------------------------------------------------------------

    fn commit<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&mut BoardCollection, &mut IdGenerator) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let snapshot = self.collection.clone();
        match apply(&mut self.collection, &mut self.ids) {
            Ok(value) => {
                self.undo.record(snapshot);
                debug!(op, depth = self.undo.len(), "committed");
                self.persist();
                Ok(value)
            }
            Err(e) => {
                log_rejection(op, &e);
                Err(e)
            }
        }
    }

    fn commit_active<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&mut Board, &mut IdGenerator) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        self.commit(op, |c, ids| apply(c.active_board_mut(), ids))
    }

    fn apply_unrecorded<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&mut BoardCollection) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        match apply(&mut self.collection) {
            Ok(value) => {
                debug!(op, "applied");
                self.persist();
                Ok(value)
            }
            Err(e) => {
                log_rejection(op, &e);
                Err(e)
            }
        }
    }

    fn persist(&mut self) {
        let Some(worker) = &mut self.worker else {
            return;
        };
        if let Err(e) = worker.save(self.collection.clone()) {
            warn!(error = %e, "could not queue save");
            self.notices.push(PersistEvent::SaveFailed {
                revision: 0,
                message: e.to_string(),
            });
        }
    }
}

fn log_rejection(op: &'static str, e: &BoardError) {
    if e.is_stale_reference() {
        debug!(op, reason = %e, "ignored");
    } else {
        debug!(op, reason = %e, "rejected");
    }
}

/// The first board for a user with nothing stored
fn seeded_collection(defaults: &DefaultsConfig, ids: &mut IdGenerator) -> BoardCollection {
    let mut collection = BoardCollection::seeded(&mut || ids.next_id());
    let board = collection.active_board_mut();
    if let Ok(title) = clean_title(&defaults.board_title) {
        board.title = title;
    }
    board_ops::set_list_opacity(board, defaults.list_opacity);
    board_ops::set_background_image(board, defaults.background_image.as_deref());
    collection
}
