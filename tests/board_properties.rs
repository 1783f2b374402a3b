use std::fs;
use std::sync::Arc;

use kanban_core::id::IdGenerator;
use kanban_core::io::adapter::PersistenceAdapter;
use kanban_core::io::codec;
use kanban_core::io::store::{DocumentStore, LocalStore};
use kanban_core::undo::UNDO_STACK_LIMIT;
use kanban_core::{BoardCollection, BoardError, KanbanApp, KanbanConfig, PersistEvent, Priority, SortMode, Toggle};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fresh_app() -> KanbanApp {
    let mut ids = IdGenerator::new();
    KanbanApp::detached(BoardCollection::seeded(&mut || ids.next_id()))
}

fn list_ids(app: &KanbanApp) -> Vec<String> {
    app.active_board().lists.iter().map(|l| l.id.clone()).collect()
}

fn list_titles(app: &KanbanApp) -> Vec<String> {
    app.active_board().lists.iter().map(|l| l.title.clone()).collect()
}

/// Deterministic pseudo-random sequence for driving many operations
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

/// Board with five open lists, a done list and a dozen cards
fn populated_app() -> KanbanApp {
    let mut app = fresh_app();
    for title in ["Backlog", "Blocked", "Review"] {
        app.add_list(title).unwrap();
    }
    let lists = list_ids(&app);
    for i in 0..12 {
        app.add_card(&lists[i % (lists.len() - 1)], &format!("card {}", i))
            .unwrap();
    }
    app
}

// ---------------------------------------------------------------------------
// Moving cards
// ---------------------------------------------------------------------------

#[test]
fn move_card_preserves_count_and_identity() {
    let mut app = populated_app();
    let total = app.active_board().card_count();
    let mut rng = Lcg(7);

    for _ in 0..200 {
        let board = app.active_board();
        let lists = list_ids(&app);
        let src = &board.lists[rng.next(lists.len())];
        if src.cards.is_empty() {
            continue;
        }
        let card_id = src.cards[rng.next(src.cards.len())].id.clone();
        let src_id = src.id.clone();
        let dest = board.lists[rng.next(lists.len())].clone();
        let before = if dest.cards.is_empty() || rng.next(3) == 0 {
            None
        } else {
            Some(dest.cards[rng.next(dest.cards.len())].id.clone())
        };

        app.move_card(&card_id, &src_id, &dest.id, before.as_deref());

        assert_eq!(app.active_board().card_count(), total);
        let (li, _) = app.active_board().find_card(&card_id).unwrap();
        assert_eq!(app.active_board().lists[li].id, dest.id);
    }
}

#[test]
fn move_card_keeps_relative_order() {
    let mut app = fresh_app();
    let lists = list_ids(&app);
    let (todo, doing) = (&lists[0], &lists[1]);
    let a = app.add_card(todo, "a").unwrap();
    let b = app.add_card(todo, "b").unwrap();
    app.add_card(todo, "c").unwrap();
    app.add_card(doing, "x").unwrap();
    let y = app.add_card(doing, "y").unwrap();

    assert!(app.move_card(&b, todo, doing, Some(y.as_str())));
    let names = |app: &KanbanApp, id: &str| -> Vec<String> {
        app.active_board()
            .list(id)
            .unwrap()
            .cards
            .iter()
            .map(|c| c.name.clone())
            .collect()
    };
    assert_eq!(names(&app, todo), vec!["a", "c"]);
    assert_eq!(names(&app, doing), vec!["x", "b", "y"]);

    // Unknown target card appends
    assert!(app.move_card(&a, todo, doing, Some("nope")));
    assert_eq!(names(&app, doing), vec!["x", "b", "y", "a"]);
}

#[test]
fn move_card_stale_ids_are_silent() {
    let mut app = populated_app();
    let before = app.collection().clone();
    let depth = app.undo_depth();
    let lists = list_ids(&app);

    assert!(!app.move_card("ghost", &lists[0], &lists[1], None));
    assert!(!app.move_card("ghost", "no-list", &lists[1], None));
    assert!(!app.move_card("ghost", &lists[0], "no-list", None));

    assert_eq!(app.collection(), &before);
    assert_eq!(app.undo_depth(), depth);
}

// ---------------------------------------------------------------------------
// Moving lists
// ---------------------------------------------------------------------------

#[test]
fn move_list_keeps_done_last() {
    let mut app = populated_app();
    let mut rng = Lcg(42);

    for _ in 0..200 {
        let lists = list_ids(&app);
        let dragged = &lists[rng.next(lists.len())];
        let target = if rng.next(5) == 0 {
            "missing".to_string()
        } else {
            lists[rng.next(lists.len())].clone()
        };
        app.move_list(dragged, &target);

        let board = app.active_board();
        assert!(board.lists.last().unwrap().is_done());
        assert_eq!(board.lists.iter().filter(|l| l.is_done()).count(), 1);
        assert_eq!(board.lists.len(), lists.len());
    }
}

#[test]
fn move_list_onto_done_lands_before_it() {
    let mut app = populated_app();
    let lists = list_ids(&app);
    let done = lists.last().unwrap().clone();
    let first = lists[0].clone();

    assert!(app.move_list(&first, &done));
    let after = list_ids(&app);
    assert_eq!(after[after.len() - 2], first);
    assert_eq!(after.last(), Some(&done));
}

// ---------------------------------------------------------------------------
// Undo
// ---------------------------------------------------------------------------

#[test]
fn undo_walks_back_through_history() {
    let mut app = fresh_app();
    let lists = list_ids(&app);
    let mut history = Vec::new();

    history.push(app.collection().clone());
    let card = app.add_card(&lists[0], "first").unwrap();
    history.push(app.collection().clone());
    app.rename_card(&lists[0], &card, "renamed").unwrap();
    history.push(app.collection().clone());
    app.add_list("Later").unwrap();
    history.push(app.collection().clone());
    app.toggle_complete(&card).unwrap();
    history.push(app.collection().clone());
    assert!(app.move_list(&lists[1], &lists[0]));

    for expected in history.iter().rev() {
        assert!(app.undo());
        assert_eq!(app.collection(), expected);
    }
    assert!(!app.undo());
}

#[test]
fn undo_stack_is_bounded() {
    let mut app = fresh_app();
    let todo = list_ids(&app)[0].clone();
    for i in 0..UNDO_STACK_LIMIT + 10 {
        app.add_card(&todo, &format!("card {}", i)).unwrap();
        assert!(app.undo_depth() <= UNDO_STACK_LIMIT);
    }
    assert_eq!(app.undo_depth(), UNDO_STACK_LIMIT);

    let mut undone = 0;
    while app.undo() {
        undone += 1;
    }
    assert_eq!(undone, UNDO_STACK_LIMIT);
    // The ten oldest additions are out of reach
    assert_eq!(app.active_board().list(&todo).unwrap().cards.len(), 10);
}

#[test]
fn rejected_operations_leave_no_history() {
    let mut app = fresh_app();
    let lists = list_ids(&app);
    let done = lists.last().unwrap();

    assert_eq!(app.rename_list(done, "Finished"), Err(BoardError::DoneListLocked));
    assert_eq!(app.rename_list(&lists[0], "  "), Err(BoardError::EmptyTitle));
    assert!(matches!(app.set_due(&lists[0], "ghost", Some("2024-01-01")), Err(BoardError::CardNotFound(_))));
    assert!(matches!(app.set_list_color(&lists[0], Some("red")), Err(BoardError::InvalidColor(_))));
    assert_eq!(app.undo_depth(), 0);
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[test]
fn sort_by_priority_breaks_ties_by_name() {
    let mut app = fresh_app();
    let todo = list_ids(&app)[0].clone();
    let b = app.add_card(&todo, "B").unwrap();
    let a = app.add_card(&todo, "A").unwrap();
    app.add_card(&todo, "C").unwrap();
    app.set_priority(&todo, &b, Some(Priority::Low)).unwrap();
    app.set_priority(&todo, &a, Some(Priority::High)).unwrap();

    assert!(app.sort_cards(&todo, SortMode::ByPriority));
    let order: Vec<(String, Option<Priority>)> = app
        .active_board()
        .list(&todo)
        .unwrap()
        .cards
        .iter()
        .map(|c| (c.name.clone(), c.priority))
        .collect();
    assert_eq!(
        order,
        vec![
            ("A".to_string(), Some(Priority::High)),
            ("B".to_string(), Some(Priority::Low)),
            ("C".to_string(), None),
        ]
    );
}

#[test]
fn sort_by_due_date_puts_undated_last() {
    let mut app = fresh_app();
    let todo = list_ids(&app)[0].clone();
    let undated = app.add_card(&todo, "undated").unwrap();
    let late = app.add_card(&todo, "late").unwrap();
    let early = app.add_card(&todo, "early").unwrap();
    app.set_due(&todo, &late, Some("2025-06-01")).unwrap();
    app.set_due(&todo, &early, Some("2024-01-15")).unwrap();

    assert!(app.sort_cards(&todo, SortMode::ByDueDate));
    let ids: Vec<&str> = app.active_board().list(&todo).unwrap().cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![early.as_str(), late.as_str(), undated.as_str()]);
    assert!(!app.sort_cards("ghost", SortMode::ByDueDate));
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn toggle_twice_restores_list() {
    let mut app = populated_app();
    let board = app.active_board();
    let cards: Vec<(String, String)> = board
        .lists
        .iter()
        .filter(|l| !l.is_done())
        .flat_map(|l| l.cards.iter().map(move |c| (c.id.clone(), l.id.clone())))
        .collect();

    for (card, list) in cards {
        assert_eq!(app.toggle_complete(&card), Some(Toggle::Completed));
        assert_eq!(app.toggle_complete(&card), Some(Toggle::Reopened));
        let (li, ci) = app.active_board().find_card(&card).unwrap();
        let home = &app.active_board().lists[li];
        assert_eq!(home.id, list);
        assert!(!home.cards[ci].completed);
        assert_eq!(home.cards[ci].previous_list_id, None);
    }
}

#[test]
fn reopen_after_list_deleted_falls_back() {
    let mut app = fresh_app();
    let lists = list_ids(&app);
    let doing = lists[1].clone();
    let card = app.add_card(&doing, "orphan").unwrap();
    app.toggle_complete(&card).unwrap();
    app.delete_list(&doing).unwrap();

    assert_eq!(app.toggle_complete(&card), Some(Toggle::Reopened));
    let (li, _) = app.active_board().find_card(&card).unwrap();
    assert_eq!(app.active_board().lists[li].id, lists[0]);
}

#[test]
fn complete_creates_done_list_when_missing() {
    let mut app = fresh_app();
    let lists = list_ids(&app);
    let card = app.add_card(&lists[0], "x").unwrap();
    app.delete_list(&lists[2]).unwrap();
    app.add_list("Extra").unwrap();

    assert_eq!(app.toggle_complete(&card), Some(Toggle::Completed));
    assert_eq!(
        list_titles(&app),
        vec!["To-do", "In Progress", "Extra", "Done"]
    );
    assert_eq!(app.active_board().lists[3].cards[0].id, card);
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[test]
fn last_board_cannot_be_deleted() {
    let mut app = fresh_app();
    let only = app.collection().active_board_id().to_string();
    assert_eq!(app.delete_board(&only), Err(BoardError::LastBoard));
    assert_eq!(app.collection().boards().len(), 1);

    let other = app.add_board("Second");
    app.delete_board(&other).unwrap();
    assert_eq!(app.collection().boards().len(), 1);
    assert_eq!(app.collection().active_board_id(), only);
}

#[test]
fn clear_board_is_undoable() {
    let mut app = populated_app();
    let id = app.collection().active_board_id().to_string();
    let before = app.collection().clone();
    app.clear_board(&id).unwrap();
    assert!(app.active_board().lists.is_empty());
    assert!(app.undo());
    assert_eq!(app.collection(), &before);
}

#[test]
fn new_list_goes_before_done() {
    let mut app = fresh_app();
    app.add_list("Waiting").unwrap();
    assert_eq!(
        list_titles(&app),
        vec!["To-do", "In Progress", "Waiting", "Done"]
    );
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn config_in(dir: &TempDir) -> KanbanConfig {
    let mut config = KanbanConfig::default();
    config.storage.path = dir.path().join("boards.json");
    config
}

fn local_adapter(config: &KanbanConfig) -> Arc<PersistenceAdapter> {
    Arc::new(PersistenceAdapter::from_config(config, None))
}

#[test]
fn boards_survive_restart() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);

    let mut app = KanbanApp::start(&config, local_adapter(&config)).unwrap();
    let todo = list_ids(&app)[0].clone();
    app.add_card(&todo, "Persist me").unwrap();
    app.add_board("Second");
    let expected = app.collection().clone();
    let events = app.shutdown();
    assert!(events.iter().all(|e| matches!(e, PersistEvent::Saved { .. })));

    let app = KanbanApp::start(&config, local_adapter(&config)).unwrap();
    assert_eq!(app.collection(), &expected);
    assert_eq!(app.undo_depth(), 0);
}

#[test]
fn legacy_file_upgraded_on_next_save() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);
    let legacy = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/legacy_v1.json");
    fs::copy(legacy, &config.storage.path).unwrap();

    let mut app = KanbanApp::start(&config, local_adapter(&config)).unwrap();
    assert_eq!(app.collection().boards().len(), 2);
    // Untouched until something changes
    let raw = fs::read_to_string(&config.storage.path).unwrap();
    assert!(raw.contains("\"important\""));

    app.set_active_board("b-work").unwrap();
    app.shutdown();

    let stored = LocalStore::new(&config.storage.path).load().unwrap().unwrap();
    assert_eq!(stored["schemaVersion"], codec::SCHEMA_VERSION);
    assert_eq!(stored["activeBoardId"], "b-work");
    assert!(!fs::read_to_string(&config.storage.path).unwrap().contains("\"important\""));
}

#[test]
fn corrupt_file_starts_fresh_and_keeps_backup() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp);
    fs::write(&config.storage.path, "{ truncated").unwrap();

    let mut app = KanbanApp::start(&config, local_adapter(&config)).unwrap();
    assert_eq!(app.collection().boards().len(), 1);
    assert!(matches!(
        app.poll_persistence().as_slice(),
        [PersistEvent::LoadFailed { .. }]
    ));
    app.shutdown();

    let backup = tmp.path().join("boards.json.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), "{ truncated");
}
