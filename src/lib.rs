//! Boards, lists and cards for a single-user kanban client.
//!
//! `model` holds the serde data types, `ops` the mutations over them and
//! `io` the storage side. `KanbanApp` ties these together with undo and
//! background saving.

pub mod app;
pub mod id;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod undo;

pub use app::KanbanApp;
pub use io::worker::PersistEvent;
pub use model::{Board, BoardCollection, Card, KanbanConfig, List, Priority};
pub use ops::BoardError;
pub use ops::card_ops::Toggle;
pub use ops::sort::SortMode;
