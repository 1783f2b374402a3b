use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use super::adapter::PersistenceAdapter;
use super::store::{StoreError, UserId};
use crate::model::board::BoardCollection;

/// Outcome notifications from the persistence worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistEvent {
    /// Everything up to and including `revision` is stored.
    Saved { revision: u64 },
    /// Storing `revision` failed. The in-memory boards are unaffected.
    SaveFailed { revision: u64, message: String },
    /// Stored boards could not be read at startup; defaults are in use.
    LoadFailed { message: String },
}

enum Command {
    Save {
        revision: u64,
        collection: Box<BoardCollection>,
    },
    Shutdown,
}

/// Background thread that writes the board collection.
///
/// Mutations hand over a copy and move on; they never wait for storage.
/// Saves that queue up while a write is in flight are collapsed into the
/// newest one. Results come back through `poll()`.
pub struct PersistenceWorker {
    commands: Sender<Command>,
    events: Receiver<PersistEvent>,
    handle: Option<JoinHandle<()>>,
    revision: u64,
}

impl PersistenceWorker {
    pub fn spawn(adapter: Arc<PersistenceAdapter>, user: Option<UserId>) -> Result<Self, StoreError> {
        let (commands, command_rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("kanban-persist".into())
            .spawn(move || run(&adapter, user.as_ref(), &command_rx, &event_tx))
            .map_err(StoreError::Spawn)?;
        Ok(PersistenceWorker {
            commands,
            events,
            handle: Some(handle),
            revision: 0,
        })
    }

    /// Queue a save. Returns its revision number.
    pub fn save(&mut self, collection: BoardCollection) -> Result<u64, StoreError> {
        self.revision += 1;
        self.commands
            .send(Command::Save {
                revision: self.revision,
                collection: Box::new(collection),
            })
            .map_err(|_| StoreError::WorkerUnavailable)?;
        Ok(self.revision)
    }

    /// Non-blocking poll for finished saves.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<PersistEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.events.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Finish pending saves and stop the thread.
    /// Returns any events not yet polled.
    pub fn shutdown(mut self) -> Vec<PersistEvent> {
        self.stop();
        self.poll()
    }

    fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.commands.send(Command::Shutdown);
        if handle.join().is_err() {
            warn!("persistence worker panicked");
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    adapter: &PersistenceAdapter,
    user: Option<&UserId>,
    commands: &Receiver<Command>,
    events: &Sender<PersistEvent>,
) {
    while let Ok(command) = commands.recv() {
        let Command::Save {
            mut revision,
            mut collection,
        } = command
        else {
            break;
        };

        let mut stopping = false;
        while let Ok(next) = commands.try_recv() {
            match next {
                Command::Save {
                    revision: r,
                    collection: c,
                } => {
                    revision = r;
                    collection = c;
                }
                Command::Shutdown => {
                    stopping = true;
                    break;
                }
            }
        }

        let event = match adapter.save_collection(user, &collection) {
            Ok(()) => {
                debug!(revision, "boards saved");
                PersistEvent::Saved { revision }
            }
            Err(e) => {
                error!(revision, error = %e, "failed to save boards");
                PersistEvent::SaveFailed {
                    revision,
                    message: e.to_string(),
                }
            }
        };
        // Receiver gone means the app is tearing down; nothing to report to
        let _ = events.send(event);

        if stopping {
            break;
        }
    }
    debug!("persistence worker stopped");
}
