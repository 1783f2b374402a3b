use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::warn;

/// Opaque id of a signed-in user, as issued by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("stored boards are not valid: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("local store unavailable: {0}")]
    Unavailable(String),
    #[error("remote store error: {0}")]
    Remote(String),
    #[error("could not start persistence worker: {0}")]
    Spawn(io::Error),
    #[error("persistence worker is not running")]
    WorkerUnavailable,
}

/// A single-document key-value store on this device
pub trait DocumentStore: Send + Sync {
    /// `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<Value>, StoreError>;
    fn save(&self, doc: &Value) -> Result<(), StoreError>;
}

/// Per-user remote document store.
///
/// Implementations own the transport, including any timeout on calls.
pub trait RemoteStore: Send + Sync {
    fn identify_current_user(&self) -> Option<UserId>;
    /// `None` when the user has nothing stored yet
    fn load(&self, user: &UserId) -> Result<Option<Value>, StoreError>;
    fn save(&self, user: &UserId, doc: &Value) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Local file store
// ---------------------------------------------------------------------------

/// The board document as one JSON file on disk
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentStore for LocalStore {
    fn load(&self) -> Result<Option<Value>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        match serde_json::from_str(&content) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                // Keep the unreadable file; the next save would overwrite it
                let bak = self.path.with_extension("json.bak");
                let _ = fs::copy(&self.path, &bak);
                warn!(
                    path = %self.path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "stored boards are corrupt"
                );
                Err(StoreError::Decode(e))
            }
        }
    }

    fn save(&self, doc: &Value) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(doc)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        atomic_write(&self.path, &bytes).map_err(|e| self.io_error(e))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

/// Local store held in memory. Saves can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Option<Value>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Value) -> Self {
        MemoryStore {
            doc: Mutex::new(Some(doc)),
            ..Self::default()
        }
    }

    pub fn document(&self) -> Option<Value> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.document())
    }

    fn save(&self, doc: &Value) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save rejected by memory store".into()));
        }
        *self.doc.lock().unwrap_or_else(|e| e.into_inner()) = Some(doc.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Per-user store held in memory, standing in for a remote backend
#[derive(Debug, Default)]
pub struct MemoryRemote {
    user: Mutex<Option<UserId>>,
    docs: Mutex<HashMap<UserId, Value>>,
    fail_saves: AtomicBool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote with `user` already signed in
    pub fn signed_in(user: &str) -> Self {
        let remote = Self::default();
        remote.sign_in(Some(UserId(user.to_string())));
        remote
    }

    pub fn sign_in(&self, user: Option<UserId>) {
        *self.user.lock().unwrap_or_else(|e| e.into_inner()) = user;
    }

    pub fn insert(&self, user: &UserId, doc: Value) {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user.clone(), doc);
    }

    pub fn document(&self, user: &UserId) -> Option<Value> {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(user)
            .cloned()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl RemoteStore for MemoryRemote {
    fn identify_current_user(&self) -> Option<UserId> {
        self.user.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn load(&self, user: &UserId) -> Result<Option<Value>, StoreError> {
        Ok(self.document(user))
    }

    fn save(&self, user: &UserId, doc: &Value) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Remote(format!("save rejected for {}", user)));
        }
        self.insert(user, doc.clone());
        Ok(())
    }
}
