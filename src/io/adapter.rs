use std::sync::Arc;

use tracing::info;

use super::codec;
use super::store::{DocumentStore, LocalStore, RemoteStore, StoreError, UserId};
use crate::model::board::BoardCollection;
use crate::model::config::KanbanConfig;

/// What was found when the application started
#[derive(Debug)]
pub struct Bootstrap {
    pub user: Option<UserId>,
    /// `None` when nothing has been stored yet
    pub collection: Option<BoardCollection>,
    /// Local boards were copied up to the remote store on this start
    pub migrated: bool,
}

/// Saves and loads the board collection, locally or per user remotely.
///
/// A known user with a remote configured goes to the remote store;
/// everything else goes to the local store.
pub struct PersistenceAdapter {
    local: Arc<dyn DocumentStore>,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl PersistenceAdapter {
    pub fn local_only(local: Arc<dyn DocumentStore>) -> Self {
        PersistenceAdapter {
            local,
            remote: None,
        }
    }

    pub fn with_remote(local: Arc<dyn DocumentStore>, remote: Arc<dyn RemoteStore>) -> Self {
        PersistenceAdapter {
            local,
            remote: Some(remote),
        }
    }

    /// Local store at `[storage] path`, plus the remote when one is given
    pub fn from_config(config: &KanbanConfig, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        PersistenceAdapter {
            local: Arc::new(LocalStore::new(&config.storage.path)),
            remote,
        }
    }

    pub fn identify_current_user(&self) -> Option<UserId> {
        self.remote.as_ref()?.identify_current_user()
    }

    pub fn load_collection(&self, user: Option<&UserId>) -> Result<Option<BoardCollection>, StoreError> {
        let doc = match (user, &self.remote) {
            (Some(user), Some(remote)) => remote.load(user)?,
            _ => self.local.load()?,
        };
        Ok(doc.map(codec::decode).transpose()?)
    }

    pub fn save_collection(&self, user: Option<&UserId>, collection: &BoardCollection) -> Result<(), StoreError> {
        let doc = codec::encode(collection)?;
        match (user, &self.remote) {
            (Some(user), Some(remote)) => remote.save(user, &doc),
            _ => self.local.save(&doc),
        }
    }

    /// Load for startup. On a signed-in user's first visit (remote empty),
    /// boards kept on this device are uploaded and used.
    pub fn bootstrap(&self) -> Result<Bootstrap, StoreError> {
        let user = self.identify_current_user();
        let (Some(uid), Some(remote)) = (user.clone(), self.remote.clone()) else {
            let collection = self.load_collection(None)?;
            return Ok(Bootstrap {
                user,
                collection,
                migrated: false,
            });
        };

        if let Some(doc) = remote.load(&uid)? {
            return Ok(Bootstrap {
                user,
                collection: Some(codec::decode(doc)?),
                migrated: false,
            });
        }

        let Some(doc) = self.local.load()? else {
            return Ok(Bootstrap {
                user,
                collection: None,
                migrated: false,
            });
        };
        let collection = codec::decode(doc)?;
        remote.save(&uid, &codec::encode(&collection)?)?;
        info!(user = %uid, boards = collection.boards().len(), "moved local boards to remote store");
        Ok(Bootstrap {
            user,
            collection: Some(collection),
            migrated: true,
        })
    }
}
