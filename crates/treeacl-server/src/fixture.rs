//! JSON site fixtures for the in-memory store.
//!
//! ```json
//! {
//!   "pages": [{"uid": 1, "pid": 0, "title": "Home"}],
//!   "acls":  [{"uid": 1, "pid": 1, "type": 0, "object_id": 100, "permissions": 31, "recursive": true}]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use treeacl_storage::{DataStore, MemoryDataStore, StorageError, StoredAcl, StoredPage};

/// Error type for fixture loading.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixture rejected by storage: {0}")]
    Storage(#[from] StorageError),
}

/// A page tree with its ACL rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fixture {
    #[serde(default)]
    pub pages: Vec<StoredPage>,
    #[serde(default)]
    pub acls: Vec<StoredAcl>,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the fixture into a fresh in-memory store.
    pub async fn into_store(self) -> Result<Arc<MemoryDataStore>, FixtureError> {
        let store = MemoryDataStore::new_shared();
        let (pages, acls) = (self.pages.len(), self.acls.len());

        store.write_pages(self.pages).await?;
        store.write_acls(self.acls).await?;

        info!(pages, acls, "loaded fixture");
        Ok(store)
    }
}
