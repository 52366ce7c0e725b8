use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{parse_tab_id, Tab};

/// Collection-scoped primitives of the document store holding `tabs`.
///
/// Every document is one fully nested [`Tab`]; implementations must keep
/// array order exactly as written and be safe for concurrent callers.
#[async_trait]
pub trait TabStore: Send + Sync {
    /// All documents in store-native (insertion) order.
    async fn find_all(&self) -> Result<Vec<Tab>, DatabaseError>;

    async fn find_one(&self, id: Uuid) -> Result<Option<Tab>, DatabaseError>;

    /// Insert a document whose root id is already set.
    async fn insert_one(&self, tab: &Tab) -> Result<(), DatabaseError>;

    /// Overwrite the document with `id`, returning the matched count.
    async fn replace_one(&self, id: Uuid, tab: &Tab) -> Result<u64, DatabaseError>;

    /// Remove the document with `id`, returning the deleted count.
    async fn delete_one(&self, id: Uuid) -> Result<u64, DatabaseError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid tab identifier: {0}")]
    InvalidIdentifier(String),

    #[error("tab {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Persistence(String),
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        RepositoryError::Persistence(err.to_string())
    }
}

/// Default deadline applied to each store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifier assignment and persistence rules for the `tabs` collection.
///
/// Cloning is cheap: the store handle is shared, never mutated.
#[derive(Clone)]
pub struct TabRepository {
    store: Arc<dyn TabStore>,
    timeout: Duration,
}

impl TabRepository {
    pub fn new(store: Arc<dyn TabStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn list_all(&self) -> Result<Vec<Tab>, RepositoryError> {
        self.bounded(self.store.find_all()).await
    }

    /// Assign missing identifiers at every level, then insert the document.
    /// Returns the root identifier.
    pub async fn create(&self, mut tab: Tab) -> Result<Uuid, RepositoryError> {
        let id = assign_missing_ids(&mut tab);
        self.bounded(self.store.insert_one(&tab)).await?;
        info!(tab_id = %id, groups = tab.groups.len(), "tab created");
        Ok(id)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Tab, RepositoryError> {
        let id = parse_id(id)?;
        self.bounded(self.store.find_one(id))
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    /// Whole-document replace. The path id wins over any id in the body,
    /// and nested groups or notes without ids are stored without ids.
    pub async fn replace(&self, id: &str, mut tab: Tab) -> Result<(), RepositoryError> {
        let id = parse_id(id)?;
        tab.id = Some(id);

        let matched = self.bounded(self.store.replace_one(id, &tab)).await?;
        if matched == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        debug!(tab_id = %id, "tab replaced");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        let id = parse_id(id)?;
        let deleted = self.bounded(self.store.delete_one(id)).await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        debug!(tab_id = %id, "tab deleted");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.bounded(self.store.ping()).await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, DatabaseError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(RepositoryError::from),
            Err(_) => Err(RepositoryError::Persistence(format!(
                "store operation timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, RepositoryError> {
    parse_tab_id(raw).ok_or_else(|| RepositoryError::InvalidIdentifier(raw.to_string()))
}

/// Fill in every unset id in the tree; ids already present are kept.
fn assign_missing_ids(tab: &mut Tab) -> Uuid {
    let id = *tab.id.get_or_insert_with(Uuid::new_v4);

    for group in &mut tab.groups {
        group.id.get_or_insert_with(Uuid::new_v4);
        for note in group.notes.iter_mut().flatten() {
            note.id.get_or_insert_with(Uuid::new_v4);
        }
    }

    id
}
