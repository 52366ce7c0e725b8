use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Tab;
use crate::database::repository::TabStore;

/// In-process `tabs` collection with the same contract as the Postgres store.
///
/// Used by the test suites and for running the API without a database.
#[derive(Default)]
pub struct MemoryTabStore {
    documents: RwLock<Vec<Tab>>,
}

impl MemoryTabStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TabStore for MemoryTabStore {
    async fn find_all(&self) -> Result<Vec<Tab>, DatabaseError> {
        Ok(self.documents.read().await.clone())
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Tab>, DatabaseError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn insert_one(&self, tab: &Tab) -> Result<(), DatabaseError> {
        let id = tab.id.unwrap_or_else(Uuid::nil);
        let mut documents = self.documents.write().await;
        if documents.iter().any(|t| t.id == Some(id)) {
            return Err(DatabaseError::Duplicate(id));
        }
        documents.push(tab.clone());
        Ok(())
    }

    async fn replace_one(&self, id: Uuid, tab: &Tab) -> Result<u64, DatabaseError> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|t| t.id == Some(id)) {
            Some(existing) => {
                *existing = Tab {
                    id: Some(id),
                    ..tab.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|t| t.id != Some(id));
        Ok((before - documents.len()) as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
