use super::error::StoreError;
use crate::model::{Show, ShowId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Read access to the show catalog, owned by an external service.
#[async_trait]
pub trait ShowCatalog: Send + Sync + 'static {
    async fn get_show(&self, id: ShowId) -> Result<Option<Show>, StoreError>;
}

/// Catalog kept in memory, used by the demo binary and tests.
#[derive(Debug, Default)]
pub struct InMemoryShowCatalog {
    shows: RwLock<HashMap<ShowId, Show>>,
}

impl InMemoryShowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shows(shows: impl IntoIterator<Item = Show>) -> Self {
        Self {
            shows: RwLock::new(shows.into_iter().map(|show| (show.id, show)).collect()),
        }
    }

    pub async fn insert(&self, show: Show) {
        self.shows.write().await.insert(show.id, show);
    }
}

#[async_trait]
impl ShowCatalog for InMemoryShowCatalog {
    async fn get_show(&self, id: ShowId) -> Result<Option<Show>, StoreError> {
        Ok(self.shows.read().await.get(&id).cloned())
    }
}
