use async_trait::async_trait;
use models::User;
use tokio::sync::RwLock;

use super::PersistenceBackend;
use crate::errors::ServiceError;

/// Process-lifetime collection. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryBackend {
    users: RwLock<Vec<User>>,
}

impl InMemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Start with a pre-populated collection (fixtures, demos).
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users: RwLock::new(users) }
    }
}

#[async_trait]
impl PersistenceBackend for InMemoryBackend {
    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.read().await.clone())
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        *self.users.write().await = users.to_vec();
        Ok(())
    }

    fn kind(&self) -> &'static str { "memory" }
}
