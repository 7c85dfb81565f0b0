//! Persistence backends for the user collection.
//!
//! Both backends hold or write the whole collection at once; there is no
//! incremental update path.

use async_trait::async_trait;
use models::User;

use crate::errors::ServiceError;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::InMemoryBackend;

/// Load/save contract shared by the ephemeral and file-backed stores.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Current full set of user records.
    async fn load(&self) -> Result<Vec<User>, ServiceError>;

    /// Replace the persisted collection with `users`.
    async fn save(&self, users: &[User]) -> Result<(), ServiceError>;

    /// Short label used in logs.
    fn kind(&self) -> &'static str;
}
