//! Account-and-favorites store.
//! - `UserStore` owns the user collection and enforces username uniqueness.
//! - `FavoritesManager` edits a single user's favorites through the store.
//! - Persistence is pluggable: in-memory or JSON snapshot on disk.

pub mod errors;
pub mod identity;
pub mod password;
pub mod runtime;
pub mod storage;
pub mod users;

pub use errors::ServiceError;
pub use users::{FavoritesManager, UserStore};
