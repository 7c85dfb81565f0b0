//! Account store and per-user favorites operations.

pub mod favorites;
pub mod store;

pub use favorites::FavoritesManager;
pub use store::UserStore;
