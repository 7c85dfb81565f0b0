//! Account and favorites records shared by the service and HTTP layers.

pub mod errors;
pub mod favorite;
pub mod user;

pub use favorite::{Favorite, FavoriteId};
pub use user::{User, UserField, UserSummary};
