use std::sync::Arc;

use models::{user::validate_username, User, UserField};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::identity::{IdentifierGenerator, RandomHexGenerator};
use crate::password::PasswordScheme;
use crate::storage::PersistenceBackend;

/// Upper bound on id draws per signup before giving up.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Result of a mutation closure: whether the draft must be persisted.
pub(crate) enum Change<T> {
    Changed(T),
    Unchanged(T),
}

/// Sole owner of the user collection.
///
/// The collection is loaded from the backend once at construction and kept
/// behind one `RwLock`. Mutations hold the write lock across the whole
/// edit-and-save sequence and work on a copy that only replaces the held
/// collection after the backend accepted it.
pub struct UserStore {
    users: RwLock<Vec<User>>,
    backend: Arc<dyn PersistenceBackend>,
    ids: Arc<dyn IdentifierGenerator>,
    passwords: PasswordScheme,
}

impl UserStore {
    /// Load the collection from `backend` using random hex ids and plaintext passwords.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::storage::InMemoryBackend;
    /// use service::users::UserStore;
    /// let store = tokio_test::block_on(UserStore::open(Arc::new(InMemoryBackend::new()))).unwrap();
    /// let alice = tokio_test::block_on(store.create_user("alice", "pw1")).unwrap();
    /// assert_eq!(alice.id.len(), 12);
    /// assert!(tokio_test::block_on(store.authenticate("alice", "pw1")));
    /// ```
    pub async fn open(backend: Arc<dyn PersistenceBackend>) -> Result<Arc<Self>, ServiceError> {
        Self::new(backend, Arc::new(RandomHexGenerator), PasswordScheme::default()).await
    }

    pub async fn new(
        backend: Arc<dyn PersistenceBackend>,
        ids: Arc<dyn IdentifierGenerator>,
        passwords: PasswordScheme,
    ) -> Result<Arc<Self>, ServiceError> {
        let users = backend.load().await?;
        let mut seen = std::collections::HashSet::new();
        for u in &users {
            if !seen.insert(u.username.as_str()) {
                warn!(username = %u.username, "snapshot holds more than one record for this username");
            }
        }
        info!(backend = backend.kind(), users = users.len(), ?passwords, "user store loaded");
        Ok(Arc::new(Self { users: RwLock::new(users), backend, ids, passwords }))
    }

    /// Apply `f` to a copy of the collection and persist it if changed.
    pub(crate) async fn update_map<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Vec<User>) -> Result<Change<T>, ServiceError>,
    {
        let mut users = self.users.write().await;
        let mut draft = users.clone();
        match f(&mut draft)? {
            Change::Unchanged(out) => Ok(out),
            Change::Changed(out) => {
                self.backend.save(&draft).await?;
                *users = draft;
                Ok(out)
            }
        }
    }

    /// Mutate the first record named `username`.
    pub(crate) async fn update_user<F, T>(&self, username: &str, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut User) -> Change<T>,
    {
        self.update_map(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.username == username)
                .ok_or_else(|| ServiceError::not_found("user"))?;
            Ok(f(user))
        })
        .await
    }

    /// Read the first record named `username` without cloning the collection.
    pub(crate) async fn read_user<F, T>(&self, username: &str, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&User) -> T,
    {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.username == username)
            .map(f)
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    /// Register a new account with an empty favorites list.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        validate_username(username)?;
        let stored = self.passwords.encode(password)?;

        let user = self
            .update_map(|users| {
                if users.iter().any(|u| u.username == username) {
                    return Err(ServiceError::DuplicateUsername(username.to_string()));
                }
                let id = self.fresh_id(users)?;
                let user = User::new(id, username, stored);
                users.push(user.clone());
                Ok(Change::Changed(user))
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    fn fresh_id(&self, users: &[User]) -> Result<String, ServiceError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate();
            if !users.iter().any(|u| u.id == candidate) {
                return Ok(candidate);
            }
            debug!(attempt, "generated id already taken; drawing again");
        }
        Err(ServiceError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, ServiceError> {
        self.read_user(username, User::clone).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<User, ServiceError> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    /// True iff a record with exactly this username accepts `password`.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        let users = self.users.read().await;
        let ok = users
            .iter()
            .any(|u| u.username == username && self.passwords.verify(password, &u.password));
        if !ok {
            debug!("credential mismatch");
        }
        ok
    }

    /// Overwrite `username` or `password` on an existing record.
    ///
    /// Renaming does not check whether the new username is already taken.
    #[instrument(skip_all, fields(username = %username, field = ?field))]
    pub async fn update_field(&self, username: &str, field: UserField, value: &str) -> Result<User, ServiceError> {
        let value = match field {
            UserField::Username => {
                validate_username(value)?;
                value.to_string()
            }
            UserField::Password => self.passwords.encode(value)?,
        };
        let updated = self
            .update_user(username, |user| {
                match field {
                    UserField::Username => user.username = value,
                    UserField::Password => user.password = value,
                }
                Change::Changed(user.clone())
            })
            .await?;
        info!(user_id = %updated.id, "user_updated");
        Ok(updated)
    }

    /// Remove the account; returns whether one existed. Absent users are not an error.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn delete_user(&self, username: &str) -> Result<bool, ServiceError> {
        let existed = self
            .update_map(|users| {
                let before = users.len();
                users.retain(|u| u.username != username);
                Ok(if users.len() == before { Change::Unchanged(false) } else { Change::Changed(true) })
            })
            .await?;
        if existed {
            info!("user_deleted");
        }
        Ok(existed)
    }

    /// Every record, passwords included. Callers must not expose them.
    pub async fn list_all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}
