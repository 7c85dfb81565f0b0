use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use models::User;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use super::PersistenceBackend;
use crate::errors::ServiceError;

/// Durable snapshot of the collection as a pretty-printed JSON array.
///
/// Saves go to a sibling temp file which is then renamed over the snapshot,
/// so readers see either the previous or the new file, never a torn one.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    file_path: PathBuf,
}

impl JsonFileBackend {
    /// Point the backend at `path`, creating its parent directory. The
    /// snapshot itself is only written on the first save.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Io(format!("create {}: {e}", parent.display())))?;
        }
        Ok(Self { file_path })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "users.json".to_string());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
    }

    async fn write_temp(&self, tmp: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(tmp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for JsonFileBackend {
    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no snapshot yet; starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(ServiceError::Io(format!("read {}: {e}", self.file_path.display()))),
        };
        let users = models::user::parse_collection(&bytes)?;
        Ok(users)
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(users).map_err(|e| ServiceError::Io(e.to_string()))?;
        let tmp = self.temp_path();

        if let Err(e) = self.write_temp(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Io(format!("write {}: {e}", tmp.display())));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            warn!(path = %self.file_path.display(), error = %e, "snapshot rename failed");
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Io(format!("replace {}: {e}", self.file_path.display())));
        }
        debug!(path = %self.file_path.display(), users = users.len(), "snapshot_saved");
        Ok(())
    }

    fn kind(&self) -> &'static str { "file" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Favorite;

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("favorites_{tag}_{}", Uuid::new_v4())).join("users.json")
    }

    #[tokio::test]
    async fn missing_snapshot_loads_empty() -> Result<(), anyhow::Error> {
        let backend = JsonFileBackend::new(tmp_path("missing")).await?;
        assert!(backend.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_preserves_records_and_order() -> Result<(), anyhow::Error> {
        let path = tmp_path("roundtrip");
        let backend = JsonFileBackend::new(&path).await?;

        let mut alice = User::new("a1", "alice", "pw1");
        alice.add_favorite(Favorite::new(42, "Matrix", "p.jpg"));
        alice.add_favorite(Favorite::new("tt0062622", "2001", "q.jpg"));
        alice.add_favorite(Favorite::new(7, "Se7en", "r.jpg"));
        let users = vec![alice, User::new("b2", "bob", "hunter2")];

        backend.save(&users).await?;
        assert_eq!(backend.load().await?, users);

        // a fresh backend on the same path sees the same snapshot
        let reopened = JsonFileBackend::new(&path).await?;
        assert_eq!(reopened.load().await?, users);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files_behind() -> Result<(), anyhow::Error> {
        let path = tmp_path("tempfiles");
        let backend = JsonFileBackend::new(&path).await?;
        backend.save(&[User::new("a1", "alice", "pw1")]).await?;
        backend.save(&[User::new("a1", "alice", "pw2")]).await?;

        let dir = path.parent().unwrap();
        let mut entries = fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["users.json".to_string()]);

        let _ = fs::remove_dir_all(dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn non_array_snapshot_is_corrupt() -> Result<(), anyhow::Error> {
        let path = tmp_path("corrupt");
        let backend = JsonFileBackend::new(&path).await?;
        fs::write(&path, br#"{"id":"a1","username":"alice"}"#).await?;

        let err = backend.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::CorruptStore(_)), "got {err:?}");

        fs::write(&path, b"[{\"id\":").await?;
        assert!(matches!(backend.load().await, Err(ServiceError::CorruptStore(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_snapshot_is_io_failure() -> Result<(), anyhow::Error> {
        let path = tmp_path("unreadable");
        let backend = JsonFileBackend::new(&path).await?;
        // a directory at the snapshot path exists but cannot be read as a file
        fs::create_dir_all(&path).await?;

        let err = backend.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)), "got {err:?}");

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_into_missing_directory_is_io_failure() -> Result<(), anyhow::Error> {
        let path = tmp_path("vanished");
        let backend = JsonFileBackend::new(&path).await?;
        fs::remove_dir_all(path.parent().unwrap()).await?;

        let err = backend.save(&[User::new("a1", "alice", "pw1")]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)), "got {err:?}");
        Ok(())
    }
}
