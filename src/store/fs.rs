//! Filesystem-backed object store.
//!
//! Each object is a plain file named by its key, with a JSON sidecar
//! (`<key>.meta`) holding the provenance metadata. Writes go through a
//! temporary file and a rename, so a partially written object is never
//! observable under its final name.

use super::{ByteStream, ObjectBody, ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Object store rooted at a local directory.
pub struct FsStore {
    root: PathBuf,
}

/// Keys minted by this service are hyphenated UUIDs. Anything outside that
/// charset (path separators, dots, ..) never names an object, so it is
/// treated as absent without touching the filesystem.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl FsStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.meta"))
    }

    async fn read_metadata(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        match tokio::fs::read(self.meta_path(key)).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

async fn write_atomic(path: &Path, tmp: &Path, contents: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(tmp, contents).await?;
    tokio::fs::rename(tmp, path).await
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> Result<StoredObject, StoreError> {
        if !is_valid_key(key) {
            return Err(StoreError::Unavailable(format!(
                "refusing to store under malformed key {key:?}"
            )));
        }

        let size = content.len() as u64;
        let meta_json = serde_json::to_vec(&metadata)?;

        // Metadata lands first: once the content file is visible, its sidecar
        // already exists. A crash in between leaves only an orphan sidecar,
        // which `get` never reports.
        let meta_path = self.meta_path(key);
        let meta_tmp = self.root.join(format!(".{key}.meta.part"));
        write_atomic(&meta_path, &meta_tmp, &meta_json).await?;

        let object_path = self.object_path(key);
        let object_tmp = self.root.join(format!(".{key}.part"));
        write_atomic(&object_path, &object_tmp, &content).await?;

        Ok(StoredObject {
            key: key.to_string(),
            size,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<ObjectBody>, StoreError> {
        if !is_valid_key(key) {
            return Ok(None);
        }

        let file = match tokio::fs::File::open(self.object_path(key)).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let metadata = self.read_metadata(key).await?;

        let stream = ReaderStream::with_capacity(file, READ_CHUNK_SIZE).boxed() as ByteStream;
        Ok(Some(ObjectBody { stream, metadata }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use tempfile::TempDir;

    async fn drain(stream: ByteStream) -> Vec<u8> {
        stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .expect("drain stream")
    }

    fn sample_metadata() -> HashMap<String, String> {
        HashMap::from([
            ("cf-connecting-ip".to_string(), "203.0.113.9".to_string()),
            ("cf-ray".to_string(), "ray-1234".to_string()),
        ])
    }

    #[tokio::test]
    async fn put_then_get_round_trips_content_and_metadata() {
        let dir = TempDir::new().expect("temp dir");
        let store = FsStore::open(dir.path()).expect("open store");

        let stored = store
            .put("abc-123", Bytes::from_static(b"escaped &amp; text"), sample_metadata())
            .await
            .expect("put");
        assert_eq!(stored.key, "abc-123");
        assert_eq!(stored.size, 18);

        let body = store.get("abc-123").await.expect("get").expect("present");
        assert_eq!(body.metadata, sample_metadata());
        assert_eq!(drain(body.stream).await, b"escaped &amp; text");
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FsStore::open(dir.path()).expect("open store");
        assert!(store.get("does-not-exist").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn traversal_shaped_keys_are_absent_not_errors() {
        let dir = TempDir::new().expect("temp dir");
        let store = FsStore::open(dir.path()).expect("open store");
        for key in ["../etc/passwd", "a/b", ".", "..", "", "key.meta"] {
            assert!(
                store.get(key).await.expect("get").is_none(),
                "key {:?} should be absent",
                key
            );
        }
    }

    #[tokio::test]
    async fn malformed_key_put_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let store = FsStore::open(dir.path()).expect("open store");
        let err = store
            .put("../escape", Bytes::from_static(b"x"), HashMap::new())
            .await
            .expect_err("put should fail");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn zero_length_object_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let store = FsStore::open(dir.path()).expect("open store");
        let stored = store
            .put("empty-1", Bytes::new(), HashMap::new())
            .await
            .expect("put");
        assert_eq!(stored.size, 0);
        let body = store.get("empty-1").await.expect("get").expect("present");
        assert!(drain(body.stream).await.is_empty());
    }
}
