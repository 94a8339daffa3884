//! In-memory object store for tests.

use super::{ByteStream, ObjectBody, ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::io::{Error, ErrorKind};
use std::sync::Mutex;

/// Map-backed store whose `get` streams content in fixed-size chunks, so
/// callers exercise the same incremental-read path a real backend provides.
pub struct MemStore {
    objects: Mutex<HashMap<String, (Bytes, HashMap<String, String>)>>,
    chunk_size: usize,
    fail: bool,
}

impl MemStore {
    /// Store that streams reads back in `chunk_size`-byte chunks.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            objects: Mutex::new(HashMap::new()),
            chunk_size,
            fail: false,
        }
    }

    /// Store whose every operation fails, for exercising backend-error paths.
    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            chunk_size: 1,
            fail: true,
        }
    }

    fn backend_down() -> StoreError {
        StoreError::Io(Error::new(ErrorKind::ConnectionRefused, "backend down"))
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> Result<StoredObject, StoreError> {
        if self.fail {
            return Err(Self::backend_down());
        }
        let size = content.len() as u64;
        self.objects
            .lock()
            .expect("mem store poisoned")
            .insert(key.to_string(), (content, metadata));
        Ok(StoredObject {
            key: key.to_string(),
            size,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<ObjectBody>, StoreError> {
        if self.fail {
            return Err(Self::backend_down());
        }
        let entry = self
            .objects
            .lock()
            .expect("mem store poisoned")
            .get(key)
            .cloned();
        let Some((content, metadata)) = entry else {
            return Ok(None);
        };

        let chunk_size = self.chunk_size;
        let chunks: Vec<std::io::Result<Bytes>> = (0..content.len())
            .step_by(chunk_size)
            .map(|start| Ok(content.slice(start..content.len().min(start + chunk_size))))
            .collect();
        let stream = futures::stream::iter(chunks).boxed() as ByteStream;
        Ok(Some(ObjectBody { stream, metadata }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn streams_content_in_configured_chunks() {
        let store = MemStore::new(4);
        store
            .put("k", Bytes::from_static(b"0123456789"), HashMap::new())
            .await
            .expect("put");

        let body = store.get("k").await.expect("get").expect("present");
        let chunks: Vec<Bytes> = body.stream.try_collect().await.expect("collect");
        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[0][..], b"0123");
        assert_eq!(&chunks[2][..], b"89");
    }

    #[tokio::test]
    async fn failing_store_errors_on_both_operations() {
        let store = MemStore::failing();
        assert!(store
            .put("k", Bytes::new(), HashMap::new())
            .await
            .is_err());
        assert!(store.get("k").await.is_err());
    }
}
