//! Object store interface and backends.

/// Filesystem-backed store.
pub mod fs;
/// In-memory store used by tests.
pub mod mem;

pub use fs::FsStore;
pub use mem::MemStore;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::collections::HashMap;
use thiserror::Error;

/// Lazily-readable content stream of a stored object.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Errors raised by store backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Reference to a stored object, returned by a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
}

/// An existing object's content stream plus its provenance metadata.
pub struct ObjectBody {
    pub stream: ByteStream,
    pub metadata: HashMap<String, String>,
}

/// Blob store keyed by opaque identifiers.
///
/// Objects are immutable: every creation mints a fresh key, so backends never
/// need to handle overwrites.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `content` under `key` with the given provenance metadata.
    ///
    /// Must not partially apply: either the full object becomes readable and
    /// a reference is returned, or nothing is stored and an error is raised.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backend cannot complete the write.
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> Result<StoredObject, StoreError>;

    /// Fetch the object stored under `key`, or `None` if absent.
    ///
    /// The returned stream supports incremental chunk-at-a-time reads; the
    /// caller is never required to buffer the full object.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backend cannot be reached.
    async fn get(&self, key: &str) -> Result<Option<ObjectBody>, StoreError>;
}
