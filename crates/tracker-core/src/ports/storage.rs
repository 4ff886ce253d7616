//! Storage trait for persistence

use crate::Result;
use async_trait::async_trait;

/// Flat string key-value store.
///
/// Implemented by the remote Upstash backend and by the in-process map the
/// server falls back to. Keys are already namespaced by record kind (see
/// [`crate::codec`]), so implementations never interpret them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
