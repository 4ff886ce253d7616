//! Storage layer
//!
//! Records go to Upstash Redis when it is configured and the client could be
//! built. Otherwise, and for any single call the remote store fails, they go
//! to an in-process map.

pub mod memory;
pub mod upstash;

pub use memory::MemoryStore;
pub use upstash::UpstashStore;

use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracker_core::codec::{
    decode_weight, decode_weight_guess, encode_weight, encode_weight_guess, user_key,
    weight_guess_key, weight_key,
};
use tracker_core::{Credentials, KeyValueStore, StorageStatus, StorageType, WeightGuess};

/// Remote store connection parameters
#[derive(Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Set only when both URL and token are configured.
    pub remote: Option<RemoteConfig>,
    /// Seeded into memory when running without a remote store.
    pub bootstrap: Option<Credentials>,
}

/// Storage facade for users, weights and weight guesses.
///
/// No operation fails: `add_*` return `true` only when the record reached the
/// remote store, and lookups report any failure as a miss.
pub struct Storage {
    remote: Option<Arc<dyn KeyValueStore>>,
    memory: MemoryStore,
}

impl Storage {
    pub fn new(remote: Option<Arc<dyn KeyValueStore>>, memory: MemoryStore) -> Self {
        Self { remote, memory }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        let remote = match &config.remote {
            Some(remote) => match UpstashStore::new(&remote.url, &remote.token) {
                Ok(store) => {
                    info!("Connected to Upstash Redis at {}", store.host());
                    Some(Arc::new(store) as Arc<dyn KeyValueStore>)
                }
                Err(e) => {
                    error!("Failed to connect to Upstash Redis: {}", e);
                    None
                }
            },
            None => {
                info!("No Upstash credentials found, using in-memory storage");
                None
            }
        };

        let memory = MemoryStore::new();
        if remote.is_none() {
            match &config.bootstrap {
                Some(creds) => {
                    memory.insert(user_key(&creds.username), creds.password.clone());
                    info!("Seeded in-memory user: {}", creds.username);
                }
                None => warn!("No bootstrap user configured, nobody can log in until one is added"),
            }
        }

        Self::new(remote, memory)
    }

    pub fn is_connected(&self) -> bool {
        self.remote.is_some()
    }

    pub fn status(&self) -> StorageStatus {
        StorageStatus {
            storage_type: if self.is_connected() {
                StorageType::Remote
            } else {
                StorageType::Memory
            },
            remote_connected: self.is_connected(),
            memory_entries: self.memory.len(),
        }
    }

    // User operations
    pub async fn add_user(&self, username: &str, password: &str) -> bool {
        self.write(user_key(username), password.to_string()).await
    }

    pub async fn get_user(&self, username: &str) -> Option<String> {
        self.read(&user_key(username)).await
    }

    // Weight operations
    pub async fn add_weight(&self, weight: f64, date: NaiveDate) -> bool {
        self.write(weight_key(date), encode_weight(weight)).await
    }

    pub async fn get_weight(&self, date: NaiveDate) -> Option<f64> {
        let key = weight_key(date);
        let value = self.read(&key).await?;

        decode_weight(&key, &value)
            .map_err(|e| error!("Error decoding weight: {}", e))
            .ok()
    }

    // Weight guess operations
    pub async fn add_weight_guess(&self, username: &str, date: NaiveDate, weight: f64) -> bool {
        let guess = WeightGuess::new(date, weight);
        self.write(weight_guess_key(username), encode_weight_guess(&guess))
            .await
    }

    pub async fn get_weight_guess(&self, username: &str) -> Option<WeightGuess> {
        let key = weight_guess_key(username);
        let value = self.read(&key).await?;

        decode_weight_guess(&key, &value)
            .map_err(|e| error!("Error decoding weight guess: {}", e))
            .ok()
    }

    async fn write(&self, key: String, value: String) -> bool {
        if let Some(remote) = &self.remote {
            match remote.set(&key, &value).await {
                Ok(()) => return true,
                Err(e) => error!("Error writing {} to {}: {}", key, remote.name(), e),
            }
        }

        self.memory.insert(key, value);
        false
    }

    /// A remote miss is final. Memory is only consulted when the remote call
    /// itself failed, even though a connected facade never wrote there unless
    /// an earlier write also failed.
    async fn read(&self, key: &str) -> Option<String> {
        if let Some(remote) = &self.remote {
            match remote.get(key).await {
                Ok(value) => return value,
                Err(e) => error!("Error reading {} from {}: {}", key, remote.name(), e),
            }
        }

        self.memory.get(key)
    }
}
