//! Credential storage for the two service API keys.
//!
//! Keys live in a small key-value store behind the
//! [`CredentialStore`] trait, persisted under fixed names. Reads never
//! fail; writes fail only when the persistence medium itself is
//! inaccessible. The store is injected into the service clients rather
//! than read from a global, so tests can swap in a [`MemoryStore`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{from_reader, to_writer_pretty};

use crate::error::{Error, Result};

/// Key name for the onboarding-completion flag.
const ONBOARDING_KEY: &str = "zennfy_onboarding_complete";

/// Names the two opaque secrets the app holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Credential {
    /// Bearer token for the chat-completion endpoint.
    ChatKey,

    /// API key for the market-quotes endpoint.
    QuotesKey,
}

impl Credential {
    /// The fixed name the secret is persisted under.
    pub fn key(&self) -> &'static str {
        match self {
            Credential::ChatKey => "zennfy_perplexity_key",
            Credential::QuotesKey => "zennfy_cmc_key",
        }
    }
}

/// Persistent storage for credentials and the onboarding flag.
///
/// The two credentials are independent single-key entries; no
/// transactional grouping is needed. No validation of secret format
/// is performed; any non-empty string is accepted.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored secret, or `None` if absent. Never fails.
    fn get(&self, credential: Credential) -> Option<String>;

    /// Overwrites or creates the secret.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageUnavailable` if the persistence medium
    /// is inaccessible.
    fn set(&self, credential: Credential, value: &str) -> Result<()>;

    /// Returns true once the user has finished onboarding.
    fn onboarding_complete(&self) -> bool;

    /// Records whether onboarding has been completed.
    fn set_onboarding_complete(&self, complete: bool) -> Result<()>;
}

/// A credential store persisted as a single pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing entries.
    ///
    /// A missing file is an empty store, not an error; it is created
    /// on the first write.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageUnavailable` if the file exists but
    /// cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let file = File::open(&path).map_err(|err| {
                Error::storage_unavailable(
                    format!("failed to open credential store: {err}"),
                    Some(Box::new(err)),
                )
            })?;
            let reader = BufReader::new(file);
            from_reader(reader).map_err(|err| {
                Error::storage_unavailable(
                    format!("credential store did not parse: {err}"),
                    Some(Box::new(err)),
                )
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = Self::persist(&self.path, &entries) {
            // A value that never reached disk must not read back as
            // present; restore what was there before.
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn persist(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
        let file = File::create(path).map_err(|err| {
            Error::storage_unavailable(
                format!("failed to write credential store: {err}"),
                Some(Box::new(err)),
            )
        })?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, entries).map_err(|err| {
            Error::storage_unavailable(
                format!("failed to serialize credential store: {err}"),
                Some(Box::new(err)),
            )
        })
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }
}

impl CredentialStore for JsonFileStore {
    fn get(&self, credential: Credential) -> Option<String> {
        self.read_entry(credential.key())
    }

    fn set(&self, credential: Credential, value: &str) -> Result<()> {
        self.write_entry(credential.key(), value)
    }

    fn onboarding_complete(&self) -> bool {
        self.read_entry(ONBOARDING_KEY).as_deref() == Some("true")
    }

    fn set_onboarding_complete(&self, complete: bool) -> Result<()> {
        self.write_entry(ONBOARDING_KEY, if complete { "true" } else { "false" })
    }
}

/// An in-memory credential store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with both credentials, for tests.
    pub fn with_keys(chat_key: &str, quotes_key: &str) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.insert(Credential::ChatKey.key().to_string(), chat_key.to_string());
            entries.insert(
                Credential::QuotesKey.key().to_string(),
                quotes_key.to_string(),
            );
        }
        store
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, credential: Credential) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(credential.key()).cloned()
    }

    fn set(&self, credential: Credential, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(credential.key().to_string(), value.to_string());
        Ok(())
    }

    fn onboarding_complete(&self) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(ONBOARDING_KEY).map(String::as_str) == Some("true")
    }

    fn set_onboarding_complete(&self, complete: bool) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            ONBOARDING_KEY.to_string(),
            (if complete { "true" } else { "false" }).to_string(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("zennfy-store-{tag}-{}.json", std::process::id()));
        path
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get(Credential::ChatKey).is_none());

        store.set(Credential::ChatKey, "pplx-abc").unwrap();
        assert_eq!(store.get(Credential::ChatKey).as_deref(), Some("pplx-abc"));

        // Overwrite on resave.
        store.set(Credential::ChatKey, "pplx-def").unwrap();
        assert_eq!(store.get(Credential::ChatKey).as_deref(), Some("pplx-def"));

        // The other entry is independent.
        assert!(store.get(Credential::QuotesKey).is_none());
    }

    #[test]
    fn memory_store_onboarding_flag() {
        let store = MemoryStore::new();
        assert!(!store.onboarding_complete());
        store.set_onboarding_complete(true).unwrap();
        assert!(store.onboarding_complete());
        store.set_onboarding_complete(false).unwrap();
        assert!(!store.onboarding_complete());
    }

    #[test]
    fn file_store_persists_across_opens() {
        let path = temp_store_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get(Credential::QuotesKey).is_none());
        store.set(Credential::QuotesKey, "cmc-123").unwrap();
        store.set_onboarding_complete(true).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(Credential::QuotesKey).as_deref(),
            Some("cmc-123")
        );
        assert!(reopened.onboarding_complete());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_store_write_failure_is_storage_unavailable() {
        // Point at a path whose parent directory does not exist.
        let mut path = std::env::temp_dir();
        path.push("zennfy-no-such-dir");
        path.push("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        let err = store.set(Credential::ChatKey, "pplx-abc").unwrap_err();
        assert!(err.is_storage_unavailable());

        // The value never reached disk, so it must not read back.
        assert_eq!(store.get(Credential::ChatKey), None);
    }

    #[test]
    fn failed_overwrite_restores_previous_value() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("zennfy-restore-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set(Credential::ChatKey, "pplx-old").unwrap();

        // Yank the directory out from under the store; the overwrite
        // fails and the persisted value stays visible.
        std::fs::remove_dir_all(&dir).unwrap();
        let err = store.set(Credential::ChatKey, "pplx-new").unwrap_err();
        assert!(err.is_storage_unavailable());
        assert_eq!(store.get(Credential::ChatKey).as_deref(), Some("pplx-old"));
    }

    #[test]
    fn credential_key_names() {
        assert_eq!(Credential::ChatKey.key(), "zennfy_perplexity_key");
        assert_eq!(Credential::QuotesKey.key(), "zennfy_cmc_key");
    }
}
