//! Anonymous per-installation user identity.
//!
//! The id is synthesized on first use, persisted under a fixed key and
//! reused afterwards. Without storage the identity is `anonymous`.
//! Clearing the key orphans the old id; nothing migrates.

use chrono::Utc;

use crate::error::StorageError;
use crate::format::random_base36;
use crate::storage::KeyValueStore;

/// Storage key holding the identifier.
pub const USER_ID_KEY: &str = "learnaskill_user_id";

/// Identity reported when no storage is available.
pub const ANONYMOUS_USER: &str = "anonymous";

const RANDOM_SUFFIX_LEN: usize = 11;

/// `user_{unix_millis}_{random base-36}`.
pub fn generate_user_id() -> String {
    format!(
        "user_{}_{}",
        Utc::now().timestamp_millis(),
        random_base36(RANDOM_SUFFIX_LEN)
    )
}

#[derive(Debug)]
pub struct UserIdentity<S> {
    store: Option<S>,
}

impl<S: KeyValueStore> UserIdentity<S> {
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    /// Identity with no backing storage.
    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Stored id, creating and persisting one on first use.
    pub fn user_id(&self) -> Result<String, StorageError> {
        let Some(store) = &self.store else {
            return Ok(ANONYMOUS_USER.to_string());
        };
        if let Some(existing) = store.get(USER_ID_KEY)?.filter(|id| !id.is_empty()) {
            return Ok(existing);
        }
        let fresh = generate_user_id();
        store.set(USER_ID_KEY, &fresh)?;
        tracing::debug!(user_id = %fresh, "created anonymous user id");
        Ok(fresh)
    }

    /// Forget the stored id. A no-op without storage.
    pub fn clear_user_data(&self) -> Result<(), StorageError> {
        match &self.store {
            Some(store) => store.remove(USER_ID_KEY),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    #[test]
    fn generated_ids_have_the_expected_shape() {
        let id = generate_user_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "user");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), RANDOM_SUFFIX_LEN);
    }

    #[test]
    fn same_scope_returns_same_id() {
        let identity = UserIdentity::new(MemoryStore::new());
        let first = identity.user_id().unwrap();
        let second = identity.user_id().unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("user_"));
    }

    #[test]
    fn clearing_yields_a_new_id() {
        let identity = UserIdentity::new(MemoryStore::new());
        let before = identity.user_id().unwrap();
        identity.clear_user_data().unwrap();
        let after = identity.user_id().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn detached_identity_is_anonymous() {
        let identity: UserIdentity<MemoryStore> = UserIdentity::detached();
        assert!(!identity.is_persistent());
        assert_eq!(identity.user_id().unwrap(), ANONYMOUS_USER);
        identity.clear_user_data().unwrap();
        assert_eq!(identity.user_id().unwrap(), ANONYMOUS_USER);
    }

    #[test]
    fn id_persists_across_file_store_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client-state.json");
        let first = UserIdentity::new(FileStore::new(&path)).user_id().unwrap();
        let second = UserIdentity::new(FileStore::new(&path)).user_id().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn existing_value_is_reused_verbatim() {
        let store = MemoryStore::new();
        store.set(USER_ID_KEY, "user_1_legacy").unwrap();
        let identity = UserIdentity::new(&store);
        assert_eq!(identity.user_id().unwrap(), "user_1_legacy");
    }

    #[test]
    fn blank_stored_id_is_replaced() {
        let store = MemoryStore::new();
        store.set(USER_ID_KEY, "").unwrap();
        let identity = UserIdentity::new(&store);
        let id = identity.user_id().unwrap();
        assert!(id.starts_with("user_"));
        assert_eq!(store.get(USER_ID_KEY).unwrap().as_deref(), Some(id.as_str()));
    }
}
