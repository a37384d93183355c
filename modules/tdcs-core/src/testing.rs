// Storage doubles for tests.
//
// UnavailableStore fails every read and write, the way a browser behaves with
// cookies or session storage disabled.

use chrono::Duration;

use crate::error::{StorageError, StorageResult};
use crate::storage::{DurableStore, SessionStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl DurableStore for UnavailableStore {
    fn get(&self, _name: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("cookies disabled".into()))
    }

    fn set(
        &mut self,
        name: &str,
        _value: &str,
        _lifetime: Duration,
        _domain: &str,
    ) -> StorageResult<()> {
        Err(StorageError::WriteRejected {
            key: name.to_string(),
            reason: "cookies disabled".into(),
        })
    }
}

impl SessionStore for UnavailableStore {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("session storage disabled".into()))
    }

    fn set_item(&mut self, key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::WriteRejected {
            key: key.to_string(),
            reason: "session storage disabled".into(),
        })
    }
}
