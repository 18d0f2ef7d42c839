//! Logged-in user session
//!
//! The session is the `"user"` record in [`LocalStorage`]. It is loaded
//! explicitly and handed to containers; nothing reads it from global state.

mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{Error, Result};

pub use storage::LocalStorage;

/// Storage key of the session record
pub const USER_KEY: &str = "user";

/// Storage key of the API bearer token
pub const JWT_KEY: &str = "jwt";

/// Role of the logged-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employee => write!(f, "Employee"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// Identity stored at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn employee(email: &str) -> Self {
        Self {
            user_type: UserType::Employee,
            email: email.to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self {
            user_type: UserType::Admin,
            email: email.to_string(),
        }
    }

    /// Read the session from storage; `None` when nobody is logged in
    pub fn load(storage: &LocalStorage) -> Result<Option<Self>> {
        match storage.get_item(USER_KEY) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| Error::InvalidSession(e.to_string())),
            None => Ok(None),
        }
    }

    /// Persist this session as the current user
    pub fn save(&self, storage: &mut LocalStorage) -> Result<()> {
        storage.set_item(USER_KEY, serde_json::to_string(self)?)
    }

    /// Forget the current user and its token
    pub fn clear(storage: &mut LocalStorage) -> Result<()> {
        storage.remove_item(USER_KEY)?;
        storage.remove_item(JWT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let mut storage = LocalStorage::in_memory();
        assert_eq!(Session::load(&storage).unwrap(), None);

        Session::employee("a@a").save(&mut storage).unwrap();
        assert_eq!(
            storage.get_item(USER_KEY),
            Some(r#"{"type":"Employee","email":"a@a"}"#)
        );
        assert_eq!(Session::load(&storage).unwrap(), Some(Session::employee("a@a")));
    }

    #[test]
    fn test_load_record_without_email() {
        let mut storage = LocalStorage::in_memory();
        storage.set_item(USER_KEY, r#"{"type":"Employee"}"#).unwrap();

        let session = Session::load(&storage).unwrap().unwrap();
        assert_eq!(session.user_type, UserType::Employee);
        assert!(session.email.is_empty());
    }

    #[test]
    fn test_load_ignores_extra_login_fields() {
        let mut storage = LocalStorage::in_memory();
        storage
            .set_item(
                USER_KEY,
                r#"{"type":"Admin","email":"admin@billed.tld","password":"x","status":"connected"}"#,
            )
            .unwrap();

        assert_eq!(
            Session::load(&storage).unwrap(),
            Some(Session::admin("admin@billed.tld"))
        );
    }

    #[test]
    fn test_invalid_record() {
        let mut storage = LocalStorage::in_memory();
        storage.set_item(USER_KEY, r#"{"type":"Intern"}"#).unwrap();
        assert!(matches!(Session::load(&storage), Err(Error::InvalidSession(_))));
    }

    #[test]
    fn test_clear_removes_token() {
        let mut storage = LocalStorage::in_memory();
        Session::employee("a@a").save(&mut storage).unwrap();
        storage.set_item(JWT_KEY, "token").unwrap();

        Session::clear(&mut storage).unwrap();
        assert!(storage.get_item(USER_KEY).is_none());
        assert!(storage.get_item(JWT_KEY).is_none());
    }
}
