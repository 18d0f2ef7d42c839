//! Error types for the billed client
//!
//! Store failures are classified into [`StoreError`] so views can switch on
//! the kind instead of matching message text. Everything else goes through
//! the crate-wide [`Error`].

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Classified failure of a remote store call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The collection or record does not exist (HTTP 404)
    #[error("Erreur 404")]
    NotFound,

    /// The store failed while handling the request (HTTP 5xx)
    #[error("Erreur 500")]
    ServerError,

    /// Anything else, carrying whatever message the store gave back
    #[error("{0}")]
    Unknown(String),
}

impl StoreError {
    /// Classify an HTTP status code, keeping the body message for the
    /// unclassified case
    pub fn from_status(status: u16, message: &str) -> Self {
        match status {
            404 => Self::NotFound,
            500..=599 => Self::ServerError,
            _ => Self::Unknown(format!("{status}: {message}")),
        }
    }

    /// Classify a free-text error message by the status marker it contains
    ///
    /// Only used for sources that report errors as bare strings, such as
    /// scenario files written against the old `new Error("Erreur 404")` mocks.
    pub fn from_message(message: &str) -> Self {
        if message.contains("404") {
            Self::NotFound
        } else if message.contains("500") {
            Self::ServerError
        } else {
            Self::Unknown(message.to_string())
        }
    }
}

/// Main error type for the billed client
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Http(String),

    // === Session Errors ===
    #[error("Not logged in. Use 'billed login --email <email>' first")]
    NotAuthenticated,

    #[error("Route '{route}' requires an {required} session")]
    Forbidden { route: String, required: String },

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid session record: {0}")]
    InvalidSession(String),

    // === New Bill Errors ===
    #[error("Proof '{file_name}' rejected: only {allowed} files are accepted")]
    InvalidProof { file_name: String, allowed: String },

    #[error("No valid proof file selected. Choose a jpg, jpeg or png file first")]
    MissingProof,

    #[error("Invalid bill field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    // === UI Errors ===
    #[error("No element with test id '{0}' on the current page")]
    ElementNotFound(String),

    #[error("Cannot {action} on the {page} page")]
    InvalidState { action: String, page: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid proof error listing the accepted extensions
    pub fn invalid_proof<S: AsRef<str>>(file_name: &str, allowed: &[S]) -> Self {
        Self::InvalidProof {
            file_name: file_name.to_string(),
            allowed: allowed.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(action: &str, page: &str) -> Self {
        Self::InvalidState {
            action: action.to_string(),
            page: page.to_string(),
        }
    }

    /// The store error behind this error, if any
    pub fn as_store_error(&self) -> Option<&StoreError> {
        match self {
            Error::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(StoreError::from_status(404, "missing"), StoreError::NotFound);
        assert_eq!(StoreError::from_status(500, "boom"), StoreError::ServerError);
        assert_eq!(StoreError::from_status(503, "down"), StoreError::ServerError);
        assert_eq!(
            StoreError::from_status(401, "jwt expired"),
            StoreError::Unknown("401: jwt expired".to_string())
        );
    }

    #[test]
    fn test_from_message() {
        assert_eq!(StoreError::from_message("Erreur 404"), StoreError::NotFound);
        assert_eq!(StoreError::from_message("Erreur 500"), StoreError::ServerError);
        assert!(matches!(
            StoreError::from_message("connection reset"),
            StoreError::Unknown(_)
        ));
    }

    #[test]
    fn test_display_matches_error_panel_text() {
        assert_eq!(StoreError::NotFound.to_string(), "Erreur 404");
        assert_eq!(StoreError::ServerError.to_string(), "Erreur 500");
        assert_eq!(Error::from(StoreError::NotFound).to_string(), "Erreur 404");
    }

    #[test]
    fn test_invalid_proof_lists_extensions() {
        let err = Error::invalid_proof("scan.pdf", &["jpg", "jpeg", "png"]);
        assert_eq!(
            err.to_string(),
            "Proof 'scan.pdf' rejected: only jpg, jpeg, png files are accepted"
        );
    }
}
