//! Common utilities shared by the library and the CLI

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;

pub use error::{Error, Result, StoreError};

/// Lowercased extension of a file name, if it has one
///
/// `"Receipt.JPG"` gives `Some("jpg")`; names without a dot or ending in a
/// dot give `None`.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
