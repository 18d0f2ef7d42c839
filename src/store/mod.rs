//! Remote store client for the bills collection
//!
//! Containers only see the [`Store`] trait. [`HttpStore`] talks to the bills
//! API; [`MockStore`] serves fixtures in-process for scenarios and tests.

pub mod http;
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::common::StoreError;

pub use http::HttpStore;
pub use mock::{MockStore, Operation};
pub use types::*;

/// Access to the bills collection
///
/// Every call settles to a `Result`; callers decide how to surface the
/// [`StoreError`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch every bill visible to the current user
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    /// Upload a proof file, creating the bill record it belongs to
    async fn create(&self, upload: ProofUpload) -> Result<CreatedBill, StoreError>;

    /// Replace the fields of bill `id`
    async fn update(&self, id: &str, bill: &Bill) -> Result<Bill, StoreError>;

    /// Exchange credentials for a bearer token
    async fn login(&self, credentials: &Credentials) -> Result<String, StoreError>;
}
