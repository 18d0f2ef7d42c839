//! billed - employee expense report client
//!
//! This library holds the logic of the Billed front end (bill listing,
//! proof upload, new bill submission and session-gated navigation) behind a
//! [`store::Store`] trait, with an HTTP store for the real API and a mock
//! store for scenarios.

pub mod cli;
pub mod commands;
pub mod common;
pub mod containers;
pub mod router;
pub mod session;
pub mod store;
pub mod testing;
pub mod views;

// Re-export commonly used types for tests
pub use common::{Error, Result, StoreError};
pub use router::{App, Route};
pub use session::{LocalStorage, Session};
