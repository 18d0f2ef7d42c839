//! Page containers
//!
//! A container holds the logic behind one page. It receives the store and
//! the session when constructed and answers user actions with data or a
//! route to follow; it never renders anything itself.

pub mod bills;
pub mod new_bill;

pub use bills::{BillRow, BillsContainer, EyeIcon, Modal};
pub use new_bill::{FileSelection, FileState, NewBillContainer, NewBillForm};
