//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use serde::Deserialize;

use crate::containers::NewBillForm;
use crate::session::UserType;
use crate::store::Operation;

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// Session stored before the first step; omit to start logged out
    pub session: Option<SessionConfig>,
    /// Initial contents of the mock store
    #[serde(default)]
    pub store: StoreSetup,
    /// The sequence of test steps to execute
    pub steps: Vec<TestStep>,
}

/// Session record to log in with
#[derive(Deserialize, Debug, Clone)]
pub struct SessionConfig {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub email: String,
}

/// Which bills the mock store starts with
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreSetup {
    /// The four fixture bills
    #[default]
    Fixtures,
    /// No bills at all
    Empty,
}

/// A single test step in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Store a session, as the login page would
    Login {
        #[serde(rename = "type")]
        user_type: UserType,
        #[serde(default)]
        email: String,
    },
    /// Clear the session
    Logout,
    /// Write a raw value into local storage
    SetItem { key: String, value: String },
    /// Navigate to a route path (e.g. "#employee/bills")
    Navigate { path: String },
    /// Make the next store call of `operation` fail
    FailNext {
        operation: Operation,
        /// Error message; classified by its status marker ("Erreur 404")
        error: String,
    },
    /// Click an element by test id
    Click { test_id: String },
    /// Click the eye icon of a table row
    ClickIconEye {
        #[serde(default)]
        index: usize,
    },
    /// Choose a proof file
    SelectFile {
        name: String,
        #[serde(default = "default_mime")]
        mime: String,
        /// Expected outcome of the validation
        expect: Option<FileExpectation>,
    },
    /// Submit the new bill form
    Submit {
        #[serde(default)]
        form: NewBillForm,
        expect: Option<CommandExpectation>,
    },
    /// Check the rendered page
    ExpectPage(PageExpectation),
    /// Check that bill dates are ordered most recent first
    ExpectDatesDescending,
    /// Check how many times store operations were called
    ExpectCalls {
        list: Option<usize>,
        create: Option<usize>,
        update: Option<usize>,
    },
}

fn default_mime() -> String {
    "image/jpeg".to_string()
}

/// Expectations for an action result
#[derive(Deserialize, Debug)]
pub struct CommandExpectation {
    /// Whether the action should succeed
    pub success: Option<bool>,
    /// Substring that should be in the error message
    pub error_contains: Option<String>,
}

/// Expected state of the proof input after a selection
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileExpectation {
    Valid,
    Invalid,
}

/// Assertions about the rendered page
#[derive(Deserialize, Debug, Default)]
pub struct PageExpectation {
    /// Page name ("bills", "new bill", "login", "error", ...)
    pub page: Option<String>,
    /// Substring the rendered text must contain
    pub contains: Option<String>,
    /// Substring the rendered text must not contain
    pub not_contains: Option<String>,
    /// Test id that must be present
    pub test_id: Option<String>,
    /// Test id of the icon that must be highlighted
    pub active_icon: Option<String>,
    /// Number of table rows
    pub rows: Option<usize>,
}
