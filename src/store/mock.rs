//! In-process store serving fixture bills
//!
//! Records every call and can be told to fail the next call of a given
//! operation, which is how error scenarios are driven.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::StoreError;

use super::types::{Bill, BillStatus, CreatedBill, Credentials, ProofUpload};
use super::Store;

/// Base URL the mock pretends uploaded proofs are served from
const MOCK_FILE_HOST: &str = "https://localhost:3456/images";

/// Store operations, for call counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Create,
    Update,
    Login,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Login => write!(f, "login"),
        }
    }
}

#[derive(Default)]
struct CallCounts {
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    login: AtomicUsize,
}

impl CallCounts {
    fn counter(&self, op: Operation) -> &AtomicUsize {
        match op {
            Operation::List => &self.list,
            Operation::Create => &self.create,
            Operation::Update => &self.update,
            Operation::Login => &self.login,
        }
    }
}

/// Fixture-backed store
pub struct MockStore {
    bills: Mutex<Vec<Bill>>,
    failures: Mutex<VecDeque<(Operation, StoreError)>>,
    calls: CallCounts,
    next_key: AtomicUsize,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Store preloaded with the four fixture bills
    pub fn new() -> Self {
        Self::with_bills(fixture_bills())
    }

    /// Store with no bills
    pub fn empty() -> Self {
        Self::with_bills(Vec::new())
    }

    /// Store preloaded with `bills`
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: Mutex::new(bills),
            failures: Mutex::new(VecDeque::new()),
            calls: CallCounts::default(),
            next_key: AtomicUsize::new(1234),
        }
    }

    /// Make the next call of `op` fail with `error`
    ///
    /// Failures are consumed in the order they were queued; calls of other
    /// operations are unaffected.
    pub fn fail_next(&self, op: Operation, error: StoreError) {
        tracing::debug!(%op, %error, "Queueing one-shot failure");
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back((op, error));
        }
    }

    /// Number of times `op` has been called, failed calls included
    pub fn calls(&self, op: Operation) -> usize {
        self.calls.counter(op).load(Ordering::SeqCst)
    }

    /// Snapshot of the stored bills
    pub fn bills(&self) -> Vec<Bill> {
        self.bills.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Count the call and pop a queued failure for `op`, if any
    fn begin(&self, op: Operation) -> Result<(), StoreError> {
        self.calls.counter(op).fetch_add(1, Ordering::SeqCst);

        let mut failures = self
            .failures
            .lock()
            .map_err(|_| StoreError::Unknown("mock store poisoned".to_string()))?;
        if let Some(pos) = failures.iter().position(|(o, _)| *o == op) {
            if let Some((_, error)) = failures.remove(pos) {
                tracing::debug!(%op, %error, "Injected failure");
                return Err(error);
            }
        }
        Ok(())
    }

    fn with_bills_mut<T>(&self, f: impl FnOnce(&mut Vec<Bill>) -> T) -> Result<T, StoreError> {
        let mut bills = self
            .bills
            .lock()
            .map_err(|_| StoreError::Unknown("mock store poisoned".to_string()))?;
        Ok(f(&mut bills))
    }
}

#[async_trait]
impl Store for MockStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        self.begin(Operation::List)?;
        self.with_bills_mut(|bills| bills.clone())
    }

    async fn create(&self, upload: ProofUpload) -> Result<CreatedBill, StoreError> {
        self.begin(Operation::Create)?;

        let key = self.next_key.fetch_add(1, Ordering::SeqCst).to_string();
        let file_url = format!("{}/{}", MOCK_FILE_HOST, upload.file_name);

        self.with_bills_mut(|bills| {
            bills.push(Bill {
                id: Some(key.clone()),
                email: upload.email,
                file_url: file_url.clone(),
                file_name: upload.file_name,
                status: BillStatus::Pending,
                ..Default::default()
            });
        })?;

        Ok(CreatedBill { file_url, key })
    }

    async fn update(&self, id: &str, bill: &Bill) -> Result<Bill, StoreError> {
        self.begin(Operation::Update)?;

        let mut updated = bill.clone();
        updated.id = Some(id.to_string());

        self.with_bills_mut(|bills| {
            match bills.iter_mut().find(|b| b.id.as_deref() == Some(id)) {
                Some(existing) => *existing = updated.clone(),
                None => bills.push(updated.clone()),
            }
        })?;

        Ok(updated)
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, StoreError> {
        self.begin(Operation::Login)?;
        Ok(format!("mock-jwt-{}", credentials.email))
    }
}

/// The four bills every scenario starts from
pub fn fixture_bills() -> Vec<Bill> {
    let bill = |id: &str,
                expense_type: &str,
                name: &str,
                amount: i64,
                date: &str,
                vat: &str,
                commentary: &str,
                file_name: &str,
                status: BillStatus| Bill {
        id: Some(id.to_string()),
        email: "a@a".to_string(),
        expense_type: expense_type.to_string(),
        name: name.to_string(),
        amount,
        date: date.to_string(),
        vat: vat.to_string(),
        pct: 20,
        commentary: commentary.to_string(),
        file_url: format!("https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/justificatifs%2F{file_name}?alt=media"),
        file_name: file_name.to_string(),
        status,
    };

    vec![
        bill(
            "47qAXb6fIm2zOKkLzMro",
            "Hôtel et logement",
            "encore",
            400,
            "2004-04-04",
            "80",
            "séminaire billed",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Pending,
        ),
        bill(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "Transports",
            "test1",
            100,
            "2001-01-01",
            "",
            "plop",
            "1592770761.jpeg",
            BillStatus::Refused,
        ),
        bill(
            "UIUZtnPQvnbFnB0ozvJh",
            "Services en ligne",
            "test3",
            300,
            "2003-03-03",
            "60",
            "",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            BillStatus::Accepted,
        ),
        bill(
            "qcCK3SzECmaZAGRrHjaC",
            "Restaurants et bars",
            "test2",
            200,
            "2002-02-02",
            "40",
            "test2",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Refused,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> ProofUpload {
        ProofUpload {
            file_name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: b"jpg".to_vec(),
            email: "a@a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_returns_fixtures() {
        let store = MockStore::new();
        let bills = store.list().await.unwrap();
        assert_eq!(bills.len(), 4);
        assert_eq!(store.calls(Operation::List), 1);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = MockStore::new();
        store.fail_next(Operation::List, StoreError::NotFound);

        assert_eq!(store.list().await.unwrap_err(), StoreError::NotFound);
        assert!(store.list().await.is_ok());
        assert_eq!(store.calls(Operation::List), 2);
    }

    #[tokio::test]
    async fn test_fail_next_only_hits_its_operation() {
        let store = MockStore::new();
        store.fail_next(Operation::Update, StoreError::ServerError);

        assert!(store.list().await.is_ok());
        assert!(store.create(upload("a.png")).await.is_ok());
        let bill = Bill::default();
        assert_eq!(
            store.update("1234", &bill).await.unwrap_err(),
            StoreError::ServerError
        );
    }

    #[tokio::test]
    async fn test_create_then_update_replaces_record() {
        let store = MockStore::empty();
        let created = store.create(upload("test.jpg")).await.unwrap();
        assert_eq!(created.key, "1234");
        assert_eq!(created.file_url, "https://localhost:3456/images/test.jpg");

        let bill = Bill {
            name: "Vol Paris Londres".to_string(),
            amount: 348,
            ..Default::default()
        };
        let saved = store.update(&created.key, &bill).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("1234"));

        let bills = store.bills();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].name, "Vol Paris Londres");
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let store = MockStore::new();
        let jwt = store
            .login(&Credentials {
                email: "a@a".to_string(),
                password: "a".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(jwt, "mock-jwt-a@a");
    }
}
