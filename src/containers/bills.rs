//! Bills list container
//!
//! Fetches the employee's bills, orders and formats them for the table, and
//! handles the table's actions (new bill button, eye icon).

use std::sync::Arc;

use crate::common::{format, StoreError};
use crate::router::Route;
use crate::session::Session;
use crate::store::{Bill, Store};

/// Title of the proof modal
pub const MODAL_TITLE: &str = "Justificatif";

/// A bill ready for the table
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub bill: Bill,
    /// Short French date, or the raw date if it could not be parsed
    pub display_date: String,
    pub status_label: &'static str,
}

impl BillRow {
    fn from_bill(bill: Bill) -> Self {
        let display_date = match format::format_date(&bill.date) {
            Some(formatted) => formatted,
            None => {
                tracing::warn!(date = %bill.date, id = ?bill.id, "Unparseable bill date, keeping raw value");
                bill.date.clone()
            }
        };
        let status_label = bill.status.label();

        Self {
            bill,
            display_date,
            status_label,
        }
    }

    /// The eye icon of this row
    pub fn eye_icon(&self) -> EyeIcon {
        EyeIcon {
            bill_url: self.bill.file_url.clone(),
        }
    }
}

/// Eye icon of a table row; carries the proof URL as `data-bill-url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyeIcon {
    pub bill_url: String,
}

/// Proof modal opened from an eye icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: &'static str,
    pub bill_url: String,
    /// Image width in pixels: half the modal width
    pub image_width: u32,
}

/// Container behind the bills page
pub struct BillsContainer {
    store: Arc<dyn Store>,
    session: Session,
}

impl BillsContainer {
    pub fn new(store: Arc<dyn Store>, session: Session) -> Self {
        Self { store, session }
    }

    /// Fetch bills, most recent first, with display fields filled in
    ///
    /// Store failures are returned as-is; the caller renders them.
    #[tracing::instrument(skip(self), fields(email = %self.session.email))]
    pub async fn get_bills(&self) -> Result<Vec<BillRow>, StoreError> {
        let mut bills = self.store.list().await?;

        // ISO dates: lexicographic order is chronological order
        bills.sort_by(|a, b| b.date.cmp(&a.date));

        let rows: Vec<BillRow> = bills.into_iter().map(BillRow::from_bill).collect();
        tracing::info!(count = rows.len(), "Fetched bills");
        Ok(rows)
    }

    /// The new bill button leads to the new bill form
    pub fn handle_click_new_bill(&self) -> Route {
        Route::NewBill
    }

    /// Open the proof modal for the clicked eye icon
    pub fn handle_click_icon_eye(&self, icon: &EyeIcon, modal_width: u32) -> Modal {
        tracing::debug!(url = %icon.bill_url, "Opening proof modal");
        Modal {
            title: MODAL_TITLE,
            bill_url: icon.bill_url.clone(),
            image_width: modal_width / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockStore, Operation};

    fn container(store: Arc<MockStore>) -> BillsContainer {
        BillsContainer::new(store, Session::employee("a@a"))
    }

    #[tokio::test]
    async fn test_get_bills_orders_most_recent_first() {
        let store = Arc::new(MockStore::new());
        let rows = container(store.clone()).get_bills().await.unwrap();

        let dates: Vec<&str> = rows.iter().map(|r| r.bill.date.as_str()).collect();
        assert_eq!(dates, vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(store.calls(Operation::List), 1);
    }

    #[tokio::test]
    async fn test_get_bills_formats_display_fields() {
        let rows = container(Arc::new(MockStore::new())).get_bills().await.unwrap();

        assert_eq!(rows[0].display_date, "4 Avr. 04");
        assert_eq!(rows[0].status_label, "En attente");
        assert_eq!(rows[1].status_label, "Accepté");
    }

    #[tokio::test]
    async fn test_get_bills_keeps_unparseable_date() {
        let store = MockStore::with_bills(vec![Bill {
            date: "bientôt".to_string(),
            ..Default::default()
        }]);
        let rows = container(Arc::new(store)).get_bills().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_date, "bientôt");
    }

    #[tokio::test]
    async fn test_get_bills_propagates_errors() {
        let store = Arc::new(MockStore::new());
        let bills = container(store.clone());

        store.fail_next(Operation::List, StoreError::NotFound);
        assert_eq!(bills.get_bills().await.unwrap_err(), StoreError::NotFound);

        store.fail_next(Operation::List, StoreError::ServerError);
        assert_eq!(bills.get_bills().await.unwrap_err(), StoreError::ServerError);

        // no retry happened behind the caller's back
        assert_eq!(store.calls(Operation::List), 2);
    }

    #[test]
    fn test_click_new_bill_navigates() {
        let bills = container(Arc::new(MockStore::new()));
        assert_eq!(bills.handle_click_new_bill(), Route::NewBill);
    }

    #[test]
    fn test_click_icon_eye_opens_modal() {
        let bills = container(Arc::new(MockStore::new()));
        let icon = EyeIcon {
            bill_url: "https://test.storage.tld/proof.jpg".to_string(),
        };

        let modal = bills.handle_click_icon_eye(&icon, 801);
        assert_eq!(modal.title, "Justificatif");
        assert_eq!(modal.bill_url, "https://test.storage.tld/proof.jpg");
        assert_eq!(modal.image_width, 400);
    }
}
