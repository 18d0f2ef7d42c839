//! Bill records and store payloads
//!
//! Field names follow the bills API (camelCase JSON).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense categories offered by the new bill form
pub const EXPENSE_TYPES: &[&str] = &[
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// Review status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Label shown in the bills table
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Accepted => "Accepté",
            Self::Refused => "Refused",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Refused => write!(f, "refused"),
        }
    }
}

/// An expense report as stored remotely
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    /// Expense category, one of [`EXPENSE_TYPES`]
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: i64,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub vat: String,
    pub pct: u32,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    pub status: BillStatus,
}

/// Proof file upload sent as a multipart create
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Email of the employee the proof belongs to
    pub email: String,
}

/// Answer to a proof upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    /// Id of the bill record created for this proof
    pub key: String,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_uses_api_field_names() {
        let bill: Bill = serde_json::from_value(serde_json::json!({
            "id": "47qAXb6fIm2zOKkLzMro",
            "type": "Hôtel et logement",
            "fileUrl": "https://test.storage.tld/a.jpg",
            "fileName": "a.jpg",
            "status": "accepted",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok"
        }))
        .unwrap();

        assert_eq!(bill.id.as_deref(), Some("47qAXb6fIm2zOKkLzMro"));
        assert_eq!(bill.expense_type, "Hôtel et logement");
        assert_eq!(bill.file_url, "https://test.storage.tld/a.jpg");
        assert_eq!(bill.status, BillStatus::Accepted);
        assert_eq!(bill.pct, 0);

        let value = serde_json::to_value(&bill).unwrap();
        assert_eq!(value["type"], "Hôtel et logement");
        assert_eq!(value["fileName"], "a.jpg");
        assert_eq!(value["status"], "accepted");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(BillStatus::Pending.label(), "En attente");
        assert_eq!(BillStatus::Accepted.label(), "Accepté");
        assert_eq!(BillStatus::Refused.label(), "Refused");
    }
}
