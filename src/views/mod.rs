//! Plain-text pages
//!
//! Each page renders the same headings and messages as the web front end
//! and tags interactive elements with their test id in brackets, e.g.
//! `[btn-new-bill]`. The active navigation icon is marked with `*`.

use std::fmt;

use crate::common::StoreError;
use crate::containers::bills::{BillRow, Modal};
use crate::containers::new_bill::FileState;
use crate::store::EXPENSE_TYPES;

pub const ICON_WINDOW: &str = "icon-window";
pub const ICON_MAIL: &str = "icon-mail";
pub const BTN_NEW_BILL: &str = "btn-new-bill";
pub const ICON_EYE: &str = "icon-eye";
pub const TBODY: &str = "tbody";
pub const FORM_NEW_BILL: &str = "form-new-bill";
pub const FILE_INPUT: &str = "file";
pub const ERROR_MESSAGE: &str = "error-message";

/// A rendered screen
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Login,
    Loading,
    Bills { rows: Vec<BillRow> },
    NewBill { file: FileState },
    Dashboard,
    Error(StoreError),
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Loading => "loading",
            Self::Bills { .. } => "bills",
            Self::NewBill { .. } => "new bill",
            Self::Dashboard => "dashboard",
            Self::Error(_) => "error",
        }
    }

    /// Test ids of the elements present on this page
    pub fn test_ids(&self) -> Vec<&'static str> {
        match self {
            Self::Login => vec![
                "form-employee",
                "employee-email-input",
                "employee-password-input",
                "employee-login-button",
                "form-admin",
                "admin-email-input",
                "admin-password-input",
                "admin-login-button",
            ],
            Self::Loading => Vec::new(),
            Self::Bills { rows } => {
                let mut ids = vec![ICON_WINDOW, ICON_MAIL, BTN_NEW_BILL, TBODY];
                if !rows.is_empty() {
                    ids.push(ICON_EYE);
                }
                ids
            }
            Self::NewBill { .. } => vec![
                ICON_WINDOW,
                ICON_MAIL,
                FORM_NEW_BILL,
                "expense-type",
                "expense-name",
                "datepicker",
                "amount",
                "vat",
                "pct",
                "commentary",
                FILE_INPUT,
            ],
            Self::Dashboard => vec!["dashboard"],
            Self::Error(_) => vec![ERROR_MESSAGE],
        }
    }

    pub fn has_test_id(&self, id: &str) -> bool {
        self.test_ids().contains(&id)
    }

    /// Highlighted icon of the vertical layout, if the page has one
    pub fn active_icon(&self) -> Option<&'static str> {
        match self {
            Self::Bills { .. } => Some(ICON_WINDOW),
            Self::NewBill { .. } => Some(ICON_MAIL),
            _ => None,
        }
    }

    /// Table rows of the bills page; empty on other pages
    pub fn rows(&self) -> &[BillRow] {
        match self {
            Self::Bills { rows } => rows,
            _ => &[],
        }
    }

    /// Whether the page exposes anything behind the login gate
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Loading)
    }
}

fn icon(id: &str, active: Option<&str>) -> String {
    if active == Some(id) {
        format!("[{id}]*")
    } else {
        format!("[{id}]")
    }
}

fn vertical_layout(f: &mut fmt::Formatter<'_>, active: Option<&str>) -> fmt::Result {
    writeln!(f, "Billed  {} {}", icon(ICON_WINDOW, active), icon(ICON_MAIL, active))?;
    writeln!(f, "{}", "-".repeat(72))
}

fn write_bills(f: &mut fmt::Formatter<'_>, rows: &[BillRow]) -> fmt::Result {
    writeln!(f, "Mes notes de frais    [{BTN_NEW_BILL}] Nouvelle note de frais")?;
    writeln!(f)?;
    writeln!(
        f,
        "{:<22} | {:<12} | {:<10} | {:>8} | {:<10} | Actions",
        "Type", "Nom", "Date", "Montant", "Statut"
    )?;
    writeln!(f, "[{TBODY}]")?;
    for row in rows {
        writeln!(
            f,
            "{:<22} | {:<12} | {:<10} | {:>6} € | {:<10} | [{ICON_EYE} data-bill-url={}]",
            row.bill.expense_type,
            row.bill.name,
            row.display_date,
            row.bill.amount,
            row.status_label,
            row.bill.file_url
        )?;
    }
    Ok(())
}

fn write_new_bill(f: &mut fmt::Formatter<'_>, file: &FileState) -> fmt::Result {
    writeln!(f, "Envoyer une note de frais")?;
    writeln!(f)?;
    writeln!(f, "[{FORM_NEW_BILL}]")?;
    writeln!(f, "  [expense-type] Type de dépense: {}", EXPENSE_TYPES.join(" / "))?;
    writeln!(f, "  [expense-name] Nom de la dépense")?;
    writeln!(f, "  [datepicker] Date")?;
    writeln!(f, "  [amount] Montant TTC")?;
    writeln!(f, "  [vat] TVA  [pct] %")?;
    writeln!(f, "  [commentary] Commentaire")?;

    write!(f, "  [{FILE_INPUT}] Justificatif: ")?;
    match file {
        FileState::NotChosen => writeln!(f, "aucun fichier")?,
        FileState::Valid { file_name, .. } => writeln!(f, "{file_name}")?,
        FileState::Invalid { message, .. } => writeln!(f, "aucun fichier (erreur: {message})")?,
    }
    writeln!(f, "  [btn-send-bill] Envoyer")
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => {
                writeln!(f, "Billed")?;
                writeln!(f, "Employé  [form-employee] [employee-email-input] [employee-password-input] [employee-login-button]")?;
                writeln!(f, "Administration  [form-admin] [admin-email-input] [admin-password-input] [admin-login-button]")
            }
            Self::Loading => writeln!(f, "Loading..."),
            Self::Bills { rows } => {
                vertical_layout(f, self.active_icon())?;
                write_bills(f, rows)
            }
            Self::NewBill { file } => {
                vertical_layout(f, self.active_icon())?;
                write_new_bill(f, file)
            }
            Self::Dashboard => {
                writeln!(f, "Validations  [dashboard]")
            }
            Self::Error(error) => {
                writeln!(f, "Erreur")?;
                writeln!(f, "[{ERROR_MESSAGE}] {error}")
            }
        }
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+-- {} --+", self.title)?;
        writeln!(f, "[modaleFile] <img width={} src={} alt=\"Bill\">", self.image_width, self.bill_url)
    }
}
