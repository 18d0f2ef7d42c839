//! Navigation between pages
//!
//! [`App`] owns the current page, the local storage holding the session and
//! the container behind the page. Every user action goes through it.

mod routes;

use std::sync::Arc;

use crate::common::config::{Config, NewBillConfig};
use crate::common::{Error, Result};
use crate::containers::bills::{BillsContainer, Modal};
use crate::containers::new_bill::{FileSelection, FileState, NewBillContainer, NewBillForm};
use crate::session::{LocalStorage, Session};
use crate::store::Store;
use crate::views::{self, Page};

pub use routes::Route;

/// Container backing the current page
enum Active {
    None,
    Bills(BillsContainer),
    NewBill(NewBillContainer),
}

/// The running front end: current page plus the state behind it
pub struct App {
    store: Arc<dyn Store>,
    storage: LocalStorage,
    new_bill_config: NewBillConfig,
    modal_width: u32,
    page: Page,
    active: Active,
    modal: Option<Modal>,
}

impl App {
    pub fn new(store: Arc<dyn Store>, storage: LocalStorage, config: &Config) -> Self {
        Self {
            store,
            storage,
            new_bill_config: config.new_bill.clone(),
            modal_width: config.ui.modal_width,
            page: Page::Login,
            active: Active::None,
            modal: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Open modal, if any
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut LocalStorage {
        &mut self.storage
    }

    /// Current page followed by the open modal
    pub fn render(&self) -> String {
        match &self.modal {
            Some(modal) => format!("{}\n{}", self.page, modal),
            None => self.page.to_string(),
        }
    }

    /// Store `session` as the logged-in user
    pub fn login(&mut self, session: &Session) -> Result<()> {
        tracing::info!(user_type = %session.user_type, email = %session.email, "Logged in");
        session.save(&mut self.storage)
    }

    /// Forget the logged-in user and go back to the login page
    pub fn logout(&mut self) -> Result<()> {
        Session::clear(&mut self.storage)?;
        self.show(Page::Login, Active::None);
        tracing::info!("Logged out");
        Ok(())
    }

    fn show(&mut self, page: Page, active: Active) {
        tracing::debug!(page = page.name(), "Rendering page");
        self.page = page;
        self.active = active;
        self.modal = None;
    }

    /// Session allowed on `route`, or `None` when the guard blocks it
    ///
    /// An unreadable session record counts as no session.
    fn guard(&self, route: Route) -> Result<Option<Session>> {
        let session = match Session::load(&self.storage) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(route = route.path(), error = %e, "Ignoring unreadable session record");
                None
            }
        };
        let Some(required) = route.required_role() else {
            return Ok(session);
        };

        match session {
            Some(session) if session.user_type == required => Ok(Some(session)),
            Some(session) => {
                tracing::warn!(route = route.path(), user_type = %session.user_type, %required, "Wrong role for route");
                Ok(None)
            }
            None => {
                tracing::warn!(route = route.path(), "No session for protected route");
                Ok(None)
            }
        }
    }

    /// Render the page for `path`
    ///
    /// Protected routes without a matching session render the login page.
    pub async fn navigate(&mut self, path: &str) -> Result<()> {
        let route = Route::parse(path)?;
        self.go(route).await
    }

    #[tracing::instrument(skip(self), fields(path = route.path()))]
    async fn go(&mut self, route: Route) -> Result<()> {
        let Some(session) = self.guard(route)? else {
            self.show(Page::Login, Active::None);
            return Ok(());
        };

        match route {
            Route::Login => self.show(Page::Login, Active::None),
            Route::Bills => {
                self.show(Page::Loading, Active::None);
                let container = BillsContainer::new(self.store.clone(), session);
                match container.get_bills().await {
                    Ok(rows) => self.show(Page::Bills { rows }, Active::Bills(container)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Bills could not be loaded");
                        self.show(Page::Error(e), Active::None);
                    }
                }
            }
            Route::NewBill => {
                let container =
                    NewBillContainer::new(self.store.clone(), session, self.new_bill_config.clone());
                self.show(
                    Page::NewBill {
                        file: FileState::NotChosen,
                    },
                    Active::NewBill(container),
                );
            }
            Route::Dashboard => self.show(Page::Dashboard, Active::None),
        }
        Ok(())
    }

    /// Click the element with test id `test_id`
    ///
    /// Eye icons are per row; use [`App::click_icon_eye`] for those.
    pub async fn click(&mut self, test_id: &str) -> Result<()> {
        if !self.page.has_test_id(test_id) {
            return Err(Error::ElementNotFound(test_id.to_string()));
        }

        match test_id {
            views::BTN_NEW_BILL => self.click_new_bill().await,
            views::ICON_WINDOW => self.go(Route::Bills).await,
            views::ICON_MAIL => self.go(Route::NewBill).await,
            views::ICON_EYE => self.click_icon_eye(0).map(|_| ()),
            other => Err(Error::invalid_state(&format!("click '{other}'"), self.page.name())),
        }
    }

    /// Click the new bill button of the bills page
    pub async fn click_new_bill(&mut self) -> Result<()> {
        let Active::Bills(container) = &self.active else {
            return Err(Error::ElementNotFound(views::BTN_NEW_BILL.to_string()));
        };
        let route = container.handle_click_new_bill();
        self.go(route).await
    }

    /// Click the eye icon of table row `index`
    pub fn click_icon_eye(&mut self, index: usize) -> Result<&Modal> {
        let Active::Bills(container) = &self.active else {
            return Err(Error::ElementNotFound(views::ICON_EYE.to_string()));
        };
        let row = self
            .page
            .rows()
            .get(index)
            .ok_or_else(|| Error::ElementNotFound(format!("{}[{}]", views::ICON_EYE, index)))?;

        let modal = container.handle_click_icon_eye(&row.eye_icon(), self.modal_width);
        Ok(self.modal.insert(modal))
    }

    /// Close the proof modal
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Choose a proof file on the new bill page
    pub async fn select_file(&mut self, selection: FileSelection) -> Result<&FileState> {
        let Active::NewBill(container) = &mut self.active else {
            return Err(Error::ElementNotFound(views::FILE_INPUT.to_string()));
        };

        let result = container.handle_change_file(selection).await.map(|_| ());
        let file = container.file_state().clone();
        self.page = Page::NewBill { file };
        result?;

        match &self.page {
            Page::NewBill { file } => Ok(file),
            _ => Err(Error::Internal("new bill page vanished".to_string())),
        }
    }

    /// Submit the new bill form
    ///
    /// On success the bills page is shown. A store failure is rendered as the
    /// error page and returned.
    pub async fn submit_new_bill(&mut self, form: NewBillForm) -> Result<()> {
        let Active::NewBill(container) = &mut self.active else {
            return Err(Error::ElementNotFound(views::FORM_NEW_BILL.to_string()));
        };

        match container.handle_submit(form).await {
            Ok(route) => self.go(route).await,
            Err(Error::Store(e)) => {
                tracing::warn!(error = %e, "Bill could not be saved");
                self.show(Page::Error(e.clone()), Active::None);
                Err(Error::Store(e))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::StoreError;
    use crate::session::USER_KEY;
    use crate::store::{MockStore, Operation};

    fn app(store: Arc<MockStore>) -> App {
        App::new(store, LocalStorage::in_memory(), &Config::default())
    }

    fn employee_app(store: Arc<MockStore>) -> App {
        let mut app = app(store);
        app.login(&Session::employee("a@a")).unwrap();
        app
    }

    #[tokio::test]
    async fn test_bills_page_for_employee() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::Bills.path()).await.unwrap();

        assert!(matches!(app.page(), Page::Bills { .. }));
        assert_eq!(app.page().active_icon(), Some(views::ICON_WINDOW));
        assert!(app.render().contains("Mes notes de frais"));
        assert_eq!(app.page().rows().len(), 4);
    }

    #[tokio::test]
    async fn test_no_session_blocks_protected_routes() {
        let store = Arc::new(MockStore::new());
        let mut app = app(store.clone());

        for route in [Route::Bills, Route::NewBill, Route::Dashboard] {
            app.navigate(route.path()).await.unwrap();
            assert_eq!(app.page(), &Page::Login);
            assert!(!app.render().contains("Mes notes de frais"));
        }
        assert_eq!(store.calls(Operation::List), 0);
    }

    #[tokio::test]
    async fn test_unreadable_session_record_is_blocked() {
        let store = Arc::new(MockStore::new());
        let mut app = employee_app(store.clone());
        app.navigate(Route::Bills.path()).await.unwrap();
        assert_eq!(app.page().rows().len(), 4);

        for record in [r#"{"type":"employee"}"#, r#"{"type":"Intern"}"#, "not json"] {
            app.storage_mut().set_item(USER_KEY, record).unwrap();

            app.navigate(Route::NewBill.path()).await.unwrap();
            assert_eq!(app.page(), &Page::Login);

            app.navigate(Route::Bills.path()).await.unwrap();
            assert_eq!(app.page(), &Page::Login);
            assert!(!app.render().contains("Mes notes de frais"));
        }
        assert_eq!(store.calls(Operation::List), 1);
    }

    #[tokio::test]
    async fn test_wrong_role_is_blocked() {
        let mut app = app(Arc::new(MockStore::new()));
        app.login(&Session::admin("admin@billed.tld")).unwrap();

        app.navigate(Route::Bills.path()).await.unwrap();
        assert_eq!(app.page(), &Page::Login);

        app.navigate(Route::Dashboard.path()).await.unwrap();
        assert_eq!(app.page(), &Page::Dashboard);
    }

    #[tokio::test]
    async fn test_list_errors_render_error_page() {
        let store = Arc::new(MockStore::new());
        let mut app = employee_app(store.clone());

        store.fail_next(Operation::List, StoreError::NotFound);
        app.navigate(Route::Bills.path()).await.unwrap();
        assert!(app.render().contains("Erreur 404"));

        store.fail_next(Operation::List, StoreError::ServerError);
        app.navigate(Route::Bills.path()).await.unwrap();
        assert!(app.render().contains("Erreur 500"));
    }

    #[tokio::test]
    async fn test_new_bill_button() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::Bills.path()).await.unwrap();

        app.click(views::BTN_NEW_BILL).await.unwrap();
        assert!(app.render().contains("Envoyer une note de frais"));
        assert!(app.page().has_test_id(views::FORM_NEW_BILL));
        assert_eq!(app.page().active_icon(), Some(views::ICON_MAIL));
    }

    #[tokio::test]
    async fn test_icon_eye_opens_modal() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::Bills.path()).await.unwrap();

        let modal = app.click_icon_eye(0).unwrap();
        assert_eq!(modal.image_width, 400);
        assert!(app.render().contains("Justificatif"));

        app.close_modal();
        assert!(!app.render().contains("Justificatif"));
        assert!(app.click_icon_eye(17).is_err());
    }

    #[tokio::test]
    async fn test_click_missing_element() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::NewBill.path()).await.unwrap();

        let err = app.click(views::BTN_NEW_BILL).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_flow_returns_to_bills() {
        let store = Arc::new(MockStore::new());
        let mut app = employee_app(store.clone());
        app.navigate(Route::NewBill.path()).await.unwrap();

        app.select_file(FileSelection::new("test.jpg", "image/jpg", b"img".to_vec()))
            .await
            .unwrap();
        app.submit_new_bill(NewBillForm {
            expense_type: "Transports".to_string(),
            name: "Vol".to_string(),
            amount: 348,
            date: "2022-04-12".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(matches!(app.page(), Page::Bills { .. }));
        assert_eq!(app.page().rows().len(), 5);
        assert_eq!(app.page().rows()[0].bill.date, "2022-04-12");
        assert_eq!(store.calls(Operation::Update), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_renders_error() {
        let store = Arc::new(MockStore::new());
        let mut app = employee_app(store.clone());
        app.navigate(Route::NewBill.path()).await.unwrap();
        app.select_file(FileSelection::new("test.png", "image/png", Vec::new()))
            .await
            .unwrap();

        store.fail_next(Operation::Update, StoreError::ServerError);
        let err = app
            .submit_new_bill(NewBillForm {
                expense_type: "Transports".to_string(),
                amount: 10,
                date: "2022-04-12".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.as_store_error(), Some(&StoreError::ServerError));
        assert!(app.render().contains("Erreur 500"));
    }

    #[tokio::test]
    async fn test_invalid_file_updates_page() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::NewBill.path()).await.unwrap();

        let state = app
            .select_file(FileSelection::new("facture.pdf", "application/pdf", Vec::new()))
            .await
            .unwrap();
        assert!(matches!(state, FileState::Invalid { .. }));
        assert!(app.render().contains("erreur"));
    }

    #[tokio::test]
    async fn test_logout() {
        let mut app = employee_app(Arc::new(MockStore::new()));
        app.navigate(Route::Bills.path()).await.unwrap();
        app.logout().unwrap();

        assert_eq!(app.page(), &Page::Login);
        app.navigate(Route::Bills.path()).await.unwrap();
        assert_eq!(app.page(), &Page::Login);
    }
}
