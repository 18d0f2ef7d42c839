//! Route constants

use std::fmt;

use crate::common::{Error, Result};
use crate::session::UserType;

/// A page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    /// Path constant of this route
    pub const fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }

    /// Role a session needs to enter this route; `None` for public routes
    pub const fn required_role(&self) -> Option<UserType> {
        match self {
            Route::Login => None,
            Route::Bills | Route::NewBill => Some(UserType::Employee),
            Route::Dashboard => Some(UserType::Admin),
        }
    }

    /// Resolve a path; an empty path is the login page
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(Route::Login);
        }
        Self::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| Error::UnknownRoute(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
