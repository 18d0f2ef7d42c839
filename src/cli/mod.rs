//! CLI command handling
//!
//! Drives the [`App`] for each command and prints the rendered pages.

use std::sync::Arc;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::containers::{FileSelection, FileState, NewBillForm};
use crate::router::{App, Route};
use crate::session::{LocalStorage, Session, JWT_KEY};
use crate::store::{Credentials, HttpStore, MockStore, Store};
use crate::testing;
use crate::views::Page;

/// Options shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Serve fixture bills in-process instead of calling the API
    pub mock: bool,
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, options: Options) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Login {
            email,
            password,
            admin,
        } => {
            let mut storage = open_storage(&config)?;
            let store = open_store(&config, &storage, options)?;

            let jwt = store
                .login(&Credentials {
                    email: email.clone(),
                    password,
                })
                .await?;
            storage.set_item(JWT_KEY, jwt)?;

            let session = if admin {
                Session::admin(&email)
            } else {
                Session::employee(&email)
            };
            session.save(&mut storage)?;

            println!("Logged in as {} ({})", email, session.user_type);
            Ok(())
        }

        Commands::Logout => {
            let mut storage = open_storage(&config)?;
            Session::clear(&mut storage)?;
            println!("Logged out");
            Ok(())
        }

        Commands::Whoami => {
            let storage = open_storage(&config)?;
            match Session::load(&storage)? {
                Some(session) if session.email.is_empty() => println!("{}", session.user_type),
                Some(session) => println!("{} ({})", session.email, session.user_type),
                None => println!("Not logged in"),
            }
            Ok(())
        }

        Commands::Bills => {
            let mut app = open_app(&config, options)?;
            show_bills(&mut app).await?;
            print!("{}", app.render());
            Ok(())
        }

        Commands::Show { index } => {
            let mut app = open_app(&config, options)?;
            show_bills(&mut app).await?;
            let modal = app.click_icon_eye(index)?;
            print!("{}", modal);
            Ok(())
        }

        Commands::New {
            file,
            expense_type,
            name,
            amount,
            date,
            vat,
            pct,
            commentary,
        } => {
            let mut app = open_app(&config, options)?;
            app.navigate(Route::NewBill.path()).await?;
            require_login(&app, Route::NewBill)?;

            let selection = FileSelection::from_path(&file)?;
            if let FileState::Invalid { file_name, .. } = app.select_file(selection).await? {
                return Err(Error::invalid_proof(
                    file_name,
                    config.new_bill.allowed_extensions.as_slice(),
                ));
            }

            let form = NewBillForm {
                expense_type,
                name,
                amount,
                date,
                vat,
                pct,
                commentary,
            };
            let submitted = app.submit_new_bill(form).await;
            if let Err(e) = submitted {
                print!("{}", app.render());
                return Err(e);
            }

            println!("{}", "Bill sent".green());
            print!("{}", app.render());
            Ok(())
        }

        Commands::Test { scenarios, verbose } => {
            let mut results = Vec::with_capacity(scenarios.len());
            for path in &scenarios {
                results.push(testing::run_scenario(path, verbose).await?);
            }

            let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
            println!();
            for result in &failed {
                println!(
                    "{} {}: {}",
                    "✗".red(),
                    result.name,
                    result.error.as_deref().unwrap_or("failed")
                );
            }
            println!(
                "{} of {} scenario(s) passed",
                results.len() - failed.len(),
                results.len()
            );

            if failed.is_empty() {
                Ok(())
            } else {
                Err(Error::TestAssertion(format!(
                    "{} scenario(s) failed",
                    failed.len()
                )))
            }
        }
    }
}

fn open_storage(config: &Config) -> Result<LocalStorage> {
    match config.storage_path() {
        Some(path) => LocalStorage::open(&path),
        None => {
            tracing::warn!("No data directory available, session will not persist");
            Ok(LocalStorage::in_memory())
        }
    }
}

fn open_store(config: &Config, storage: &LocalStorage, options: Options) -> Result<Arc<dyn Store>> {
    if options.mock {
        tracing::debug!("Using mock store");
        return Ok(Arc::new(MockStore::new()));
    }
    let jwt = storage.get_item(JWT_KEY).map(String::from);
    Ok(Arc::new(HttpStore::new(&config.api, jwt)?))
}

fn open_app(config: &Config, options: Options) -> Result<App> {
    let storage = open_storage(config)?;
    let store = open_store(config, &storage, options)?;
    Ok(App::new(store, storage, config))
}

/// Turn a login redirect into an error naming what was missing
fn require_login(app: &App, route: Route) -> Result<()> {
    if app.page().is_protected() {
        return Ok(());
    }
    match (Session::load(app.storage())?, route.required_role()) {
        (Some(_), Some(required)) => Err(Error::Forbidden {
            route: route.path().to_string(),
            required: required.to_string(),
        }),
        _ => Err(Error::NotAuthenticated),
    }
}

/// Navigate to the bills page, turning a login redirect or an error panel
/// into an error
async fn show_bills(app: &mut App) -> Result<()> {
    app.navigate(Route::Bills.path()).await?;
    require_login(app, Route::Bills)?;

    if let Page::Error(e) = app.page() {
        let e = e.clone();
        print!("{}", app.render());
        return Err(e.into());
    }
    Ok(())
}
