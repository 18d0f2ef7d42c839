//! Test runner implementation
//!
//! Executes test scenarios against an [`App`] backed by a [`MockStore`],
//! asserting on structured page state rather than on terminal output.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use crate::common::config::Config;
use crate::common::{Error, Result, StoreError};
use crate::containers::{FileSelection, FileState};
use crate::router::App;
use crate::session::{LocalStorage, Session, UserType};
use crate::store::{MockStore, Operation};

use super::config::{
    CommandExpectation, FileExpectation, PageExpectation, StoreSetup, TestScenario, TestStep,
};

/// Result of a test run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Load a scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<TestScenario> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read test scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_scenario(&content)
}

/// Parse a scenario from YAML text
pub fn parse_scenario(content: &str) -> Result<TestScenario> {
    serde_yaml::from_str(content)
        .map_err(|e| Error::Config(format!("Failed to parse test scenario: {}", e)))
}

/// Run a test scenario from a YAML file
pub async fn run_scenario(path: &Path, verbose: bool) -> Result<TestResult> {
    let scenario = load_scenario(path)?;
    run(&scenario, verbose).await
}

/// Run an already loaded scenario
pub async fn run(scenario: &TestScenario, verbose: bool) -> Result<TestResult> {
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let store = Arc::new(match scenario.store {
        StoreSetup::Fixtures => MockStore::new(),
        StoreSetup::Empty => MockStore::empty(),
    });
    let mut app = App::new(store.clone(), LocalStorage::in_memory(), &Config::default());

    if let Some(session) = &scenario.session {
        app.login(&session_for(session.user_type, &session.email))?;
    }

    println!("\n{}", "Steps:".cyan());

    for (i, step) in scenario.steps.iter().enumerate() {
        let label = describe_step(step);
        tracing::debug!(step = i + 1, %label, "Executing step");

        if let Err(e) = execute_step(&mut app, &store, step).await {
            println!("  {} {}", "✗".red(), label);
            println!("    {}", e.to_string().red());
            if verbose {
                println!("{}", indent(&app.render()).dimmed());
            }
            return Ok(TestResult {
                name: scenario.name.clone(),
                passed: false,
                steps_run: i + 1,
                steps_total,
                error: Some(format!("Step {} ({}): {}", i + 1, label, e)),
            });
        }

        println!("  {} {}", "✓".green(), label);
        if verbose {
            println!("{}", indent(&app.render()).dimmed());
        }
    }

    println!(
        "\n{} {}",
        "✓".green().bold(),
        format!("{} passed ({} steps)", scenario.name, steps_total).green()
    );

    Ok(TestResult {
        name: scenario.name.clone(),
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

fn session_for(user_type: UserType, email: &str) -> Session {
    match user_type {
        UserType::Employee => Session::employee(email),
        UserType::Admin => Session::admin(email),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("      {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_step(step: &TestStep) -> String {
    match step {
        TestStep::Login { user_type, email } => format!("login as {user_type} {email}"),
        TestStep::Logout => "logout".to_string(),
        TestStep::SetItem { key, .. } => format!("set storage item {key}"),
        TestStep::Navigate { path } => format!("navigate to {path}"),
        TestStep::FailNext { operation, error } => format!("fail next {operation} with '{error}'"),
        TestStep::Click { test_id } => format!("click {test_id}"),
        TestStep::ClickIconEye { index } => format!("click icon-eye #{index}"),
        TestStep::SelectFile { name, .. } => format!("select file {name}"),
        TestStep::Submit { .. } => "submit form-new-bill".to_string(),
        TestStep::ExpectPage(_) => "expect page".to_string(),
        TestStep::ExpectDatesDescending => "expect dates most recent first".to_string(),
        TestStep::ExpectCalls { .. } => "expect store calls".to_string(),
    }
}

async fn execute_step(app: &mut App, store: &MockStore, step: &TestStep) -> Result<()> {
    match step {
        TestStep::Login { user_type, email } => app.login(&session_for(*user_type, email)),

        TestStep::Logout => app.logout(),

        TestStep::SetItem { key, value } => app.storage_mut().set_item(key, value.as_str()),

        TestStep::Navigate { path } => app.navigate(path).await,

        TestStep::FailNext { operation, error } => {
            store.fail_next(*operation, StoreError::from_message(error));
            Ok(())
        }

        TestStep::Click { test_id } => app.click(test_id).await,

        TestStep::ClickIconEye { index } => app.click_icon_eye(*index).map(|_| ()),

        TestStep::SelectFile { name, mime, expect } => {
            let selection = FileSelection::new(name, mime, name.as_bytes().to_vec());
            let state = app.select_file(selection).await?;

            if let Some(expected) = expect {
                let actual = match state {
                    FileState::Valid { .. } => FileExpectation::Valid,
                    _ => FileExpectation::Invalid,
                };
                if actual != *expected {
                    return Err(Error::TestAssertion(format!(
                        "file '{}': expected {:?}, got {:?}",
                        name, expected, state
                    )));
                }
            }
            Ok(())
        }

        TestStep::Submit { form, expect } => {
            let result = app.submit_new_bill(form.clone()).await;
            check_command_result(result, expect.as_ref())
        }

        TestStep::ExpectPage(expect) => check_page(app, expect),

        TestStep::ExpectDatesDescending => {
            let rows = app.page().rows();
            if rows.is_empty() {
                return Err(Error::TestAssertion(format!(
                    "no bill rows on the {} page",
                    app.page().name()
                )));
            }
            let dates: Vec<&str> = rows.iter().map(|r| r.bill.date.as_str()).collect();
            if dates.windows(2).any(|w| w[0] < w[1]) {
                return Err(Error::TestAssertion(format!(
                    "dates not ordered most recent first: {:?}",
                    dates
                )));
            }
            Ok(())
        }

        TestStep::ExpectCalls {
            list,
            create,
            update,
        } => {
            for (op, expected) in [
                (Operation::List, list),
                (Operation::Create, create),
                (Operation::Update, update),
            ] {
                if let Some(expected) = expected {
                    let actual = store.calls(op);
                    if actual != *expected {
                        return Err(Error::TestAssertion(format!(
                            "expected {} {} call(s), got {}",
                            expected, op, actual
                        )));
                    }
                }
            }
            Ok(())
        }
    }
}

fn check_command_result(result: Result<()>, expect: Option<&CommandExpectation>) -> Result<()> {
    let expected_success = expect.and_then(|e| e.success).unwrap_or(true);

    match (result, expected_success) {
        (Ok(()), true) => Ok(()),
        (Ok(()), false) => Err(Error::TestAssertion(
            "expected the action to fail, but it succeeded".to_string(),
        )),
        (Err(e), true) => Err(e),
        (Err(e), false) => {
            if let Some(needle) = expect.and_then(|x| x.error_contains.as_deref()) {
                let message = e.to_string();
                if !message.contains(needle) {
                    return Err(Error::TestAssertion(format!(
                        "error '{}' does not contain '{}'",
                        message, needle
                    )));
                }
            }
            Ok(())
        }
    }
}

fn check_page(app: &App, expect: &PageExpectation) -> Result<()> {
    let page = app.page();
    let rendered = app.render();

    if let Some(name) = &expect.page {
        if page.name() != name {
            return Err(Error::TestAssertion(format!(
                "expected the {} page, got the {} page",
                name,
                page.name()
            )));
        }
    }

    if let Some(needle) = &expect.contains {
        if !rendered.contains(needle.as_str()) {
            return Err(Error::TestAssertion(format!(
                "page does not contain '{}'",
                needle
            )));
        }
    }

    if let Some(needle) = &expect.not_contains {
        if rendered.contains(needle.as_str()) {
            return Err(Error::TestAssertion(format!(
                "page unexpectedly contains '{}'",
                needle
            )));
        }
    }

    if let Some(id) = &expect.test_id {
        if !page.has_test_id(id) {
            return Err(Error::TestAssertion(format!(
                "no element with test id '{}' on the {} page",
                id,
                page.name()
            )));
        }
    }

    if let Some(icon) = &expect.active_icon {
        if page.active_icon() != Some(icon.as_str()) {
            return Err(Error::TestAssertion(format!(
                "expected '{}' to be highlighted, got {:?}",
                icon,
                page.active_icon()
            )));
        }
    }

    if let Some(rows) = expect.rows {
        if page.rows().len() != rows {
            return Err(Error::TestAssertion(format!(
                "expected {} rows, got {}",
                rows,
                page.rows().len()
            )));
        }
    }

    Ok(())
}
