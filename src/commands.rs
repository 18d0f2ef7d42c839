//! CLI command definitions
//!
//! Defines the clap commands for the billed CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, default_value = "")]
        password: String,

        /// Log in as an administrator instead of an employee
        #[arg(long)]
        admin: bool,
    },

    /// Forget the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List your bills, most recent first
    #[command(alias = "ls")]
    Bills,

    /// Show the proof of a bill from the list
    #[command(alias = "eye")]
    Show {
        /// Row number in the bills list (0 = most recent)
        index: usize,
    },

    /// Send a new expense report
    New {
        /// Proof file (jpg, jpeg or png)
        #[arg(long)]
        file: PathBuf,

        /// Expense category (e.g. "Transports")
        #[arg(long = "type")]
        expense_type: String,

        /// Expense name
        #[arg(long, default_value = "")]
        name: String,

        /// Amount including taxes, in euros
        #[arg(long)]
        amount: i64,

        /// Expense date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// VAT amount
        #[arg(long, default_value = "")]
        vat: String,

        /// VAT percentage (default from config, usually 20)
        #[arg(long)]
        pct: Option<u32>,

        /// Free comment
        #[arg(long, default_value = "")]
        commentary: String,
    },

    /// Run YAML test scenarios against the mock store
    Test {
        /// Scenario files
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,

        /// Print every rendered page
        #[arg(long, short)]
        verbose: bool,
    },
}
