//! Dispute Engine CLI
//!
//! Command-line interface for browsing transactions and working disputes
//! from CSV feeds.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > disputes.csv
//! cargo run -- --actions actions.csv transactions.csv > disputes.csv
//! cargo run -- --actions actions.csv --report transactions transactions.csv
//! cargo run -- --report dispute-summary --account acct-1 transactions.csv
//! ```
//!
//! The program loads transaction records from the input CSV, applies the
//! optional dispute action feed, and writes the selected report to stdout.
//! Malformed or rejected rows are logged to stderr and skipped; set
//! `RUST_LOG=info` to see per-row outcomes.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, write failure, etc.)

use dispute_engine::cli;
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();

    // Reports go to stdout, diagnostics to stderr via the logger
    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
