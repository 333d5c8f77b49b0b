//! Command-line interface and processing pipeline
//!
//! Loads the transaction source, applies the optional dispute action feed,
//! and writes the requested report to the given writer. Malformed or
//! rejected rows are logged and skipped; only I/O failures are fatal.

mod args;

pub use args::{CliArgs, ReportType};

use crate::core::engine::DisputeEngine;
use crate::io::csv_format::{write_disputes_csv, write_transactions_csv, DisputeAction};
use crate::io::reader::{ActionReader, TransactionReader};
use crate::query::filter::{DisputeQuery, TransactionQuery, MAX_PAGE_SIZE};
use crate::types::dispute::Dispute;
use crate::types::error::DisputeError;
use crate::types::summary::{DisputeSummary, TransactionSummary};
use crate::types::transaction::Transaction;
use clap::Parser;
use log::{info, warn};
use std::collections::BTreeMap;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or the
/// --help flag), clap displays an error message or help text and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run the full pipeline: load, apply actions, write the report
///
/// # Errors
///
/// Returns an error if the transaction source or action feed cannot be
/// opened, or if writing the report fails. Individual malformed or rejected
/// rows are logged at warn level and skipped.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), DisputeError> {
    let engine = DisputeEngine::new();

    let mut loaded = 0u64;
    let mut skipped = 0u64;
    for result in TransactionReader::new(&args.transactions)? {
        match result.and_then(|record| engine.add_transaction(record)) {
            Ok(()) => loaded += 1,
            Err(e) => {
                warn!("skipping transaction row: {e}");
                skipped += 1;
            }
        }
    }
    info!("loaded {loaded} transactions ({skipped} skipped)");

    if let Some(actions_path) = &args.actions {
        let mut applied = 0u64;
        let mut rejected = 0u64;
        for result in ActionReader::new(actions_path)? {
            match result.and_then(|action| apply_action(&engine, action)) {
                Ok(()) => applied += 1,
                Err(e) => {
                    warn!("skipping action row: {e}");
                    rejected += 1;
                }
            }
        }
        info!("applied {applied} actions ({rejected} rejected)");
    }

    let accounts = match &args.account {
        Some(account) => vec![account.clone()],
        None => engine.accounts(),
    };

    match args.report {
        ReportType::Transactions => {
            let mut transactions = Vec::new();
            for account in &accounts {
                transactions.extend(all_transactions(&engine, account)?);
            }
            write_transactions_csv(&transactions, output)
                .map_err(|message| DisputeError::Io { message })
        }
        ReportType::Disputes => {
            let mut disputes = Vec::new();
            for account in &accounts {
                disputes.extend(all_disputes(&engine, account)?);
            }
            write_disputes_csv(&disputes, output).map_err(|message| DisputeError::Io { message })
        }
        ReportType::TransactionSummary => {
            let summaries: BTreeMap<String, TransactionSummary> = accounts
                .iter()
                .map(|account| (account.clone(), engine.transaction_summary(account)))
                .collect();
            write_json(&summaries, output)
        }
        ReportType::DisputeSummary => {
            let summaries: BTreeMap<String, DisputeSummary> = accounts
                .iter()
                .map(|account| (account.clone(), engine.dispute_summary(account)))
                .collect();
            write_json(&summaries, output)
        }
    }
}

fn apply_action(engine: &DisputeEngine, action: DisputeAction) -> Result<(), DisputeError> {
    match action {
        DisputeAction::File {
            account,
            transaction_id,
            reason,
            description,
            actor,
        } => {
            let dispute = engine.file_dispute(
                &account,
                &transaction_id,
                reason,
                &description,
                actor.as_deref(),
            )?;
            info!("filed dispute {} on {}", dispute.id, transaction_id);
            Ok(())
        }
        DisputeAction::Transition {
            account,
            dispute_id,
            status,
            notes,
            actor,
        } => {
            engine.transition(
                &account,
                &dispute_id,
                status,
                notes.as_deref(),
                actor.as_deref(),
            )?;
            info!("moved dispute {} to {}", dispute_id, status);
            Ok(())
        }
    }
}

/// Drain every page of an account's transactions
fn all_transactions(
    engine: &DisputeEngine,
    account: &str,
) -> Result<Vec<Transaction>, DisputeError> {
    let mut out = Vec::new();
    let mut page = 1i64;
    loop {
        let query = TransactionQuery {
            page: Some(page),
            limit: Some(i64::from(MAX_PAGE_SIZE)),
            ..Default::default()
        };
        let result = engine.list_transactions(account, &query)?;
        let has_next = result.page.has_next_page;
        out.extend(result.items);
        if !has_next {
            break;
        }
        page += 1;
    }
    Ok(out)
}

/// Drain every page of an account's disputes
fn all_disputes(engine: &DisputeEngine, account: &str) -> Result<Vec<Dispute>, DisputeError> {
    let mut out = Vec::new();
    let mut page = 1i64;
    loop {
        let query = DisputeQuery {
            page: Some(page),
            limit: Some(i64::from(MAX_PAGE_SIZE)),
            ..Default::default()
        };
        let result = engine.list_disputes(account, &query)?;
        let has_next = result.page.has_next_page;
        out.extend(result.items);
        if !has_next {
            break;
        }
        page += 1;
    }
    Ok(out)
}

fn write_json<T: serde::Serialize>(value: &T, output: &mut dyn Write) -> Result<(), DisputeError> {
    serde_json::to_writer_pretty(&mut *output, value).map_err(|e| DisputeError::Io {
        message: e.to_string(),
    })?;
    writeln!(output)?;
    Ok(())
}
