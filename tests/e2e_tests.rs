//! End-to-end integration tests
//!
//! These tests validate the complete pipeline two ways:
//! 1. Through the library API: a full dispute lifecycle walkthrough from
//!    ingest to resolution, checking effective statuses, history, and
//!    summaries at each step
//! 2. Through the CLI pipeline: temp CSV feeds in, report out, including
//!    skip-and-continue behavior for malformed and rejected rows

use dispute_engine::cli::{self, CliArgs};
use dispute_engine::{
    DisputeEngine, DisputeError, DisputeQuery, DisputeReason, DisputeStatus, TransactionCategory,
    TransactionQuery, TransactionRecord, TransactionStatus,
};
use clap::Parser;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

const ACCT: &str = "acct-1";

fn record(id: &str, amount: i64, merchant: &str, date: &str) -> TransactionRecord {
    TransactionRecord {
        id: id.to_string(),
        account: ACCT.to_string(),
        amount: Decimal::new(amount, 2),
        merchant: merchant.to_string(),
        category: TransactionCategory::Shopping,
        description: None,
        date: date.parse().unwrap(),
        status: TransactionStatus::Completed,
    }
}

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Full lifecycle: file, review, deny with notes, then verify terminal state
#[test]
fn test_full_dispute_lifecycle() {
    let engine = DisputeEngine::new();
    engine
        .add_transaction(record("txn-1", 50000, "Acme Stores", "2024-03-01"))
        .unwrap();

    // File: dispute opens, transaction reads as disputed
    let dispute = engine
        .file_dispute(
            ACCT,
            "txn-1",
            DisputeReason::Unauthorized,
            "did not make this purchase",
            Some("user-1"),
        )
        .unwrap();
    assert_eq!(dispute.status, DisputeStatus::Open);
    assert_eq!(dispute.transaction.amount, Decimal::new(50000, 2));
    assert_eq!(dispute.history.len(), 1);

    let detail = engine.get_transaction(ACCT, "txn-1").unwrap();
    assert_eq!(detail.transaction.status, TransactionStatus::Disputed);

    // Review
    let reviewed = engine
        .transition(ACCT, &dispute.id, DisputeStatus::UnderReview, None, Some("agent-7"))
        .unwrap();
    assert_eq!(reviewed.history.len(), 2);
    assert_eq!(reviewed.resolved_at, None);

    // Deny with resolution notes
    let denied = engine
        .transition(
            ACCT,
            &dispute.id,
            DisputeStatus::ResolvedDenied,
            Some("verified by cardholder"),
            Some("agent-7"),
        )
        .unwrap();
    assert_eq!(denied.status, DisputeStatus::ResolvedDenied);
    assert!(denied.resolved_at.is_some());
    assert_eq!(denied.resolution_notes.as_deref(), Some("verified by cardholder"));
    assert_eq!(denied.history.len(), 3);

    // Transaction reverts to its posted status but stays marked
    let detail = engine.get_transaction(ACCT, "txn-1").unwrap();
    assert_eq!(detail.transaction.status, TransactionStatus::Completed);
    assert!(detail.transaction.has_dispute);

    // No move out of a resolved-denied state except close
    assert_eq!(
        engine
            .transition(ACCT, &dispute.id, DisputeStatus::UnderReview, None, None)
            .unwrap_err(),
        DisputeError::invalid_transition(DisputeStatus::ResolvedDenied, DisputeStatus::UnderReview)
    );

    // And no second dispute, ever
    assert_eq!(
        engine
            .file_dispute(ACCT, "txn-1", DisputeReason::Other, "retry", None)
            .unwrap_err(),
        DisputeError::transaction_already_disputed("txn-1")
    );
}

/// Listing contract: filters compose, pages are stable, summaries are global
#[test]
fn test_listing_and_summary_contract() {
    let engine = DisputeEngine::new();
    for i in 1..=25 {
        let merchant = if i % 2 == 0 { "Acme Stores" } else { "Corner Shop" };
        engine
            .add_transaction(record(
                &format!("txn-{i:02}"),
                i * 100,
                merchant,
                &format!("2024-01-{:02}", i),
            ))
            .unwrap();
    }

    // Default page: 10 newest-first by date
    let page = engine
        .list_transactions(ACCT, &TransactionQuery::default())
        .unwrap();
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.page.total_items, 25);
    assert_eq!(page.page.total_pages, 3);
    assert!(page.page.has_next_page);
    assert!(!page.page.has_previous_page);
    assert_eq!(page.items[0].id, "txn-25");

    // Filter + paginate: metadata reflects the filtered set
    let query = TransactionQuery {
        search: Some("acme".to_string()),
        limit: Some(5),
        page: Some(3),
        ..Default::default()
    };
    let filtered = engine.list_transactions(ACCT, &query).unwrap();
    assert_eq!(filtered.page.total_items, 12);
    assert_eq!(filtered.page.total_pages, 3);
    assert_eq!(filtered.items.len(), 2);
    assert!(!filtered.page.has_next_page);

    // Summary covers all 25, independent of any page
    let summary = engine.transaction_summary(ACCT);
    assert_eq!(summary.total_transactions, 25);
    assert_eq!(summary.total_amount, Decimal::new(32500, 2)); // 1+2+..+25 dollars
}

/// Disputes across accounts stay confidential
#[test]
fn test_account_isolation_end_to_end() {
    let engine = DisputeEngine::new();
    engine
        .add_transaction(record("txn-1", 100, "Acme", "2024-01-01"))
        .unwrap();
    let mut other = record("txn-2", 200, "Acme", "2024-01-02");
    other.account = "acct-2".to_string();
    engine.add_transaction(other).unwrap();

    engine
        .file_dispute(ACCT, "txn-1", DisputeReason::Unauthorized, "not mine", None)
        .unwrap();

    // acct-2 sees only its own data
    let theirs = engine
        .list_transactions("acct-2", &TransactionQuery::default())
        .unwrap();
    assert_eq!(theirs.items.len(), 1);
    assert_eq!(theirs.items[0].id, "txn-2");
    let their_disputes = engine
        .list_disputes("acct-2", &DisputeQuery::default())
        .unwrap();
    assert!(their_disputes.items.is_empty());
    assert_eq!(engine.dispute_summary("acct-2").total_disputes, 0);
}

const TX_HEADER: &str = "id,account,amount,merchant,category,description,date,status\n";
const ACTION_HEADER: &str =
    "action,account,transaction,dispute,reason,description,status,notes,actor\n";

/// CLI pipeline: feeds in, dispute report out, bad rows skipped
#[test]
fn test_cli_pipeline_dispute_report() {
    let transactions = create_temp_csv(&format!(
        "{TX_HEADER}\
        txn-1,acct-1,500.00,Acme Stores,SHOPPING,online order,2024-03-01,COMPLETED\n\
        txn-2,acct-1,bad-amount,Acme Stores,SHOPPING,,2024-03-01,COMPLETED\n\
        txn-3,acct-1,25.00,Corner Shop,GROCERIES,,2024-03-02,PENDING\n"
    ));
    let actions = create_temp_csv(&format!(
        "{ACTION_HEADER}\
        file,acct-1,txn-1,,UNAUTHORIZED,did not make this purchase,,,user-1\n\
        transition,acct-1,,dsp-000001,,,UNDER_REVIEW,assigned,agent-7\n\
        transition,acct-1,,dsp-000001,,,RESOLVED_DENIED,verified by cardholder,agent-7\n\
        file,acct-1,txn-1,,OTHER,second attempt,,,user-1\n"
    ));

    let args = CliArgs::try_parse_from([
        "dispute-engine",
        "--actions",
        actions.path().to_str().unwrap(),
        transactions.path().to_str().unwrap(),
    ])
    .unwrap();

    let mut output = Vec::new();
    cli::run(&args, &mut output).unwrap();

    let output_str = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output_str.lines().collect();
    assert_eq!(
        lines[0],
        "id,transaction,reason,status,description,created,resolved,notes"
    );
    // One dispute despite the second filing attempt
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("dsp-000001,txn-1,UNAUTHORIZED,RESOLVED_DENIED,did not make this purchase,"));
    assert!(lines[1].ends_with(",verified by cardholder"));
}

/// CLI transaction report reflects derived statuses
#[test]
fn test_cli_pipeline_transaction_report() {
    let transactions = create_temp_csv(&format!(
        "{TX_HEADER}\
        txn-1,acct-1,500.00,Acme Stores,SHOPPING,,2024-03-01,COMPLETED\n\
        txn-2,acct-1,25.00,Corner Shop,GROCERIES,,2024-03-02,PENDING\n"
    ));
    let actions = create_temp_csv(&format!(
        "{ACTION_HEADER}file,acct-1,txn-1,,UNAUTHORIZED,not mine,,,\n"
    ));

    let args = CliArgs::try_parse_from([
        "dispute-engine",
        "--actions",
        actions.path().to_str().unwrap(),
        "--report",
        "transactions",
        transactions.path().to_str().unwrap(),
    ])
    .unwrap();

    let mut output = Vec::new();
    cli::run(&args, &mut output).unwrap();

    let output_str = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output_str.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "txn-1,500.00,Acme Stores,SHOPPING,,2024-03-01,DISPUTED,dsp-000001"
    );
    assert_eq!(
        lines[2],
        "txn-2,25.00,Corner Shop,GROCERIES,,2024-03-02,PENDING,"
    );
}

/// Summary reports serialize per account as JSON
#[test]
fn test_cli_pipeline_dispute_summary_report() {
    let transactions = create_temp_csv(&format!(
        "{TX_HEADER}txn-1,acct-1,500.00,Acme Stores,SHOPPING,,2024-03-01,COMPLETED\n"
    ));
    let actions = create_temp_csv(&format!(
        "{ACTION_HEADER}file,acct-1,txn-1,,UNAUTHORIZED,not mine,,,\n"
    ));

    let args = CliArgs::try_parse_from([
        "dispute-engine",
        "--actions",
        actions.path().to_str().unwrap(),
        "--report",
        "dispute-summary",
        "--account",
        "acct-1",
        transactions.path().to_str().unwrap(),
    ])
    .unwrap();

    let mut output = Vec::new();
    cli::run(&args, &mut output).unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let summary = &parsed["acct-1"];
    assert_eq!(summary["totalDisputes"], 1);
    assert_eq!(summary["openDisputes"], 1);
    assert_eq!(summary["totalDisputedAmount"], "500.00");
    assert_eq!(summary["disputesByReason"]["UNAUTHORIZED"], 1);
    assert_eq!(summary["disputesByStatus"]["OPEN"], 1);
}

/// A missing transaction source is fatal
#[test]
fn test_cli_pipeline_missing_input_is_fatal() {
    let args =
        CliArgs::try_parse_from(["dispute-engine", "definitely-not-here.csv"]).unwrap();
    let mut output = Vec::new();
    let error = cli::run(&args, &mut output).unwrap_err();
    assert!(matches!(error, DisputeError::FileNotFound { .. }));
}
