//! CSV format handling for transaction ingest, dispute actions, and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvTransactionRecord / CsvActionRecord structures for deserialization
//! - Conversion from CSV records to domain types
//! - Report output serialization
//!
//! All functions are pure (no I/O beyond the passed writer) for easy testing.

use crate::types::dispute::{Dispute, DisputeReason, DisputeStatus};
use crate::types::transaction::{
    Transaction, TransactionCategory, TransactionRecord, TransactionStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for the transaction source
///
/// Matches the input CSV format with columns:
/// `id,account,amount,merchant,category,description,date,status`.
/// Description is optional; every other column is required.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvTransactionRecord {
    pub id: String,
    pub account: String,
    pub amount: String,
    pub merchant: String,
    pub category: String,
    pub description: Option<String>,
    pub date: String,
    pub status: String,
}

/// CSV record structure for the dispute action feed
///
/// Matches the action CSV format with columns:
/// `action,account,transaction,dispute,reason,description,status,notes,actor`.
/// Which columns are required depends on the action: `file` needs
/// transaction, reason, and description; `transition` needs dispute and
/// status.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvActionRecord {
    pub action: String,
    pub account: String,
    pub transaction: Option<String>,
    pub dispute: Option<String>,
    pub reason: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub actor: Option<String>,
}

/// A parsed dispute action ready for the engine
#[derive(Debug, Clone, PartialEq)]
pub enum DisputeAction {
    /// File a new dispute against a transaction
    File {
        account: String,
        transaction_id: String,
        reason: DisputeReason,
        description: String,
        actor: Option<String>,
    },
    /// Move an existing dispute to a new status
    Transition {
        account: String,
        dispute_id: String,
        status: DisputeStatus,
        notes: Option<String>,
        actor: Option<String>,
    },
}

fn required(value: Option<String>, field: &str, id: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(format!("Missing {} for action on {}", field, id)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Convert a CsvTransactionRecord to a TransactionRecord
///
/// This function:
/// - Parses the amount string into a Decimal
/// - Parses category, date, and status into their domain types
/// - Rejects a `DISPUTED` status (disputed-ness is derived from disputes,
///   never ingested)
/// - Normalizes an empty description to absent
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(TransactionRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_transaction_record(
    csv_record: CsvTransactionRecord,
) -> Result<TransactionRecord, String> {
    if csv_record.id.trim().is_empty() {
        return Err("Missing transaction id".to_string());
    }
    if csv_record.account.trim().is_empty() {
        return Err(format!("Missing account for transaction {}", csv_record.id));
    }
    if csv_record.merchant.trim().is_empty() {
        return Err(format!("Missing merchant for transaction {}", csv_record.id));
    }

    let amount = Decimal::from_str(csv_record.amount.trim()).map_err(|_| {
        format!(
            "Invalid amount '{}' for transaction {}",
            csv_record.amount, csv_record.id
        )
    })?;

    let category = TransactionCategory::from_str(csv_record.category.trim()).map_err(|_| {
        format!(
            "Invalid category '{}' for transaction {}",
            csv_record.category, csv_record.id
        )
    })?;

    let date = chrono::NaiveDate::parse_from_str(csv_record.date.trim(), "%Y-%m-%d")
        .map_err(|_| {
            format!(
                "Invalid date '{}' for transaction {}",
                csv_record.date, csv_record.id
            )
        })?;

    let status = TransactionStatus::from_str(csv_record.status.trim()).map_err(|_| {
        format!(
            "Invalid status '{}' for transaction {}",
            csv_record.status, csv_record.id
        )
    })?;
    if status == TransactionStatus::Disputed {
        return Err(format!(
            "Transaction {} declares DISPUTED status; disputed state comes from filed disputes",
            csv_record.id
        ));
    }

    Ok(TransactionRecord {
        id: csv_record.id.trim().to_string(),
        account: csv_record.account.trim().to_string(),
        amount,
        merchant: csv_record.merchant.trim().to_string(),
        category,
        description: optional(csv_record.description),
        date,
        status,
    })
}

/// Convert a CsvActionRecord to a DisputeAction
///
/// This function:
/// - Dispatches on the action column (`file` or `transition`, case
///   insensitive)
/// - Validates that the columns the action needs are present
/// - Parses reason/status into their domain enums
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(DisputeAction) - Successfully converted action
/// - Err(String) - Error message describing the conversion failure
pub fn convert_action_record(csv_record: CsvActionRecord) -> Result<DisputeAction, String> {
    let account = csv_record.account.trim().to_string();
    if account.is_empty() {
        return Err("Missing account for action".to_string());
    }

    match csv_record.action.trim().to_lowercase().as_str() {
        "file" => {
            let transaction_id = required(csv_record.transaction, "transaction", &account)?;
            let reason_str = required(csv_record.reason, "reason", &transaction_id)?;
            let reason = DisputeReason::from_str(&reason_str).map_err(|_| {
                format!(
                    "Invalid reason '{}' for dispute on transaction {}",
                    reason_str, transaction_id
                )
            })?;
            let description = required(csv_record.description, "description", &transaction_id)?;

            Ok(DisputeAction::File {
                account,
                transaction_id,
                reason,
                description,
                actor: optional(csv_record.actor),
            })
        }
        "transition" => {
            let dispute_id = required(csv_record.dispute, "dispute", &account)?;
            let status_str = required(csv_record.status, "status", &dispute_id)?;
            let status = DisputeStatus::from_str(&status_str).map_err(|_| {
                format!(
                    "Invalid status '{}' for dispute {}",
                    status_str, dispute_id
                )
            })?;

            Ok(DisputeAction::Transition {
                account,
                dispute_id,
                status,
                notes: optional(csv_record.notes),
                actor: optional(csv_record.actor),
            })
        }
        other => Err(format!("Invalid action type: '{}'", other)),
    }
}

/// Write transaction views to CSV format
///
/// Writes columns: id, amount, merchant, category, description, date,
/// status, dispute. Rows are sorted by transaction id for deterministic
/// output.
///
/// # Arguments
///
/// * `transactions` - Slice of transaction views to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "id",
            "amount",
            "merchant",
            "category",
            "description",
            "date",
            "status",
            "dispute",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for tx in sorted {
        writer
            .write_record(&[
                tx.id.clone(),
                tx.amount.to_string(),
                tx.merchant.clone(),
                tx.category.to_string(),
                tx.description.clone().unwrap_or_default(),
                tx.date.format("%Y-%m-%d").to_string(),
                tx.status.to_string(),
                tx.dispute_id.clone().unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write transaction record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write disputes to CSV format
///
/// Writes columns: id, transaction, reason, status, description, created,
/// resolved, notes. Rows are sorted by dispute id for deterministic output.
///
/// # Arguments
///
/// * `disputes` - Slice of disputes to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_disputes_csv(disputes: &[Dispute], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "id",
            "transaction",
            "reason",
            "status",
            "description",
            "created",
            "resolved",
            "notes",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = disputes.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for dispute in sorted {
        writer
            .write_record(&[
                dispute.id.clone(),
                dispute.transaction_id.clone(),
                dispute.reason.to_string(),
                dispute.status.to_string(),
                dispute.description.clone(),
                dispute.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                dispute
                    .resolved_at
                    .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
                    .unwrap_or_default(),
                dispute.resolution_notes.clone().unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write dispute record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn tx_record(overrides: impl FnOnce(&mut CsvTransactionRecord)) -> CsvTransactionRecord {
        let mut record = CsvTransactionRecord {
            id: "txn-1".to_string(),
            account: "acct-1".to_string(),
            amount: "500.00".to_string(),
            merchant: "Acme Stores".to_string(),
            category: "SHOPPING".to_string(),
            description: Some("online order".to_string()),
            date: "2024-03-01".to_string(),
            status: "COMPLETED".to_string(),
        };
        overrides(&mut record);
        record
    }

    #[test]
    fn test_convert_transaction_record_valid() {
        let record = convert_transaction_record(tx_record(|_| {})).unwrap();
        assert_eq!(record.id, "txn-1");
        assert_eq!(record.amount, Decimal::new(50000, 2));
        assert_eq!(record.category, TransactionCategory::Shopping);
        assert_eq!(record.status, TransactionStatus::Completed);
        assert_eq!(record.date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_convert_transaction_record_trims_and_drops_empty_description() {
        let record = convert_transaction_record(tx_record(|r| {
            r.merchant = "  Acme Stores  ".to_string();
            r.description = Some("   ".to_string());
        }))
        .unwrap();
        assert_eq!(record.merchant, "Acme Stores");
        assert_eq!(record.description, None);
    }

    #[rstest]
    #[case::empty_id(
        |r: &mut CsvTransactionRecord| r.id = "".to_string(),
        "Missing transaction id"
    )]
    #[case::empty_account(
        |r: &mut CsvTransactionRecord| r.account = " ".to_string(),
        "Missing account"
    )]
    #[case::empty_merchant(
        |r: &mut CsvTransactionRecord| r.merchant = "".to_string(),
        "Missing merchant"
    )]
    #[case::bad_amount(
        |r: &mut CsvTransactionRecord| r.amount = "lots".to_string(),
        "Invalid amount"
    )]
    #[case::bad_category(
        |r: &mut CsvTransactionRecord| r.category = "GAMBLING".to_string(),
        "Invalid category"
    )]
    #[case::bad_date(
        |r: &mut CsvTransactionRecord| r.date = "03/01/2024".to_string(),
        "Invalid date"
    )]
    #[case::bad_status(
        |r: &mut CsvTransactionRecord| r.status = "SETTLED".to_string(),
        "Invalid status"
    )]
    #[case::disputed_status(
        |r: &mut CsvTransactionRecord| r.status = "DISPUTED".to_string(),
        "declares DISPUTED status"
    )]
    fn test_convert_transaction_record_errors(
        #[case] mutate: impl FnOnce(&mut CsvTransactionRecord),
        #[case] expected_error: &str,
    ) {
        let result = convert_transaction_record(tx_record(mutate));
        assert!(result.unwrap_err().contains(expected_error));
    }

    fn action_record(overrides: impl FnOnce(&mut CsvActionRecord)) -> CsvActionRecord {
        let mut record = CsvActionRecord {
            action: "file".to_string(),
            account: "acct-1".to_string(),
            transaction: Some("txn-1".to_string()),
            dispute: None,
            reason: Some("UNAUTHORIZED".to_string()),
            description: Some("did not make this purchase".to_string()),
            status: None,
            notes: None,
            actor: Some("user-1".to_string()),
        };
        overrides(&mut record);
        record
    }

    #[test]
    fn test_convert_action_record_file() {
        let action = convert_action_record(action_record(|_| {})).unwrap();
        assert_eq!(
            action,
            DisputeAction::File {
                account: "acct-1".to_string(),
                transaction_id: "txn-1".to_string(),
                reason: DisputeReason::Unauthorized,
                description: "did not make this purchase".to_string(),
                actor: Some("user-1".to_string()),
            }
        );
    }

    #[test]
    fn test_convert_action_record_transition() {
        let action = convert_action_record(action_record(|r| {
            r.action = "TRANSITION".to_string();
            r.dispute = Some("dsp-000001".to_string());
            r.status = Some("UNDER_REVIEW".to_string());
            r.notes = Some("assigned to review".to_string());
        }))
        .unwrap();
        assert_eq!(
            action,
            DisputeAction::Transition {
                account: "acct-1".to_string(),
                dispute_id: "dsp-000001".to_string(),
                status: DisputeStatus::UnderReview,
                notes: Some("assigned to review".to_string()),
                actor: Some("user-1".to_string()),
            }
        );
    }

    #[rstest]
    #[case::unknown_action(
        |r: &mut CsvActionRecord| r.action = "escalate".to_string(),
        "Invalid action type"
    )]
    #[case::file_missing_transaction(
        |r: &mut CsvActionRecord| r.transaction = None,
        "Missing transaction"
    )]
    #[case::file_missing_reason(
        |r: &mut CsvActionRecord| r.reason = None,
        "Missing reason"
    )]
    #[case::file_bad_reason(
        |r: &mut CsvActionRecord| r.reason = Some("BECAUSE".to_string()),
        "Invalid reason"
    )]
    #[case::file_missing_description(
        |r: &mut CsvActionRecord| r.description = Some("  ".to_string()),
        "Missing description"
    )]
    #[case::transition_missing_dispute(
        |r: &mut CsvActionRecord| {
            r.action = "transition".to_string();
            r.status = Some("UNDER_REVIEW".to_string());
        },
        "Missing dispute"
    )]
    #[case::transition_bad_status(
        |r: &mut CsvActionRecord| {
            r.action = "transition".to_string();
            r.dispute = Some("dsp-000001".to_string());
            r.status = Some("REOPENED".to_string());
        },
        "Invalid status"
    )]
    fn test_convert_action_record_errors(
        #[case] mutate: impl FnOnce(&mut CsvActionRecord),
        #[case] expected_error: &str,
    ) {
        let result = convert_action_record(action_record(mutate));
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[test]
    fn test_write_transactions_csv_sorted_by_id() {
        let mk = |id: &str| Transaction {
            id: id.to_string(),
            amount: Decimal::new(10050, 2),
            merchant: "Acme Stores".to_string(),
            category: TransactionCategory::Shopping,
            description: None,
            date: "2024-03-01".parse().unwrap(),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            has_dispute: false,
            dispute_id: None,
        };

        let mut output = Vec::new();
        write_transactions_csv(&[mk("txn-2"), mk("txn-1")], &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output_str.lines().collect();
        assert_eq!(
            lines[0],
            "id,amount,merchant,category,description,date,status,dispute"
        );
        assert!(lines[1].starts_with("txn-1,100.50,Acme Stores,SHOPPING,,2024-03-01,COMPLETED,"));
        assert!(lines[2].starts_with("txn-2,"));
    }

    #[test]
    fn test_write_transactions_csv_empty() {
        let mut output = Vec::new();
        write_transactions_csv(&[], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,amount,merchant,category,description,date,status,dispute\n"
        );
    }
}
