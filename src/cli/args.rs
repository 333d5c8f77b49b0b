use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Browse transactions and work disputes from CSV feeds
#[derive(Parser, Debug)]
#[command(name = "dispute-engine")]
#[command(about = "Browse transactions and work disputes from CSV feeds", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transaction records
    #[arg(value_name = "TRANSACTIONS", help = "Path to the transaction source CSV")]
    pub transactions: PathBuf,

    /// Dispute action feed to apply after loading transactions
    #[arg(
        long = "actions",
        value_name = "FILE",
        help = "Path to a CSV of dispute actions (file/transition rows)"
    )]
    pub actions: Option<PathBuf>,

    /// Which report to write to stdout after processing
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "disputes",
        help = "Report to emit: 'transactions', 'disputes', 'transaction-summary', or 'dispute-summary'"
    )]
    pub report: ReportType,

    /// Restrict processing and reporting to one account
    #[arg(
        long = "account",
        value_name = "ID",
        help = "Account id to report on (default: every account in the input)"
    )]
    pub account: Option<String>,
}

/// Available report types
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum ReportType {
    /// Transaction views as CSV
    Transactions,
    /// Disputes as CSV
    Disputes,
    /// Per-account transaction summaries as JSON
    TransactionSummary,
    /// Per-account dispute summaries as JSON
    DisputeSummary,
}
