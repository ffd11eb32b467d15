//! Tabular export records for a schedule.
//!
//! Field order and names are a compatibility contract with existing CSV
//! consumers: `month, date, payment, principalPaid, interestPaid, balance,
//! savingsLinked`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::{ScheduleEntry, ScheduleResult};
use crate::types::Money;

/// Column names, in output order.
pub const EXPORT_HEADER: [&str; 7] = [
    "month",
    "date",
    "payment",
    "principalPaid",
    "interestPaid",
    "balance",
    "savingsLinked",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub month: u32,
    /// ISO-8601 calendar date.
    pub date: NaiveDate,
    pub payment: Money,
    #[serde(rename = "principalPaid")]
    pub principal_paid: Money,
    #[serde(rename = "interestPaid")]
    pub interest_paid: Money,
    pub balance: Money,
    #[serde(rename = "savingsLinked")]
    pub savings_linked: Money,
}

impl From<&ScheduleEntry> for ExportRecord {
    fn from(entry: &ScheduleEntry) -> Self {
        ExportRecord {
            month: entry.month,
            date: entry.date,
            payment: entry.payment,
            principal_paid: entry.principal_paid,
            interest_paid: entry.interest_paid,
            balance: entry.outstanding_balance,
            savings_linked: entry.linked_savings_balance,
        }
    }
}

impl ExportRecord {
    /// Values as strings in [`EXPORT_HEADER`] order.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.month.to_string(),
            self.date.format("%Y-%m-%d").to_string(),
            self.payment.to_string(),
            self.principal_paid.to_string(),
            self.interest_paid.to_string(),
            self.balance.to_string(),
            self.savings_linked.to_string(),
        ]
    }
}

/// One export record per schedule month, in chronological order.
pub fn export_records(result: &ScheduleResult) -> Vec<ExportRecord> {
    result.entries.iter().map(ExportRecord::from).collect()
}
