//! Transaction types shared by the classifier and the ledger writer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of money for one chat command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "pengeluaran")]
    Expense,
    #[serde(rename = "pemasukan")]
    Income,
}

impl TransactionType {
    /// Parse the command word used in chat (`keluar` / `masuk`)
    pub fn from_command(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "keluar" => Some(TransactionType::Expense),
            "masuk" => Some(TransactionType::Income),
            _ => None,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            TransactionType::Expense => "keluar",
            TransactionType::Income => "masuk",
        }
    }

    /// Ledger sheet that rows of this type are appended to
    pub fn sheet_name(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Pengeluaran",
            TransactionType::Income => "Pemasukan",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Expense => "pengeluaran",
            TransactionType::Income => "pemasukan",
        };
        f.write_str(label)
    }
}

/// Classifier output for one normalized candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classified {
    pub category: String,
    pub description: String,
    /// Rupiah, always a whole number
    pub amount: u64,
    pub date: NaiveDate,
}

/// One ledger row, ready to append
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRecord {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl LedgerRecord {
    pub fn new(classified: Classified, kind: TransactionType) -> Self {
        Self {
            date: classified.date,
            description: classified.description,
            category: classified.category,
            amount: classified.amount,
            kind,
        }
    }

    /// Signed amount: income positive, expense negative
    pub fn signed_amount(&self) -> i128 {
        match self.kind {
            TransactionType::Income => self.amount as i128,
            TransactionType::Expense => -(self.amount as i128),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_words() {
        assert_eq!(TransactionType::from_command("keluar"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::from_command("MASUK"), Some(TransactionType::Income));
        assert_eq!(TransactionType::from_command("rekap"), None);
        assert_eq!(TransactionType::Income.command(), "masuk");
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(TransactionType::Expense.sheet_name(), "Pengeluaran");
        assert_eq!(TransactionType::Income.sheet_name(), "Pemasukan");
    }

    #[test]
    fn test_record_from_classified() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let record = LedgerRecord::new(
            Classified {
                category: "Makanan & Minuman".to_string(),
                description: "Makan sate".to_string(),
                amount: 20_000,
                date,
            },
            TransactionType::Expense,
        );
        assert!(record.is_expense());
        assert_eq!(record.signed_amount(), -20_000);
        assert_eq!(record.date, date);
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = LedgerRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap(),
            description: "Gaji".to_string(),
            category: "Gaji".to_string(),
            amount: 5_000_000,
            kind: TransactionType::Income,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "pemasukan");
        assert_eq!(json["date"], "2025-06-28");
    }
}
