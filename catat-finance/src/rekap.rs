//! Recap (`/rekap`): totals per type and per category for one month.

use catat_core::{LedgerRecord, TransactionType};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rekap {
    /// Totals saturate at `u64::MAX`
    pub total_expense: u64,
    pub total_income: u64,
    /// Expense totals per category, largest first
    pub expense_by_category: Vec<(String, u64)>,
    /// Income totals per category, largest first
    pub income_by_category: Vec<(String, u64)>,
    pub transaction_count: usize,
}

impl Rekap {
    /// Income minus expense
    pub fn balance(&self) -> i128 {
        self.total_income as i128 - self.total_expense as i128
    }
}

fn ranked(totals: BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut out: Vec<_> = totals.into_iter().collect();
    // stable sort keeps alphabetical order between equal totals
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Summarise `records`, optionally limited to one `(year, month)`.
pub fn rekap(records: &[LedgerRecord], month: Option<(i32, u32)>) -> Rekap {
    let mut expense: BTreeMap<String, u64> = BTreeMap::new();
    let mut income: BTreeMap<String, u64> = BTreeMap::new();
    let mut out = Rekap::default();

    for r in records {
        if let Some((y, m)) = month {
            if r.date.year() != y || r.date.month() != m {
                continue;
            }
        }
        out.transaction_count += 1;
        match r.kind {
            TransactionType::Expense => {
                out.total_expense = out.total_expense.saturating_add(r.amount);
                let total = expense.entry(r.category.clone()).or_insert(0);
                *total = total.saturating_add(r.amount);
            }
            TransactionType::Income => {
                out.total_income = out.total_income.saturating_add(r.amount);
                let total = income.entry(r.category.clone()).or_insert(0);
                *total = total.saturating_add(r.amount);
            }
        }
    }

    out.expense_by_category = ranked(expense);
    out.income_by_category = ranked(income);
    out
}
