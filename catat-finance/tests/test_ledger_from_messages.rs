use catat_core::{TransactionType, parse_command};
use catat_finance::{CsvDirLedger, LedgerSink, RuleClassifier, process_message, read_records, rekap};
use chrono::NaiveDate;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("catat-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn rules() -> RuleClassifier {
    RuleClassifier::new(NaiveDate::from_ymd_opt(2025, 6, 28).unwrap())
}

/// Chat commands end up as ordered ledger rows, one sheet per type.
#[test]
fn test_commands_to_ledger_and_rekap() {
    let dir = scratch_dir("flow");
    let mut ledger = CsvDirLedger::open_dir(&dir).unwrap();
    let classifier = rules();

    let messages = [
        "/masuk gaji 2jt, uang saku 500rb, freelance desain 100rb",
        "/keluar nonton bioskop 40rb\nmakan 55rb\nparkir 7rb",
        "/keluar makan bakso 20rb dan parkir 2rb",
        "/keluar bayar sekolah 1 juta 500 ribu",
    ];

    for msg in messages {
        let cmd = parse_command(msg).unwrap();
        let outcome = process_message(&cmd.body, cmd.kind, &classifier);
        assert!(outcome.failures.is_empty(), "unexpected failures: {:?}", outcome.failures);
        ledger.append(cmd.kind.sheet_name(), &outcome.records).unwrap();
    }

    let income = read_records(ledger.sheet_path(TransactionType::Income.sheet_name())).unwrap();
    let amounts: Vec<_> = income.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![2_000_000, 500_000, 100_000]);
    assert_eq!(income[0].category, "Gaji");

    let expense = read_records(ledger.sheet_path(TransactionType::Expense.sheet_name())).unwrap();
    let amounts: Vec<_> = expense.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![40_000, 55_000, 7_000, 20_000, 2_000, 1_500_000]);
    assert_eq!(expense[5].category, "Pendidikan");

    let mut all = income.clone();
    all.extend(expense);
    let r = rekap(&all, Some((2025, 6)));
    assert_eq!(r.total_income, 2_600_000);
    assert_eq!(r.total_expense, 1_624_000);
    assert_eq!(r.transaction_count, 9);

    std::fs::remove_dir_all(&dir).unwrap();
}

/// A bad candidate is reported while the rest of the message is recorded.
#[test]
fn test_partial_message_keeps_good_rows() {
    let cmd = parse_command("/keluar token listrik 13.000, entah apa, kopi 18rb").unwrap();
    let outcome = process_message(&cmd.body, cmd.kind, &rules());

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].amount, 13_000);
    assert_eq!(outcome.records[0].category, "Tagihan");
    assert_eq!(outcome.records[1].amount, 18_000);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].candidate, "entah apa");
}
