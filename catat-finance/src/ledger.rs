//! CSV ledger: one file per sheet, columns `date,description,category,amount,type`.

use anyhow::{Context, Result};
use catat_core::LedgerRecord;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for classified rows
pub trait LedgerSink {
    /// Append `records` to `sheet` in order; returns the number written.
    fn append(&mut self, sheet: &str, records: &[LedgerRecord]) -> Result<usize>;
}

/// Serialize `records` as CSV rows, with a header line when `header` is set.
pub fn write_records<W: Write>(writer: W, records: &[LedgerRecord], header: bool) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(header)
        .from_writer(writer);
    for record in records {
        wtr.serialize(record).context("serialize ledger row")?;
    }
    wtr.flush().context("flush ledger rows")?;
    Ok(records.len())
}

/// Read every row of a ledger CSV written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LedgerRecord>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for row in rdr.deserialize() {
        let record: LedgerRecord = row.with_context(|| format!("parsing {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

/// Ledger kept as `<dir>/<sheet>.csv`
#[derive(Debug, Clone)]
pub struct CsvDirLedger {
    dir: PathBuf,
}

impl CsvDirLedger {
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }
}

impl LedgerSink for CsvDirLedger {
    fn append(&mut self, sheet: &str, records: &[LedgerRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let path = self.sheet_path(sheet);
        let needs_header = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;

        let n = write_records(file, records, needs_header)?;
        log::info!("appended {} row(s) to {}", n, path.display());
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catat_core::TransactionType;
    use chrono::NaiveDate;

    fn record(description: &str, amount: u64) -> LedgerRecord {
        LedgerRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap(),
            description: description.to_string(),
            category: "Makanan & Minuman".to_string(),
            amount,
            kind: TransactionType::Expense,
        }
    }

    #[test]
    fn test_write_records_with_header() {
        let mut buf = Vec::new();
        let n = write_records(&mut buf, &[record("Makan sate", 20_000)], true).unwrap();
        assert_eq!(n, 1);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,description,category,amount,type\n2025-06-28,Makan sate,Makanan & Minuman,20000,pengeluaran\n"
        );
    }

    #[test]
    fn test_write_records_quotes_commas() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record("Nasi, ayam", 15_000)], false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("2025-06-28,\"Nasi, ayam\","));
    }

    #[test]
    fn test_dir_ledger_appends_and_reads_back() {
        let dir = std::env::temp_dir().join(format!("catat-ledger-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut ledger = CsvDirLedger::open_dir(&dir).unwrap();
        ledger.append("Pengeluaran", &[record("Jajan", 24_000)]).unwrap();
        ledger.append("Pengeluaran", &[record("Parkir", 6_000), record("Nonton", 35_000)]).unwrap();
        assert_eq!(ledger.append("Pengeluaran", &[]).unwrap(), 0);

        let rows = read_records(ledger.sheet_path("Pengeluaran")).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["Jajan", "Parkir", "Nonton"]);
        assert_eq!(rows[2].amount, 35_000);

        fs::remove_dir_all(&dir).unwrap();
    }
}
