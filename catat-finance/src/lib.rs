//! catat-finance: rule classifier, batch processing, CSV ledger and recap

pub mod batch;
pub mod category_rules;
pub mod classifier;
pub mod ledger;
pub mod rekap;

pub use batch::{BatchOutcome, Failure, process_message};
pub use category_rules::{Category, categorize};
pub use classifier::{Classifier, RuleClassifier, WithFallback, reconcile_amount};
pub use ledger::{CsvDirLedger, LedgerSink, read_records, write_records};
pub use rekap::{Rekap, rekap};
