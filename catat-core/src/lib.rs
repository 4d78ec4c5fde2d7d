//! catat-core: text pipeline that turns informal Indonesian money messages
//! into normalized transaction candidates.

pub mod amount;
pub mod command;
pub mod links;
pub mod pipeline;
pub mod split;
pub mod transaction;

pub use amount::{AmountMatch, AmountRule, AmountUnit, extract_amount, find_amount, normalize_amount};
pub use command::{Command, parse_command};
pub use links::{extract_folder_id, extract_spreadsheet_id};
pub use pipeline::{NormalizedCandidate, normalize_message};
pub use split::split;
pub use transaction::{Classified, LedgerRecord, TransactionType};
