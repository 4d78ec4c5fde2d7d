//! Batch processing of one chat message: every candidate is classified in
//! order, and failures are collected instead of aborting the batch.

use catat_core::{LedgerRecord, TransactionType, normalize_message};
use serde::Serialize;

use crate::classifier::{Classifier, reconcile_amount};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub candidate: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Classified rows, in message order
    pub records: Vec<LedgerRecord>,
    /// Candidates that could not be classified, in message order
    pub failures: Vec<Failure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.records.is_empty()
    }

    /// Sum of record amounts, saturating at `u64::MAX`
    pub fn total_amount(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.amount))
    }
}

/// Split, normalize and classify `raw`. A message that yields no candidate
/// at all is reported as a single formatting failure.
pub fn process_message(
    raw: &str,
    kind: TransactionType,
    classifier: &dyn Classifier,
) -> BatchOutcome {
    let candidates = normalize_message(raw);
    let mut outcome = BatchOutcome::default();

    if candidates.is_empty() {
        outcome.failures.push(Failure {
            candidate: raw.trim().to_string(),
            reason: "format tidak dikenali".to_string(),
        });
        return outcome;
    }

    for candidate in candidates {
        match classifier.classify(&candidate.normalized, kind) {
            Ok(classified) => {
                let classified = reconcile_amount(classified, &candidate.normalized);
                if classified.amount == 0 {
                    outcome.failures.push(Failure {
                        candidate: candidate.original,
                        reason: "nominal kosong".to_string(),
                    });
                    continue;
                }
                outcome.records.push(LedgerRecord::new(classified, kind));
            }
            Err(e) => {
                log::debug!("classification failed for {:?}: {:#}", candidate.original, e);
                outcome.failures.push(Failure {
                    candidate: candidate.original,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    log::info!(
        "{} message: {} record(s), {} failure(s)",
        kind,
        outcome.records.len(),
        outcome.failures.len()
    );
    outcome
}
