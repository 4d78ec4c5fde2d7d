//! Classifiers turn one normalized candidate into category, description,
//! amount and date.

use anyhow::{Result, bail};
use catat_core::{Classified, TransactionType, extract_amount};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::category_rules::categorize;

pub trait Classifier {
    fn classify(&self, candidate: &str, kind: TransactionType) -> Result<Classified>;
}

/// Keyword classifier; needs no network and never guesses an amount.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    today: NaiveDate,
}

impl RuleClassifier {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Classifier whose "today" is the current date in `tz`
    pub fn today_in(tz: Tz) -> Self {
        Self::new(Utc::now().with_timezone(&tz).date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, candidate: &str, kind: TransactionType) -> Result<Classified> {
        let Some(amount) = extract_amount(candidate) else {
            bail!("nominal tidak ditemukan");
        };
        let category = categorize(candidate, kind);
        let description = describe(candidate, amount).unwrap_or_else(|| category.label().to_string());

        Ok(Classified {
            category: category.label().to_string(),
            description,
            amount,
            date: resolve_date(candidate, self.today),
        })
    }
}

/// Try `primary`, and use `secondary` when it fails.
pub struct WithFallback<P, S> {
    pub primary: P,
    pub secondary: S,
}

impl<P: Classifier, S: Classifier> Classifier for WithFallback<P, S> {
    fn classify(&self, candidate: &str, kind: TransactionType) -> Result<Classified> {
        match self.primary.classify(candidate, kind) {
            Ok(c) => Ok(c),
            Err(e) => {
                log::warn!("primary classifier failed for {:?}: {:#}; using fallback", candidate, e);
                self.secondary.classify(candidate, kind)
            }
        }
    }
}

/// Force the amount found in the normalized text over whatever the
/// classifier returned. Text without an extractable amount leaves the
/// classifier's value alone.
pub fn reconcile_amount(mut classified: Classified, normalized: &str) -> Classified {
    if let Some(expected) = extract_amount(normalized) {
        if expected != classified.amount {
            log::warn!(
                "classifier amount {} disagrees with {:?}; using {}",
                classified.amount,
                normalized,
                expected
            );
            classified.amount = expected;
        }
    }
    classified
}

const DATE_WORDS: &[&str] = &["kemarin", "lusa", "tadi"];
const CURRENCY_WORDS: &[&str] = &["rp", "rupiah", "idr"];

/// Candidate text without its amount, currency and date words; first
/// letter capitalised. `None` when nothing descriptive is left.
fn describe(candidate: &str, amount: u64) -> Option<String> {
    let amount_str = amount.to_string();
    let mut amount_removed = false;

    let kept: Vec<&str> = candidate
        .split_whitespace()
        .filter(|token| {
            let lower = token.to_lowercase();
            let bare = lower.trim_start_matches("rp").trim_start_matches('.');
            if !amount_removed && bare == amount_str {
                amount_removed = true;
                return false;
            }
            !CURRENCY_WORDS.contains(&lower.as_str()) && !DATE_WORDS.contains(&lower.as_str())
        })
        .collect();

    let joined = kept.join(" ");
    let mut chars = joined.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// "kemarin lusa" is two days back, "kemarin" one; otherwise today.
fn resolve_date(candidate: &str, today: NaiveDate) -> NaiveDate {
    let lower = candidate.to_lowercase();
    if lower.contains("kemarin lusa") {
        today - Duration::days(2)
    } else if lower.split_whitespace().any(|w| w == "kemarin") {
        today - Duration::days(1)
    } else {
        today
    }
}
