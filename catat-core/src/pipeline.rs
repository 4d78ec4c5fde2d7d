//! Message pipeline: split a raw message, then normalize each candidate.

use serde::{Deserialize, Serialize};

use crate::amount::{AmountRule, extract_amount, normalize_with_rule};
use crate::split::split;

/// A candidate with its amount rewritten as a plain rupiah integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCandidate {
    /// Candidate as it appeared in the message (trimmed)
    pub original: String,
    /// Candidate with the amount replaced by its integer value
    pub normalized: String,
    /// Rule that decided the amount, `None` when the text has no digits
    pub rule: Option<AmountRule>,
    /// Amount recovered from the normalized text
    pub amount: Option<u64>,
}

impl NormalizedCandidate {
    pub fn from_candidate(candidate: &str) -> Self {
        let (normalized, rule) = normalize_with_rule(candidate);
        let amount = extract_amount(&normalized);
        Self {
            original: candidate.to_string(),
            normalized,
            rule,
            amount,
        }
    }
}

/// Split `raw` and normalize every candidate, keeping message order.
pub fn normalize_message(raw: &str) -> Vec<NormalizedCandidate> {
    split(raw)
        .iter()
        .map(|c| NormalizedCandidate::from_candidate(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_order() {
        let out = normalize_message("jajan 24rb, parkir 6rb, nonton 35rb");
        let texts: Vec<_> = out.iter().map(|c| c.normalized.as_str()).collect();
        assert_eq!(texts, vec!["jajan 24000", "parkir 6000", "nonton 35000"]);
        let amounts: Vec<_> = out.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![Some(24_000), Some(6_000), Some(35_000)]);
    }

    #[test]
    fn test_mixed_rules_per_candidate() {
        let out = normalize_message("bayar sekolah 1 juta 500 ribu\ntoken listrik 13.000 dan transfer 28000");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].rule, Some(AmountRule::Combined));
        assert_eq!(out[0].amount, Some(1_500_000));
        assert_eq!(out[1].rule, Some(AmountRule::ThousandsSeparator));
        assert_eq!(out[1].normalized, "token listrik 13000");
        assert_eq!(out[2].rule, Some(AmountRule::Plain));
        assert_eq!(out[2].normalized, "transfer 28000");
    }

    #[test]
    fn test_candidate_without_amount() {
        let out = normalize_message("makan siang, parkir 2rb");
        assert_eq!(out[0].original, "makan siang");
        assert_eq!(out[0].normalized, "makan siang");
        assert_eq!(out[0].rule, None);
        assert_eq!(out[0].amount, None);
        assert_eq!(out[1].amount, Some(2_000));
    }

    #[test]
    fn test_small_amount_is_not_extracted() {
        // 500 rupiah is below the extraction floor
        let out = normalize_message("permen 500");
        assert_eq!(out[0].amount, None);
    }

    #[test]
    fn test_blank_message() {
        assert!(normalize_message("  ").is_empty());
    }
}
