//! Amount normalization for informal Indonesian money text.
//!
//! Rules are tried in a fixed order and the first one that matches decides
//! the rewrite:
//!
//!   Combined           1 juta 500 ribu, 1jt 500rb     -> 1500000
//!   ThousandsSeparator 13.000, 1.500.000, 12,500      -> 13000 (every token)
//!   SingleUnit         20rb, 5jt, 1,5jt, 25k, 5000 rupiah -> 20000
//!   Plain              28000                          -> unchanged
//!
//! Unit multiplication happens in `f64` and is rounded half away from zero;
//! digit-only parses are exact.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Smallest value `extract_amount` accepts as a real amount. Normalized
/// amounts are in rupiah, so anything smaller is a quantity or a stray digit.
pub const MIN_EXTRACTED_AMOUNT: u64 = 1_000;

/// Multiplier implied by a trailing unit token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountUnit {
    #[serde(rename = "thousand")]
    Thousand,
    #[serde(rename = "million")]
    Million,
    /// No multiplier: the token was absent or was the word "rupiah".
    #[serde(rename = "base")]
    Base,
}

impl AmountUnit {
    /// Classify a unit token (case-insensitive). Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "rb" | "ribu" | "k" => Some(AmountUnit::Thousand),
            "jt" | "juta" => Some(AmountUnit::Million),
            "rupiah" => Some(AmountUnit::Base),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            AmountUnit::Thousand => 1_000.0,
            AmountUnit::Million => 1_000_000.0,
            AmountUnit::Base => 1.0,
        }
    }
}

/// One step of the normalization cascade, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountRule {
    #[serde(rename = "combined")]
    Combined,
    #[serde(rename = "thousands-separator")]
    ThousandsSeparator,
    #[serde(rename = "single-unit")]
    SingleUnit,
    #[serde(rename = "plain")]
    Plain,
}

impl AmountRule {
    pub const CASCADE: [AmountRule; 4] = [
        AmountRule::Combined,
        AmountRule::ThousandsSeparator,
        AmountRule::SingleUnit,
        AmountRule::Plain,
    ];

    /// Thousands-grouped tokens are all rewritten; the unit rules act on the
    /// first match only.
    pub fn replaces_all(&self) -> bool {
        matches!(self, AmountRule::ThousandsSeparator)
    }

    /// Plain integers are already canonical and are never rewritten.
    pub fn rewrites(&self) -> bool {
        !matches!(self, AmountRule::Plain)
    }

    /// All qualifying matches of this rule in `text`, left to right.
    pub fn find_all(&self, text: &str) -> Vec<AmountMatch> {
        match self {
            AmountRule::Combined => combined_re()
                .captures_iter(text)
                .filter_map(|caps| combined_match(&caps))
                .collect(),
            AmountRule::ThousandsSeparator => thousands_re()
                .captures_iter(text)
                .filter_map(|caps| thousands_match(text, &caps))
                .collect(),
            AmountRule::SingleUnit => single_unit_re()
                .captures_iter(text)
                .filter_map(|caps| single_unit_match(text, &caps))
                .collect(),
            AmountRule::Plain => digits_re()
                .find_iter(text)
                .filter_map(|m| {
                    let value = m.as_str().parse().ok()?;
                    Some(AmountMatch {
                        rule: AmountRule::Plain,
                        start: m.start(),
                        end: m.end(),
                        value,
                        unit: AmountUnit::Base,
                    })
                })
                .collect(),
        }
    }
}

/// A recognised amount: byte span in the source text plus its value in rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountMatch {
    pub rule: AmountRule,
    pub start: usize,
    pub end: usize,
    pub value: u64,
    /// Largest unit seen in the span.
    pub unit: AmountUnit,
}

const NUMBER: &str = r"\d+(?:[.,]\d+)?";

fn combined_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)(?P<major>{NUMBER})\s*(?:juta|jt)\s*(?P<minor>{NUMBER})\s*(?:ribu|rb|k)\b"
        ))
        .expect("combined amount regex")
    })
}

fn thousands_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?P<grouped>\d{1,3}(?:[.,]\d{3})+)\b(?P<unit>\s*(?:juta|jt|ribu|rb|k)\b)?")
            .expect("thousands amount regex")
    })
}

// The unit is required: a bare decimal such as "bensin 2.5" has no
// multiplier, falls through to Plain and is left as written.
fn single_unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)(?P<number>{NUMBER})\s*(?P<unit>juta|jt|ribu|rb|k|rupiah)\b"
        ))
        .expect("single unit amount regex")
    })
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digits regex"))
}

/// Parse a number that may use `,` or `.` as decimal point.
fn parse_decimal(number: &str) -> Option<f64> {
    number.replace(',', ".").parse::<f64>().ok()
}

/// Digit or `[.,]digit` immediately before `start`: the match is the tail
/// of a longer number.
fn glued_before(text: &str, start: usize) -> bool {
    let mut prev = text[..start].chars().rev();
    match prev.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.' | ',') => prev.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// `[.,]digit` immediately after `end`: the match is the head of a longer
/// grouped number.
fn glued_after(text: &str, end: usize) -> bool {
    let mut next = text[end..].chars();
    matches!(next.next(), Some('.' | ','))
        && next.next().is_some_and(|c| c.is_ascii_digit())
}

fn round_to_rupiah(value: f64) -> Option<u64> {
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value.round() as u64)
}

fn combined_match(caps: &Captures) -> Option<AmountMatch> {
    let whole = caps.get(0)?;
    let major = parse_decimal(&caps["major"])?;
    let minor = parse_decimal(&caps["minor"])?;
    let value = round_to_rupiah(
        major * AmountUnit::Million.multiplier() + minor * AmountUnit::Thousand.multiplier(),
    )?;
    Some(AmountMatch {
        rule: AmountRule::Combined,
        start: whole.start(),
        end: whole.end(),
        value,
        unit: AmountUnit::Million,
    })
}

fn thousands_match(text: &str, caps: &Captures) -> Option<AmountMatch> {
    // "13.000rb" style tokens carry a multiplier and belong to the unit rules
    if caps.name("unit").is_some() {
        return None;
    }
    let grouped = caps.name("grouped")?;
    // "1234.567" would otherwise match "234.567", and "1.500.000rb" would
    // match its prefix "1.500"
    if glued_before(text, grouped.start()) || glued_after(text, grouped.end()) {
        return None;
    }
    let digits: String = grouped.as_str().chars().filter(char::is_ascii_digit).collect();
    let value = digits.parse().ok()?;
    Some(AmountMatch {
        rule: AmountRule::ThousandsSeparator,
        start: grouped.start(),
        end: grouped.end(),
        value,
        unit: AmountUnit::Base,
    })
}

fn single_unit_match(text: &str, caps: &Captures) -> Option<AmountMatch> {
    let whole = caps.get(0)?;
    if glued_before(text, whole.start()) {
        return None;
    }
    let unit = AmountUnit::from_token(&caps["unit"])?;
    let number = parse_decimal(&caps["number"])?;
    let value = round_to_rupiah(number * unit.multiplier())?;
    Some(AmountMatch {
        rule: AmountRule::SingleUnit,
        start: whole.start(),
        end: whole.end(),
        value,
        unit,
    })
}

/// First amount the cascade recognises in `text`, if any.
pub fn find_amount(text: &str) -> Option<AmountMatch> {
    AmountRule::CASCADE
        .iter()
        .find_map(|rule| rule.find_all(text).into_iter().next())
}

/// Rewrite the amount in `text` as a plain integer and report which rule
/// decided it. `None` means the text holds no digits at all.
pub fn normalize_with_rule(text: &str) -> (String, Option<AmountRule>) {
    for rule in AmountRule::CASCADE {
        let mut matches = rule.find_all(text);
        if matches.is_empty() {
            continue;
        }
        if !rule.rewrites() {
            return (text.to_string(), Some(rule));
        }
        if !rule.replaces_all() {
            matches.truncate(1);
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in &matches {
            out.push_str(&text[last..m.start]);
            out.push_str(&m.value.to_string());
            last = m.end;
        }
        out.push_str(&text[last..]);

        log::debug!("normalized {:?} -> {:?} via {:?}", text, out, rule);
        return (out, Some(rule));
    }

    (text.to_string(), None)
}

/// Rewrite the amount in `text` as a plain rupiah integer, leaving the rest
/// of the text untouched. Text without an amount is returned as is.
pub fn normalize_amount(text: &str) -> String {
    normalize_with_rule(text).0
}

/// Largest bare integer in `text` that is at least [`MIN_EXTRACTED_AMOUNT`].
///
/// Meant for already-normalized text, where the real amount has been
/// inflated to rupiah and small numbers are quantities.
pub fn extract_amount(text: &str) -> Option<u64> {
    digits_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .filter(|n| *n >= MIN_EXTRACTED_AMOUNT)
        .max()
}
