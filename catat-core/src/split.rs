//! Splits one chat message into transaction candidates.
//!
//! Recognised separators (case-insensitive, single pass):
//!   `,`            makan 20rb, parkir 5rb
//!   ` dan `        makan bakso 20rb dan parkir 2rb
//!   newline        nonton 40rb\nmakan 55rb

use regex::Regex;
use std::sync::OnceLock;

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i),|\s+dan\s+|\n").expect("separator regex"))
}

/// Split `raw` into trimmed, non-empty candidates in order of appearance.
///
/// Returns an empty vector for blank input; callers treat that as a
/// formatting error.
pub fn split(raw: &str) -> Vec<String> {
    let out: Vec<String> = separator_re()
        .split(raw)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    log::debug!("split {} candidate(s) from {:?}", out.len(), raw);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma() {
        assert_eq!(split("makan 20rb, parkir 5rb"), vec!["makan 20rb", "parkir 5rb"]);
    }

    #[test]
    fn test_split_dan() {
        assert_eq!(
            split("makan bakso 20rb dan parkir 2rb"),
            vec!["makan bakso 20rb", "parkir 2rb"]
        );
    }

    #[test]
    fn test_split_dan_is_case_insensitive() {
        assert_eq!(split("bensin 30rb DAN tol 15rb"), vec!["bensin 30rb", "tol 15rb"]);
    }

    #[test]
    fn test_split_dan_inside_word_is_not_separator() {
        // "dandan" and "dana" contain "dan" but are not standalone words
        assert_eq!(split("beli alat dandan 50rb"), vec!["beli alat dandan 50rb"]);
        assert_eq!(split("dana darurat 1jt"), vec!["dana darurat 1jt"]);
    }

    #[test]
    fn test_split_newline_keeps_order() {
        let out = split("nonton 40rb\nmakan 55rb\nparkir 7rb");
        assert_eq!(out, vec!["nonton 40rb", "makan 55rb", "parkir 7rb"]);
    }

    #[test]
    fn test_split_crlf_is_trimmed() {
        assert_eq!(split("nonton 40rb\r\nparkir 7rb"), vec!["nonton 40rb", "parkir 7rb"]);
    }

    #[test]
    fn test_split_mixed_separators_single_pass() {
        let out = split("gaji 2jt, uang saku 500rb dan freelance 100rb\nbonus 50rb");
        assert_eq!(out, vec!["gaji 2jt", "uang saku 500rb", "freelance 100rb", "bonus 50rb"]);
    }

    #[test]
    fn test_split_no_separator_returns_trimmed_input() {
        assert_eq!(split("  makan nasi padang 25rb  "), vec!["makan nasi padang 25rb"]);
    }

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split("makan 20rb,, ,\n\nparkir 5rb,"), vec!["makan 20rb", "parkir 5rb"]);
    }

    #[test]
    fn test_split_blank_input() {
        assert!(split("").is_empty());
        assert!(split("  \n , ").is_empty());
    }
}
