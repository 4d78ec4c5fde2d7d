//! Google Drive folder / spreadsheet id extraction from shared links.
//!
//!   https://drive.google.com/drive/folders/<id>?usp=sharing
//!   https://docs.google.com/spreadsheets/d/<id>/edit#gid=0

use regex::Regex;
use std::sync::OnceLock;

fn folder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/folders/([a-zA-Z0-9_-]+)").expect("folder link regex"))
}

fn spreadsheet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("spreadsheet link regex")
    })
}

pub fn extract_folder_id(url: &str) -> Option<String> {
    folder_re().captures(url).map(|c| c[1].to_string())
}

pub fn extract_spreadsheet_id(url: &str) -> Option<String> {
    spreadsheet_re().captures(url).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_id() {
        let url = "https://drive.google.com/drive/folders/1AbC-d_EfG?usp=sharing";
        assert_eq!(extract_folder_id(url).as_deref(), Some("1AbC-d_EfG"));
    }

    #[test]
    fn test_folder_id_missing() {
        assert_eq!(extract_folder_id("https://drive.google.com/file/d/123/view"), None);
        assert_eq!(extract_folder_id("bukan link"), None);
    }

    #[test]
    fn test_spreadsheet_id() {
        let url = "https://docs.google.com/spreadsheets/d/1RhcbhF8_7KfFf8USC3zo/edit#gid=0";
        assert_eq!(extract_spreadsheet_id(url).as_deref(), Some("1RhcbhF8_7KfFf8USC3zo"));
        assert_eq!(extract_spreadsheet_id("https://docs.google.com/document/d/abc"), None);
    }
}
