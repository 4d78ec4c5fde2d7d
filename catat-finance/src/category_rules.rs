//! Deterministic category rules for Indonesian transaction text.
//!
//! Used when no language model is configured or when it fails. Keywords are
//! matched against whole words; keywords of four letters or more also match
//! as a word prefix ("makan" covers "makanan").

use catat_core::TransactionType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger categories, labelled as they appear in the sheet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    // expense
    FoodAndDrink,
    Transport,
    Bills,
    Shopping,
    Entertainment,
    Health,
    Education,
    Social,
    // income
    Salary,
    Bonus,
    Business,
    Investment,
    Gift,
    Other,
}

impl Category {
    const EXPENSE: [Category; 9] = [
        Category::FoodAndDrink,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Social,
        Category::Other,
    ];

    const INCOME: [Category; 6] = [
        Category::Salary,
        Category::Bonus,
        Category::Business,
        Category::Investment,
        Category::Gift,
        Category::Other,
    ];

    /// Categories valid for a transaction type, `Other` last
    pub fn for_type(kind: TransactionType) -> &'static [Category] {
        match kind {
            TransactionType::Expense => &Self::EXPENSE,
            TransactionType::Income => &Self::INCOME,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Makanan & Minuman",
            Category::Transport => "Transportasi",
            Category::Bills => "Tagihan",
            Category::Shopping => "Belanja",
            Category::Entertainment => "Hiburan",
            Category::Health => "Kesehatan",
            Category::Education => "Pendidikan",
            Category::Social => "Sosial",
            Category::Salary => "Gaji",
            Category::Bonus => "Bonus",
            Category::Business => "Usaha",
            Category::Investment => "Investasi",
            Category::Gift => "Hadiah",
            Category::Other => "Lainnya",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_any(words: &[String], lower: &str, keys: &[&str]) -> bool {
    keys.iter().any(|key| {
        if key.contains(' ') {
            return lower.contains(key);
        }
        words
            .iter()
            .any(|w| w == key || (key.len() >= 4 && w.starts_with(key)))
    })
}

/// Categorize one candidate. Priority: specific keywords first, the generic
/// "beli"/"belanja" bucket last, then `Lainnya`.
pub fn categorize(text: &str, kind: TransactionType) -> Category {
    match kind {
        TransactionType::Expense => categorize_expense(text),
        TransactionType::Income => categorize_income(text),
    }
}

fn categorize_expense(text: &str) -> Category {
    let lower = text.to_lowercase();
    let w = words(text);

    // Bills before food: "token listrik", "bayar kos"
    if has_any(&w, &lower, &[
        "listrik", "token", "pln", "pdam", "air minum", "internet", "wifi", "indihome",
        "pulsa", "kuota", "bpjs", "cicilan", "kredit", "kos", "kost", "sewa", "tagihan",
    ]) {
        return Category::Bills;
    }

    if has_any(&w, &lower, &[
        "gofood", "grabfood", "shopeefood", "makan", "minum", "sarapan", "jajan", "kopi",
        "nasi", "bakso", "sate", "mie", "soto", "snack", "cemilan", "es", "teh", "warung",
        "resto", "restoran", "cafe", "martabak", "gorengan", "ayam",
    ]) {
        return Category::FoodAndDrink;
    }

    if has_any(&w, &lower, &[
        "parkir", "bensin", "pertalite", "pertamax", "tol", "ojek", "ojol", "gojek", "grab",
        "maxim", "taksi", "taxi", "kereta", "krl", "mrt", "busway", "transjakarta", "angkot",
        "bus", "pesawat", "travel", "servis motor", "servis mobil",
    ]) {
        return Category::Transport;
    }

    if has_any(&w, &lower, &[
        "obat", "dokter", "apotek", "apotik", "rumah sakit", "klinik", "vitamin", "periksa",
        "gigi",
    ]) {
        return Category::Health;
    }

    if has_any(&w, &lower, &[
        "sekolah", "kuliah", "spp", "ukt", "buku", "kursus", "les", "seminar", "pelatihan",
    ]) {
        return Category::Education;
    }

    if has_any(&w, &lower, &[
        "nonton", "bioskop", "netflix", "spotify", "youtube", "game", "karaoke", "liburan",
        "wisata", "konser",
    ]) {
        return Category::Entertainment;
    }

    if has_any(&w, &lower, &[
        "zakat", "sedekah", "infaq", "infak", "donasi", "sumbangan", "kado", "arisan",
        "kondangan", "amplop",
    ]) {
        return Category::Social;
    }

    if has_any(&w, &lower, &[
        "beli", "belanja", "shopee", "tokopedia", "lazada", "indomaret", "alfamart", "baju",
        "sepatu", "celana", "galon", "beras", "sabun", "skincare",
    ]) {
        return Category::Shopping;
    }

    Category::Other
}

fn categorize_income(text: &str) -> Category {
    let lower = text.to_lowercase();
    let w = words(text);

    if has_any(&w, &lower, &["gaji", "gajian", "upah", "thr", "honor", "honorarium"]) {
        return Category::Salary;
    }

    if has_any(&w, &lower, &["bonus", "komisi", "insentif", "lembur"]) {
        return Category::Bonus;
    }

    if has_any(&w, &lower, &[
        "dividen", "bunga", "saham", "reksadana", "reksa dana", "crypto", "kripto", "deposito",
    ]) {
        return Category::Investment;
    }

    if has_any(&w, &lower, &[
        "jualan", "penjualan", "freelance", "proyek", "project", "usaha", "dagang", "order",
        "client", "klien",
    ]) {
        return Category::Business;
    }

    if has_any(&w, &lower, &[
        "hadiah", "kado", "angpao", "angpau", "uang saku", "dikasih", "pemberian", "warisan",
    ]) {
        return Category::Gift;
    }

    Category::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(text: &str) -> Category {
        categorize(text, TransactionType::Expense)
    }

    fn income(text: &str) -> Category {
        categorize(text, TransactionType::Income)
    }

    #[test]
    fn test_food() {
        assert_eq!(expense("makan nasi padang 25000"), Category::FoodAndDrink);
        assert_eq!(expense("Kopi susu 18000"), Category::FoodAndDrink);
        assert_eq!(expense("makanan kucing 30000"), Category::FoodAndDrink);
    }

    #[test]
    fn test_bills_before_food() {
        assert_eq!(expense("beli token listrik 13000"), Category::Bills);
        assert_eq!(expense("bayar kos 1500000"), Category::Bills);
    }

    #[test]
    fn test_transport() {
        assert_eq!(expense("parkir 2000"), Category::Transport);
        assert_eq!(expense("isi bensin motor 30000"), Category::Transport);
    }

    #[test]
    fn test_short_keyword_needs_whole_word() {
        // "es" must not match inside "sepatu" or "pesan"
        assert_eq!(expense("beli sepatu 300000"), Category::Shopping);
        assert_eq!(expense("es teh 5000"), Category::FoodAndDrink);
    }

    #[test]
    fn test_other_expense_categories() {
        assert_eq!(expense("nonton bioskop 40000"), Category::Entertainment);
        assert_eq!(expense("bayar sekolah 1500000"), Category::Education);
        assert_eq!(expense("beli obat flu 25000"), Category::Health);
        assert_eq!(expense("sedekah jumat 20000"), Category::Social);
        assert_eq!(expense("lain lain 10000"), Category::Other);
    }

    #[test]
    fn test_income() {
        assert_eq!(income("gaji bulanan 5000000"), Category::Salary);
        assert_eq!(income("bonus akhir tahun 2000000"), Category::Bonus);
        assert_eq!(income("freelance desain 100000"), Category::Business);
        assert_eq!(income("uang saku 500000"), Category::Gift);
        assert_eq!(income("dividen saham 75000"), Category::Investment);
        assert_eq!(income("nemu di jalan 10000"), Category::Other);
    }

    #[test]
    fn test_type_decides_rule_set() {
        assert_eq!(expense("kado ulang tahun 150000"), Category::Social);
        assert_eq!(income("kado ulang tahun 150000"), Category::Gift);
    }

    #[test]
    fn test_categories_per_type() {
        let income = Category::for_type(TransactionType::Income);
        assert!(income.contains(&Category::Salary));
        assert!(!income.contains(&Category::Transport));
        assert_eq!(Category::for_type(TransactionType::Expense).last(), Some(&Category::Other));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::FoodAndDrink.label(), "Makanan & Minuman");
        assert_eq!(Category::Other.to_string(), "Lainnya");
    }
}
