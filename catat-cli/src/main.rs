use anyhow::{Context, Result, bail};
use catat_core::{
    NormalizedCandidate, TransactionType, extract_amount, extract_folder_id, extract_spreadsheet_id,
    normalize_message, parse_command,
};
use catat_finance::{
    BatchOutcome, Classifier, CsvDirLedger, LedgerSink, Rekap, RuleClassifier, WithFallback,
    process_message, read_records, rekap,
};
use clap::{Parser, Subcommand};
use std::io::Read;

mod chat;
mod config;
mod llm;
mod state;

use chat::ChatHistory;
use config::{init_config, load_config, save_config, Config};
use llm::LlmClassifier;

#[derive(Parser, Debug)]
#[command(
    name = "catat",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CATAT_BUILD_SHA"), ")"),
    about = "Catat pengeluaran dan pemasukan dari pesan teks"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split and normalize a message without classifying it
    Parse {
        /// Message text; "-" reads stdin
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the largest amount (>= 1000) found in normalized text
    Extract {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Record a chat command: "/keluar ..." or "/masuk ..."
    Catat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Show the rows without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Record expenses (same as `catat "/keluar ..."`)
    Keluar {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Record income (same as `catat "/masuk ..."`)
    Masuk {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Totals per category from the ledger
    Rekap {
        /// Month as YYYY-MM (default: all time)
        #[arg(long)]
        month: Option<String>,
    },

    /// Ask the finance assistant; recent questions are remembered
    Ai {
        #[arg(num_args = 0..)]
        question: Vec<String>,

        /// Forget the conversation history
        #[arg(long)]
        reset: bool,
    },

    /// Config commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.catat/config.toml with defaults
    Init,

    /// Print the effective config
    Show,

    /// Remember the spreadsheet behind the ledger (Google Sheets link)
    SetSheet { url: String },

    /// Remember the Drive folder that holds the spreadsheet
    SetFolder { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { message, json } => {
            let text = message_text(message)?;
            let candidates = normalize_message(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                print_candidates(&candidates);
            }
        }

        Command::Extract { text } => match extract_amount(&text.join(" ")) {
            Some(n) => println!("{n}"),
            None => println!("tidak ditemukan"),
        },

        Command::Catat { message, dry_run } => {
            let text = message_text(message)?;
            let Some(cmd) = parse_command(&text) else {
                bail!("pesan harus diawali /keluar atau /masuk");
            };
            record(&cmd.body, cmd.kind, dry_run)?;
        }

        Command::Keluar { message, dry_run } => {
            record(&message_text(message)?, TransactionType::Expense, dry_run)?;
        }

        Command::Masuk { message, dry_run } => {
            record(&message_text(message)?, TransactionType::Income, dry_run)?;
        }

        Command::Rekap { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            show_rekap(month)?;
        }

        Command::Ai { question, reset } => {
            let cfg = load_config()?;
            let history = ChatHistory::open_default(cfg.chat.max_turns_context)?;
            if reset {
                history.clear()?;
                println!("Riwayat percakapan dihapus.");
            }
            if !question.is_empty() {
                let reply = chat::ask(&cfg, &history, &message_text(question)?)?;
                println!("{reply}");
            } else if !reset {
                bail!("tulis pertanyaannya, contoh: catat ai \"cara bikin anggaran bulanan\"");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::SetSheet { url } => {
                let Some(id) = extract_spreadsheet_id(&url) else {
                    bail!("bukan link Google Spreadsheet: {url}");
                };
                let mut cfg = load_config()?;
                cfg.ledger.spreadsheet_id = Some(id.clone());
                save_config(&cfg)?;
                println!("Spreadsheet: {id}");
            }
            ConfigCommand::SetFolder { url } => {
                let Some(id) = extract_folder_id(&url) else {
                    bail!("bukan link folder Google Drive: {url}");
                };
                let mut cfg = load_config()?;
                cfg.ledger.folder_id = Some(id.clone());
                save_config(&cfg)?;
                println!("Folder: {id}");
            }
        },
    }

    Ok(())
}

fn message_text(parts: Vec<String>) -> Result<String> {
    if parts.len() == 1 && parts[0] == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).context("read stdin")?;
        return Ok(s);
    }
    Ok(parts.join(" "))
}

fn record(body: &str, kind: TransactionType, dry_run: bool) -> Result<()> {
    let cfg = load_config()?;
    let outcome = classify_message(&cfg, body, kind)?;

    print_outcome(&outcome, kind);

    if !dry_run && !outcome.records.is_empty() {
        let mut ledger = CsvDirLedger::open_dir(cfg.ledger.dir()?)?;
        let n = ledger.append(kind.sheet_name(), &outcome.records)?;
        println!("\n{} baris ditulis ke {}", n, ledger.sheet_path(kind.sheet_name()).display());
    }

    if outcome.records.is_empty() {
        bail!("tidak ada transaksi yang bisa dicatat");
    }
    Ok(())
}

fn classify_message(cfg: &Config, body: &str, kind: TransactionType) -> Result<BatchOutcome> {
    let rules = RuleClassifier::today_in(cfg.ledger.tz()?);
    let classifier: Box<dyn Classifier> = match LlmClassifier::from_config(&cfg.llm, rules.today()) {
        Some(llm) => Box::new(WithFallback {
            primary: llm,
            secondary: rules,
        }),
        None => Box::new(rules),
    };
    Ok(process_message(body, kind, classifier.as_ref()))
}

fn print_candidates(candidates: &[NormalizedCandidate]) {
    if candidates.is_empty() {
        println!("(tidak ada transaksi)");
        return;
    }
    for (i, c) in candidates.iter().enumerate() {
        let amount = c
            .amount
            .map(format_rupiah)
            .unwrap_or_else(|| "-".to_string());
        let rule = c.rule.map(|r| format!("{r:?}")).unwrap_or_else(|| "-".to_string());
        println!("{}. {} => {} | {} | {}", i + 1, c.original, c.normalized, amount, rule);
    }
}

fn print_outcome(outcome: &BatchOutcome, kind: TransactionType) {
    if !outcome.records.is_empty() {
        println!("{} {} dicatat:", outcome.records.len(), kind);
        for (i, r) in outcome.records.iter().enumerate() {
            println!(
                "{}. {} | {} | {} | {}",
                i + 1,
                r.date,
                r.category,
                r.description,
                format_rupiah(r.amount)
            );
        }
        println!("Total: {}", format_rupiah(outcome.total_amount()));
    }
    if !outcome.failures.is_empty() {
        println!("\nGagal menganalisis {} transaksi:", outcome.failures.len());
        for f in &outcome.failures {
            println!("- {:?}: {}", f.candidate, f.reason);
        }
    }
}

fn show_rekap(month: Option<(i32, u32)>) -> Result<()> {
    let cfg = load_config()?;
    let ledger = CsvDirLedger::open_dir(cfg.ledger.dir()?)?;

    let mut records = Vec::new();
    for kind in [TransactionType::Income, TransactionType::Expense] {
        let path = ledger.sheet_path(kind.sheet_name());
        if path.exists() {
            records.extend(read_records(&path)?);
        }
    }

    let r: Rekap = rekap(&records, month);
    match month {
        Some((y, m)) => println!("# Rekap {y}-{m:02}\n"),
        None => println!("# Rekap\n"),
    }
    println!("Pemasukan   : {}", format_rupiah(r.total_income));
    println!("Pengeluaran : {}", format_rupiah(r.total_expense));
    let sign = if r.balance() < 0 { "-" } else { "" };
    println!(
        "Saldo       : {sign}{}",
        format_rupiah(r.balance().unsigned_abs().min(u64::MAX as u128) as u64)
    );

    if !r.expense_by_category.is_empty() {
        println!("\n## Pengeluaran per kategori");
        for (cat, total) in &r.expense_by_category {
            println!("- {cat}: {}", format_rupiah(*total));
        }
    }
    if !r.income_by_category.is_empty() {
        println!("\n## Pemasukan per kategori");
        for (cat, total) in &r.income_by_category {
            println!("- {cat}: {}", format_rupiah(*total));
        }
    }
    println!("\n{} transaksi", r.transaction_count);
    Ok(())
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (y, m) = s
        .split_once('-')
        .with_context(|| format!("month must be YYYY-MM, got {s:?}"))?;
    let y: i32 = y.parse().with_context(|| format!("bad year in {s:?}"))?;
    let m: u32 = m.parse().with_context(|| format!("bad month in {s:?}"))?;
    if !(1..=12).contains(&m) {
        bail!("month out of range: {s}");
    }
    Ok((y, m))
}

/// Rp with Indonesian thousands dots: 1500000 -> "Rp1.500.000"
fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push_str("Rp");
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp0");
        assert_eq!(format_rupiah(999), "Rp999");
        assert_eq!(format_rupiah(20_000), "Rp20.000");
        assert_eq!(format_rupiah(1_500_000), "Rp1.500.000");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06").unwrap(), (2025, 6));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("juni").is_err());
    }

    #[test]
    fn test_message_text_joins_args() {
        let text = message_text(vec!["makan".into(), "20rb,".into(), "parkir".into(), "5rb".into()]).unwrap();
        assert_eq!(text, "makan 20rb, parkir 5rb");
    }

    #[test]
    fn test_classify_message_without_llm() {
        let mut cfg = Config::default();
        cfg.llm.provider = "none".to_string();
        let outcome = classify_message(&cfg, "makan 20rb, parkir 5rb", TransactionType::Expense).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[1].category, "Transportasi");
    }
}
