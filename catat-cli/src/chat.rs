//! `catat ai`: finance questions answered by the configured model, with a
//! short rolling memory kept in `~/.catat/chat.jsonl`.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::llm::{self, ChatTurn};
use crate::state::ensure_catat_home;

/// Lines kept on disk per history message sent to the model
const KEEP_FACTOR: usize = 5;

const NO_REPLY: &str = "(tidak ada balasan)";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    at: String,
    role: String,
    content: String,
}

pub struct ChatHistory {
    path: PathBuf,
    keep: usize,
}

impl ChatHistory {
    pub fn open_default(max_turns: usize) -> Result<Self> {
        let home = ensure_catat_home()?;
        Ok(Self::at(home.join("chat.jsonl"), max_turns))
    }

    pub fn at(path: impl Into<PathBuf>, max_turns: usize) -> Self {
        Self {
            path: path.into(),
            keep: max_turns.max(1) * KEEP_FACTOR,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let mut out = Vec::new();
        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<Entry>(line) {
                Ok(e) => out.push(e),
                Err(e) => log::warn!("skipping bad line in {}: {e}", self.path.display()),
            }
        }
        Ok(out)
    }

    /// Last `n` messages, oldest first
    pub fn recent(&self, n: usize) -> Result<Vec<ChatTurn>> {
        let entries = self.entries()?;
        let start = entries.len().saturating_sub(n);
        Ok(entries[start..]
            .iter()
            .map(|e| ChatTurn {
                role: e.role.clone(),
                content: e.content.clone(),
            })
            .collect())
    }

    /// Store one question and its answer, dropping the oldest lines past the bound.
    pub fn record(&self, question: &str, reply: &str) -> Result<()> {
        let at = chrono::Utc::now().to_rfc3339();
        let mut entries = self.entries()?;
        for turn in [ChatTurn::user(question), ChatTurn::assistant(reply)] {
            entries.push(Entry {
                at: at.clone(),
                role: turn.role,
                content: turn.content,
            });
        }

        let start = entries.len().saturating_sub(self.keep);
        let mut s = String::new();
        for e in &entries[start..] {
            s.push_str(&serde_json::to_string(e).context("serialize chat entry")?);
            s.push('\n');
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

fn system_prompt() -> String {
    "Kamu asisten keuangan pribadi yang ramah untuk aplikasi catat. Jawab dengan bahasa \
yang dipakai pengguna; jika ragu, pakai Bahasa Indonesia.\n\
Bantu soal pencatatan transaksi, anggaran, dan pengelolaan uang sehari-hari.\n\
Cara memakai catat:\n\
- Catat pengeluaran: catat keluar \"makan nasi padang 25rb\"\n\
- Catat pemasukan: catat masuk \"gaji bulanan 5jt\"\n\
- Beberapa transaksi sekaligus: pisahkan dengan koma, \"dan\", atau baris baru\n\
- Rekap: catat rekap --month 2025-06\n\
- Hubungkan spreadsheet: catat config set-sheet <link>\n\
Data yang salah (kategori, nominal, keterangan) bisa diubah langsung di file ledger.\n\
Jawab singkat dan jelas."
        .to_string()
}

fn to_turns(history: Vec<ChatTurn>, question: &str) -> Vec<ChatTurn> {
    let mut turns: Vec<ChatTurn> = history
        .into_iter()
        .filter(|t| t.role == "user" || t.role == "assistant")
        .collect();
    turns.push(ChatTurn::user(question));
    turns
}

/// Ask one question with recent history as context, then remember the exchange.
pub fn ask(cfg: &Config, history: &ChatHistory, question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        bail!("pertanyaan kosong; contoh: catat ai \"tips hemat belanja bulanan\"");
    }
    if !cfg.llm.enabled() {
        bail!("LLM dimatikan (provider = \"none\"); ubah [llm] di config.toml");
    }
    let Some(api_key) = cfg.llm.api_key() else {
        bail!("{} belum di-set", cfg.llm.api_key_env);
    };

    let turns = to_turns(history.recent(cfg.chat.max_turns_context)?, question);
    let reply = llm::chat_complete(&cfg.llm, &api_key, &system_prompt(), &turns)?;
    let reply = if reply.is_empty() {
        NO_REPLY.to_string()
    } else {
        reply
    };

    history.record(question, &reply)?;
    Ok(reply)
}
