use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{default_ledger_dir, ensure_catat_home};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub chat: ChatSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// "groq", "openai", or "none" to use keyword rules only
    pub provider: String,
    pub model: String,
    /// OpenAI-compatible endpoint root; `/v1/chat/completions` is appended
    pub base_url: String,
    pub temperature: f32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSection {
    /// Directory of per-sheet CSV files (default: ~/.catat/ledger)
    pub dir: Option<PathBuf>,
    /// IANA zone used for "today"
    pub timezone: String,
    pub spreadsheet_id: Option<String>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSection {
    /// History messages sent along with each `catat ai` question
    pub max_turns_context: usize,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            max_turns_context: 10,
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            temperature: 0.2,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            dir: None,
            timezone: "Asia/Jakarta".to_string(),
            spreadsheet_id: None,
            folder_id: None,
        }
    }
}

impl LedgerSection {
    pub fn dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(d) => Ok(d.clone()),
            None => default_ledger_dir(),
        }
    }

    pub fn tz(&self) -> Result<Tz> {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Ok(tz),
            Err(e) => bail!("invalid timezone {:?} in config: {e}", self.timezone),
        }
    }
}

impl LlmSection {
    pub fn enabled(&self) -> bool {
        !self.provider.eq_ignore_ascii_case("none")
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_catat_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
