use anyhow::{Context, Result, anyhow, bail};
use catat_core::{Classified, TransactionType, extract_amount};
use catat_finance::{Category, Classifier};
use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmSection;

/// One message of a conversation sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// Classifier backed by an OpenAI-compatible chat completion endpoint.
pub struct LlmClassifier {
    cfg: LlmSection,
    api_key: String,
    today: NaiveDate,
}

impl LlmClassifier {
    /// `None` when the provider is disabled or the key variable is unset.
    pub fn from_config(cfg: &LlmSection, today: NaiveDate) -> Option<Self> {
        if !cfg.enabled() {
            return None;
        }
        let Some(api_key) = cfg.api_key() else {
            log::info!("{} not set; classifying with keyword rules", cfg.api_key_env);
            return None;
        };
        Some(Self {
            cfg: cfg.clone(),
            api_key,
            today,
        })
    }
}

impl Classifier for LlmClassifier {
    fn classify(&self, candidate: &str, kind: TransactionType) -> Result<Classified> {
        let system = system_prompt(kind, self.today);
        let reply = chat_complete(&self.cfg, &self.api_key, &system, &[ChatTurn::user(candidate)])?;
        log::debug!("llm reply for {:?}: {}", candidate, reply);
        parse_reply(&reply, self.today)
    }
}

fn system_prompt(kind: TransactionType, today: NaiveDate) -> String {
    let categories: Vec<&str> = Category::for_type(kind).iter().map(|c| c.label()).collect();
    format!(
        "Kamu mengklasifikasikan satu transaksi {kind} dari pesan pengguna.\n\
Nominal di pesan sudah berupa angka rupiah bulat; pakai angka itu apa adanya.\n\
Pilih kategori dari: {}.\n\
Hari ini {today}. Jika pesan menyebut \"kemarin\", pakai tanggal kemarin.\n\
Balas HANYA JSON: {{\"category\": \"...\", \"description\": \"...\", \"amount\": 0, \"date\": \"YYYY-MM-DD\"}}",
        categories.join(", "),
    )
}

/// Shape the model is asked to return; `amount` may come back as a string.
#[derive(Debug, Deserialize)]
struct Reply {
    category: String,
    description: String,
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    date: Option<String>,
}

/// Pull the JSON object out of a model reply, tolerating text around it.
fn parse_reply(reply: &str, today: NaiveDate) -> Result<Classified> {
    let reply = reply.trim();
    let json = match (reply.find('{'), reply.rfind('}')) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => bail!("no JSON in model reply: {}", truncate(reply, 200)),
    };
    let parsed: Reply = serde_json::from_str(json)
        .with_context(|| format!("invalid JSON from model: {}", truncate(json, 200)))?;

    let amount = match parsed.amount {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Some(serde_json::Value::String(s)) => extract_amount(&s).or_else(|| s.trim().parse().ok()),
        _ => None,
    }
    .ok_or_else(|| anyhow!("model reply has no usable amount"))?;

    let date = parsed
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .unwrap_or(today);

    let category = parsed.category.trim();
    if category.is_empty() {
        bail!("model reply has an empty category");
    }

    Ok(Classified {
        category: category.to_string(),
        description: parsed.description.trim().to_string(),
        amount,
        date,
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}

pub fn chat_complete(cfg: &LlmSection, api_key: &str, system: &str, turns: &[ChatTurn]) -> Result<String> {
    // main runs on #[tokio::main]; a nested runtime would panic on block_on
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(openai_complete(cfg, api_key, system, turns)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(openai_complete(cfg, api_key, system, turns))
    }
}

async fn openai_complete(cfg: &LlmSection, api_key: &str, system: &str, turns: &[ChatTurn]) -> Result<String> {
    #[derive(Serialize)]
    struct Msg<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Serialize)]
    struct Req<'a> {
        model: &'a str,
        messages: Vec<Msg<'a>>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let mut messages = vec![Msg {
        role: "system",
        content: system,
    }];
    messages.extend(turns.iter().map(|t| Msg {
        role: &t.role,
        content: &t.content,
    }));

    let body = Req {
        model: &cfg.model,
        messages,
        temperature: cfg.temperature,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("build http client")?;
    let resp = client
        .post(cfg.completions_url())
        .header(AUTHORIZATION, format!("Bearer {api_key}"))
        .json(&body)
        .send()
        .await
        .with_context(|| format!("{} request", cfg.provider))?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("{} error: {status} {}", cfg.provider, truncate(&txt, 300));
    }

    let out: Resp = resp
        .json()
        .await
        .with_context(|| format!("parse {} response", cfg.provider))?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
