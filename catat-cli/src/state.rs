use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `~/.catat`, or `$CATAT_HOME` when set
pub fn catat_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CATAT_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".catat"))
}

pub fn ensure_catat_home() -> Result<PathBuf> {
    let dir = catat_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_ledger_dir() -> Result<PathBuf> {
    Ok(catat_home()?.join("ledger"))
}
