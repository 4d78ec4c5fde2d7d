//! Chat command parsing: `/keluar <pesan>` and `/masuk <pesan>`.

use regex::Regex;
use std::sync::OnceLock;

use crate::transaction::TransactionType;

/// A recognised ledger command and the message that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: TransactionType,
    pub body: String,
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Telegram appends "@botname" to commands in group chats
    RE.get_or_init(|| {
        Regex::new(r"(?is)^\s*/(?P<word>[a-z]+)(?:@\w+)?(?:\s+(?P<body>.*))?$")
            .expect("command regex")
    })
}

/// Parse a `/keluar` or `/masuk` command. Other commands and plain text
/// yield `None`. The body keeps its inner newlines for the splitter.
pub fn parse_command(text: &str) -> Option<Command> {
    let caps = command_re().captures(text)?;
    let kind = TransactionType::from_command(&caps["word"])?;
    let body = caps
        .name("body")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(Command { kind, body })
}
