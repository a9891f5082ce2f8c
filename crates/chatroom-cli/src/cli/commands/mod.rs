//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod messages;
pub mod sessions;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(question: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
