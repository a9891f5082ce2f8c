//! Deleted-history, restore and analytics command handlers.

use anyhow::{Context, Result, bail};
use chatroom_client::render::{format_deleted, trend_table};
use chatroom_core::{ApiClient, Config};
use chatroom_types::DeletedKey;
use comfy_table::Table;
use tracing::warn;

pub async fn deleted(config: &Config, session: &str) -> Result<()> {
    let entries = ApiClient::new(config)?.deleted_history(session).await?;
    if entries.is_empty() {
        println!("No deleted messages in '{session}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Entry", "Message"]);
    for (index, entry) in entries.iter().enumerate() {
        table.add_row(vec![entry.key().to_string(), format_deleted(index + 1, entry)]);
    }
    println!("{table}");
    println!("Restore with: chatroom restore {session} <ENTRY>...");
    Ok(())
}

/// Restores entries one at a time, oldest original timestamp first.
///
/// Every entry is attempted; the command fails if any of them did.
pub async fn restore(config: &Config, session: &str, entries: &[String], yes: bool) -> Result<()> {
    let mut keys = entries
        .iter()
        .map(String::as_str)
        .map(parse_entry)
        .collect::<Result<Vec<_>>>()?;
    keys.sort_by_key(|key| (key.ts, key.deleted_at));
    keys.dedup();

    if !yes && !super::confirm(&format!("Restore {} message(s) to '{session}'?", keys.len()))? {
        println!("Cancelled.");
        return Ok(());
    }

    let api = ApiClient::new(config)?;
    let mut failed = 0usize;
    for key in &keys {
        match api.restore(session, *key).await {
            Ok(()) => println!("Restored {key}"),
            Err(error) => {
                warn!(session, entry = %key, error = %format!("{error:#}"), "restore failed, continuing");
                eprintln!("Failed to restore {key}: {error:#}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} restore(s) failed", keys.len());
    }
    Ok(())
}

pub async fn trend(config: &Config, session: &str) -> Result<()> {
    let trend = ApiClient::new(config)?.hourly_trend(session).await?;
    println!("{}", trend_table(&trend.hourly_trend, trend.message.as_deref()));
    Ok(())
}

/// Parses `TS-DELETED_AT`.
fn parse_entry(entry: &str) -> Result<DeletedKey> {
    let (ts, deleted_at) = entry
        .split_once('-')
        .with_context(|| format!("Invalid entry '{entry}': expected TS-DELETED_AT"))?;
    Ok(DeletedKey {
        ts: ts
            .parse()
            .with_context(|| format!("Invalid timestamp in entry '{entry}'"))?,
        deleted_at: deleted_at
            .parse()
            .with_context(|| format!("Invalid deletion time in entry '{entry}'"))?,
    })
}
