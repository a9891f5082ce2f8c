//! Session command handlers.

use anyhow::{Result, bail};
use chatroom_core::{ApiClient, Config};

pub async fn list(config: &Config) -> Result<()> {
    let sessions = ApiClient::new(config)?.list_sessions().await?;
    if sessions.is_empty() {
        println!("No sessions found.");
    }
    for session in sessions {
        println!("{session}");
    }
    Ok(())
}

pub async fn add(config: &Config, session: &str) -> Result<()> {
    let session = session.trim();
    if session.is_empty() {
        bail!("Session name cannot be empty");
    }
    ApiClient::new(config)?.create_session(session).await?;
    println!("Created session '{session}'");
    Ok(())
}

pub async fn delete(config: &Config, session: &str, yes: bool) -> Result<()> {
    if !yes && !super::confirm(&format!("Delete session '{session}' and all of its messages?"))? {
        println!("Cancelled.");
        return Ok(());
    }
    ApiClient::new(config)?.delete_session(session).await?;
    println!("Deleted session '{session}'");
    Ok(())
}

pub async fn search(config: &Config, query: &str) -> Result<()> {
    let sessions = ApiClient::new(config)?.search(query).await?;
    if sessions.is_empty() {
        println!("No sessions mention '{query}'.");
    }
    for session in sessions {
        println!("{session}");
    }
    Ok(())
}
