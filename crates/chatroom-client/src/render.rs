//! Line-oriented rendering.
//!
//! The renderer remembers what it last printed and writes only what changed
//! since, so it can be called after every batch of events.

use std::collections::BTreeSet;
use std::io::{self, Write};

use chatroom_types::{DeletedKey, DeletedMessage, HourlyTrend, Message, SessionId};
use chrono::{DateTime, Local};
use comfy_table::Table;

use crate::common::commands::COMMANDS;
use crate::features::session::ChannelState;
use crate::state::AppState;

const TREND_BAR_WIDTH: u64 = 30;

#[derive(Debug, Default)]
pub struct Renderer {
    started: bool,
    session_revision: u64,
    session: Option<SessionId>,
    channel: ChannelState,
    message_generation: u64,
    printed_messages: usize,
    batch_mode: bool,
    selection: BTreeSet<i64>,
    typing: bool,
    /// `(generation, selection)` of the deleted list last printed while open.
    deleted_view: Option<(u64, BTreeSet<DeletedKey>)>,
    deleted_batch_mode: bool,
    confirm: Option<String>,
    notices_seen: u64,
    search: Option<(String, Vec<SessionId>)>,
    analytics: Option<(Vec<HourlyTrend>, Option<String>)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes everything that changed since the previous call.
    pub fn render(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        self.render_session_list(app, out)?;
        self.render_session(app, out)?;
        self.render_messages(app, out)?;
        self.render_selection(app, out)?;
        self.render_deleted(app, out)?;
        self.render_search(app, out)?;
        self.render_analytics(app, out)?;
        self.render_typing(app, out)?;
        self.render_notices(app, out)?;
        self.render_confirm(app, out)?;
        out.flush()
    }

    fn render_session_list(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        if self.session_revision == app.sessions.revision {
            return Ok(());
        }
        self.session_revision = app.sessions.revision;
        write!(out, "{}", sessions_listing(app))
    }

    fn render_session(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        if !self.started || self.session != app.sessions.active {
            self.started = true;
            self.session.clone_from(&app.sessions.active);
            self.channel = ChannelState::Idle;
            match &app.sessions.active {
                Some(session) => writeln!(out, "=== {session} ===")?,
                None => writeln!(
                    out,
                    "No session open. /sessions to list, /open <session> to join."
                )?,
            }
        }

        if self.channel != app.channel {
            self.channel = app.channel;
            match app.channel {
                ChannelState::Idle => {}
                ChannelState::Connecting(_) => writeln!(out, "(connecting...)")?,
                ChannelState::Open(_) => writeln!(out, "(connected)")?,
                ChannelState::Lost(_) => writeln!(out, "(disconnected)")?,
            }
        }
        Ok(())
    }

    fn render_messages(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let messages = &app.messages;
        if self.message_generation != messages.generation {
            self.message_generation = messages.generation;
            self.printed_messages = 0;
        }
        self.printed_messages = self.printed_messages.min(messages.items.len());
        for (index, message) in messages.items.iter().enumerate().skip(self.printed_messages) {
            writeln!(out, "{}", format_message(index + 1, message))?;
        }
        self.printed_messages = messages.items.len();
        Ok(())
    }

    fn render_selection(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let messages = &app.messages;
        if self.batch_mode != messages.batch_mode {
            self.batch_mode = messages.batch_mode;
            if messages.batch_mode {
                writeln!(out, "Selection mode on. /select <n>, /all, /none, /delete")?;
            } else {
                writeln!(out, "Selection mode off.")?;
            }
        }
        if self.selection != messages.selection {
            self.selection.clone_from(&messages.selection);
            if messages.batch_mode {
                let numbers: Vec<String> = messages
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| messages.is_selected(m.ts))
                    .map(|(i, _)| (i + 1).to_string())
                    .collect();
                if numbers.is_empty() {
                    writeln!(out, "Selected: none")?;
                } else {
                    writeln!(out, "Selected: {}", numbers.join(", "))?;
                }
            }
        }
        Ok(())
    }

    fn render_deleted(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let deleted = &app.deleted;
        if self.deleted_batch_mode != deleted.batch_mode {
            self.deleted_batch_mode = deleted.batch_mode;
            if deleted.batch_mode {
                writeln!(out, "Deleted selection mode on. /dselect <n>, /dall, /dnone, /restore")?;
            }
        }

        if !deleted.view_open {
            self.deleted_view = None;
            return Ok(());
        }
        let snapshot = (
            deleted.generation,
            deleted.selection.keys().copied().collect::<BTreeSet<_>>(),
        );
        if self.deleted_view.as_ref() == Some(&snapshot) {
            return Ok(());
        }
        self.deleted_view = Some(snapshot);

        writeln!(out, "--- deleted messages ---")?;
        if deleted.items.is_empty() {
            writeln!(out, "(none)")?;
        }
        for (index, entry) in deleted.items.iter().enumerate() {
            let marker = if deleted.batch_mode {
                if deleted.is_selected(entry.key()) { "[x] " } else { "[ ] " }
            } else {
                ""
            };
            writeln!(out, "{marker}{}", format_deleted(index + 1, entry))?;
        }
        writeln!(out, "------------------------")
    }

    fn render_search(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let search = &app.search;
        if !search.attempted {
            self.search = None;
            return Ok(());
        }
        let snapshot = (search.query.clone(), search.results.clone());
        if self.search.as_ref() == Some(&snapshot) {
            return Ok(());
        }
        self.search = Some(snapshot);

        if search.results.is_empty() {
            return writeln!(out, "No sessions mention '{}'.", search.query);
        }
        writeln!(out, "Sessions mentioning '{}':", search.query)?;
        for (index, session) in search.results.iter().enumerate() {
            writeln!(out, "  {}. {session}", index + 1)?;
        }
        writeln!(out, "/jump <n> to open one.")
    }

    fn render_analytics(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let analytics = &app.analytics;
        if !analytics.visible {
            self.analytics = None;
            return Ok(());
        }
        let snapshot = (analytics.trend.clone(), analytics.note.clone());
        if self.analytics.as_ref() == Some(&snapshot) {
            return Ok(());
        }
        self.analytics = Some(snapshot);
        writeln!(
            out,
            "{}",
            trend_table(&analytics.trend, analytics.note.as_deref())
        )
    }

    fn render_typing(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let typing = app.composer.assistant_typing;
        if self.typing != typing {
            self.typing = typing;
            if typing {
                writeln!(out, "{} is typing...", app.settings.assistant_sender)?;
            }
        }
        Ok(())
    }

    fn render_notices(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let unseen = app.notices_posted.wrapping_sub(self.notices_seen);
        let unseen = usize::try_from(unseen).unwrap_or(usize::MAX);
        let skip = app.notices.len().saturating_sub(unseen);
        for notice in app.notices.iter().skip(skip) {
            writeln!(out, "! {notice}")?;
        }
        self.notices_seen = app.notices_posted;
        Ok(())
    }

    fn render_confirm(&mut self, app: &AppState, out: &mut impl Write) -> io::Result<()> {
        let message = app.confirm.message().map(str::to_string);
        if self.confirm != message {
            self.confirm.clone_from(&message);
            if let Some(message) = message {
                writeln!(out, "? {message} (/yes or /no)")?;
            }
        }
        Ok(())
    }
}

/// Known sessions, one per line, the active one marked with `*`.
pub fn sessions_listing(app: &AppState) -> String {
    if app.sessions.list.is_empty() {
        return "No sessions. /new <session> to create one.\n".to_string();
    }
    let mut listing = String::from("Sessions:\n");
    for (index, session) in app.sessions.list.iter().enumerate() {
        let marker = if app.is_active(session) { "*" } else { " " };
        listing.push_str(&format!("{marker} {}. {session}\n", index + 1));
    }
    listing
}

pub fn format_message(number: usize, message: &Message) -> String {
    format!(
        "{number:>3}  [{}] {}: {}",
        format_ts_millis(message.ts),
        message.sender,
        message.content
    )
}

pub fn format_deleted(number: usize, entry: &DeletedMessage) -> String {
    let deleted_at = DateTime::from_timestamp(entry.deleted_at, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| entry.deleted_at.to_string());
    format!(
        "{number:>3}  [{}] {}: {}  (deleted {deleted_at})",
        format_ts_millis(entry.ts),
        entry.sender.as_deref().unwrap_or("?"),
        entry.content
    )
}

fn format_ts_millis(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Renders the hourly trend as a table with a proportional bar per slot.
/// An empty trend prints `empty_note` when the backend sent one.
pub fn trend_table(trend: &[HourlyTrend], empty_note: Option<&str>) -> String {
    if trend.is_empty() {
        return empty_note
            .unwrap_or("No activity recorded for this session.")
            .to_string();
    }
    let max = trend.iter().map(|t| t.count).max().unwrap_or(0).max(1);

    let mut table = Table::new();
    table.set_header(vec!["Hour", "Messages", ""]);
    for slot in trend {
        let width = (slot.count * TREND_BAR_WIDTH).div_ceil(max);
        table.add_row(vec![
            slot.time_slot.clone(),
            slot.count.to_string(),
            "#".repeat(width as usize),
        ]);
    }
    table.to_string()
}

pub fn help_text() -> String {
    let mut lines = vec!["Type a message and press Enter to send it. Commands:".to_string()];
    for command in COMMANDS {
        let synopsis = if command.usage.is_empty() {
            format!("/{}", command.display_name())
        } else {
            format!("/{} {}", command.display_name(), command.usage)
        };
        lines.push(format!("  {synopsis:<34} {}", command.description));
    }
    lines.join("\n")
}
