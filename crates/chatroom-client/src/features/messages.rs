//! Message store of the active session and batch selection.

use std::collections::BTreeSet;

use chatroom_types::Message;

use crate::effects::UiEffect;
use crate::features::session;
use crate::overlays::PendingAction;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageState {
    /// Delivered messages in arrival order, without duplicates.
    pub items: Vec<Message>,
    /// Timestamps of selected messages. Only meaningful in batch mode.
    pub selection: BTreeSet<i64>,
    pub batch_mode: bool,
    /// Bumped every time the store is wiped.
    pub generation: u64,
}

impl MessageState {
    /// Appends `message` unless an identical delivery is already stored.
    pub fn ingest(&mut self, message: Message) -> bool {
        if self.items.iter().any(|m| m.same_delivery(&message)) {
            return false;
        }
        self.items.push(message);
        true
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.selection.clear();
        self.batch_mode = false;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn contains_ts(&self, ts: i64) -> bool {
        self.items.iter().any(|m| m.ts == ts)
    }

    pub fn is_selected(&self, ts: i64) -> bool {
        self.selection.contains(&ts)
    }

    fn remove_ts(&mut self, ts_list: &[i64]) {
        self.items.retain(|m| !ts_list.contains(&m.ts));
    }
}

pub fn toggle_batch_mode(app: &mut AppState) -> Vec<UiEffect> {
    let messages = &mut app.messages;
    messages.batch_mode = !messages.batch_mode;
    messages.selection.clear();
    vec![]
}

pub fn toggle_selected(app: &mut AppState, ts: i64) -> Vec<UiEffect> {
    let messages = &mut app.messages;
    if !messages.batch_mode || !messages.contains_ts(ts) {
        return vec![];
    }
    if !messages.selection.remove(&ts) {
        messages.selection.insert(ts);
    }
    vec![]
}

pub fn select_all(app: &mut AppState, checked: bool) -> Vec<UiEffect> {
    let messages = &mut app.messages;
    if !messages.batch_mode {
        return vec![];
    }
    messages.selection = if checked {
        messages.items.iter().map(|m| m.ts).collect()
    } else {
        BTreeSet::new()
    };
    vec![]
}

/// Asks for confirmation before deleting the selection.
///
/// Nothing happens without an active session or with an empty selection.
pub fn request_batch_delete(app: &mut AppState) -> Vec<UiEffect> {
    let Some(session) = app.sessions.active.clone() else {
        return vec![];
    };
    if app.messages.selection.is_empty() {
        return vec![];
    }
    let ts_list: Vec<i64> = app.messages.selection.iter().copied().collect();
    app.confirm.request(
        format!(
            "Delete {} selected message(s)? They can be restored from the deleted history.",
            ts_list.len()
        ),
        PendingAction::BatchDelete { session, ts_list },
    );
    vec![]
}

pub fn handle_batch_deleted(
    app: &mut AppState,
    session: &str,
    ts_list: &[i64],
    result: Result<String, String>,
) -> Vec<UiEffect> {
    match result {
        Ok(_) if app.is_active(session) => {
            app.messages.remove_ts(ts_list);
            app.messages.selection.clear();
            app.messages.batch_mode = false;
            session::refresh(app, session)
        }
        Ok(_) => vec![],
        Err(error) => {
            app.notify(format!("Batch delete failed: {error}"));
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_skips_identical_delivery() {
        let mut state = MessageState::default();
        assert!(state.ingest(Message::new("me", "hi", 1)));
        assert!(!state.ingest(Message::new("me", "hi", 1)));
        assert!(state.ingest(Message::new("me", "hi", 2)));
        assert!(state.ingest(Message::new("AI", "hi", 1)));
        assert_eq!(state.items.len(), 3);
    }

    #[test]
    fn test_select_requires_batch_mode_and_known_ts() {
        let mut app = AppState::default();
        app.messages.ingest(Message::new("me", "a", 10));

        toggle_selected(&mut app, 10);
        assert!(app.messages.selection.is_empty());

        toggle_batch_mode(&mut app);
        toggle_selected(&mut app, 99);
        assert!(app.messages.selection.is_empty());
        toggle_selected(&mut app, 10);
        assert!(app.messages.is_selected(10));
        toggle_selected(&mut app, 10);
        assert!(!app.messages.is_selected(10));
    }

    #[test]
    fn test_select_all_and_none() {
        let mut app = AppState::default();
        app.messages.ingest(Message::new("me", "a", 10));
        app.messages.ingest(Message::new("AI", "b", 20));
        toggle_batch_mode(&mut app);

        select_all(&mut app, true);
        assert_eq!(app.messages.selection, BTreeSet::from([10, 20]));
        select_all(&mut app, false);
        assert!(app.messages.selection.is_empty());
    }
}
