//! Deleted-message history of the active session: viewing, selection and
//! restore.

use std::collections::BTreeMap;

use chatroom_types::{DeletedKey, DeletedMessage};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::features::session;
use crate::overlays::PendingAction;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletedState {
    /// Entries as returned by the server.
    pub items: Vec<DeletedMessage>,
    /// Selected entries keyed by `(ts, deleted_at)`, so iteration is in
    /// restore order.
    pub selection: BTreeMap<DeletedKey, DeletedMessage>,
    pub batch_mode: bool,
    pub view_open: bool,
    /// Bumped every time the store is replaced or wiped.
    pub generation: u64,
}

impl DeletedState {
    pub fn reset(&mut self) {
        self.items.clear();
        self.selection.clear();
        self.batch_mode = false;
        self.view_open = false;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn find(&self, key: DeletedKey) -> Option<&DeletedMessage> {
        self.items.iter().find(|entry| entry.key() == key)
    }

    pub fn is_selected(&self, key: DeletedKey) -> bool {
        self.selection.contains_key(&key)
    }

    fn replace(&mut self, items: Vec<DeletedMessage>) {
        self.items = items;
        self.selection
            .retain(|key, _| self.items.iter().any(|entry| entry.key() == *key));
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Opens or closes the history view. Opening reloads the history.
pub fn show_history(app: &mut AppState, open: bool) -> Vec<UiEffect> {
    if !open {
        app.deleted.view_open = false;
        return vec![];
    }
    let Some(session) = app.sessions.active.clone() else {
        return vec![];
    };
    app.deleted.view_open = true;
    let task = app.tasks.start(TaskKind::DeletedHistory, &mut app.task_seq);
    vec![UiEffect::LoadDeletedHistory { task, session }]
}

pub fn toggle_batch_mode(app: &mut AppState) -> Vec<UiEffect> {
    let deleted = &mut app.deleted;
    deleted.batch_mode = !deleted.batch_mode;
    deleted.selection.clear();
    vec![]
}

pub fn toggle_selected(app: &mut AppState, key: DeletedKey) -> Vec<UiEffect> {
    let deleted = &mut app.deleted;
    if !deleted.batch_mode {
        return vec![];
    }
    if deleted.selection.remove(&key).is_none()
        && let Some(entry) = deleted.find(key).cloned()
    {
        deleted.selection.insert(key, entry);
    }
    vec![]
}

pub fn select_all(app: &mut AppState, checked: bool) -> Vec<UiEffect> {
    let deleted = &mut app.deleted;
    if !deleted.batch_mode {
        return vec![];
    }
    deleted.selection = if checked {
        deleted
            .items
            .iter()
            .map(|entry| (entry.key(), entry.clone()))
            .collect()
    } else {
        BTreeMap::new()
    };
    vec![]
}

pub fn request_restore(app: &mut AppState, entry: DeletedKey) -> Vec<UiEffect> {
    let Some(session) = app.sessions.active.clone() else {
        return vec![];
    };
    if app.deleted.find(entry).is_none() {
        return vec![];
    }
    app.confirm.request(
        "Restore this message to the conversation?",
        PendingAction::Restore { session, entry },
    );
    vec![]
}

/// Asks for confirmation before restoring the selection, oldest first.
pub fn request_restore_batch(app: &mut AppState) -> Vec<UiEffect> {
    let Some(session) = app.sessions.active.clone() else {
        return vec![];
    };
    if app.deleted.selection.is_empty() {
        return vec![];
    }
    let mut entries: Vec<DeletedKey> = app.deleted.selection.keys().copied().collect();
    entries.sort_by_key(|key| (key.ts, key.deleted_at));
    app.confirm.request(
        format!(
            "Restore {} message(s)? They are re-inserted oldest first.",
            entries.len()
        ),
        PendingAction::RestoreBatch { session, entries },
    );
    vec![]
}

pub fn handle_history_loaded(
    app: &mut AppState,
    session: &str,
    result: Result<Vec<DeletedMessage>, String>,
) -> Vec<UiEffect> {
    if !app.is_active(session) {
        return vec![];
    }
    match result {
        Ok(items) => app.deleted.replace(items),
        Err(error) => {
            app.deleted.replace(Vec::new());
            app.notify(format!("Could not load deleted history: {error}"));
        }
    }
    vec![]
}

pub fn handle_restored(
    app: &mut AppState,
    session: &str,
    entry: DeletedKey,
    result: Result<(), String>,
) -> Vec<UiEffect> {
    match result {
        Ok(()) if app.is_active(session) => {
            app.deleted.items.retain(|item| item.key() != entry);
            app.deleted.selection.remove(&entry);
            app.deleted.view_open = false;
            session::refresh(app, session)
        }
        Ok(()) => vec![],
        Err(error) => {
            app.notify(format!("Restore failed: {error}"));
            vec![]
        }
    }
}

pub fn handle_restore_batch_finished(
    app: &mut AppState,
    session: &str,
    restored: &[DeletedKey],
    failed: &[(DeletedKey, String)],
) -> Vec<UiEffect> {
    if !failed.is_empty() {
        app.notify(format!(
            "Restored {} of {} message(s); {} failed",
            restored.len(),
            restored.len() + failed.len(),
            failed.len()
        ));
    }
    if !app.is_active(session) {
        return vec![];
    }
    app.deleted.selection.clear();
    app.deleted.batch_mode = false;
    app.deleted.view_open = false;
    session::refresh(app, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: i64, deleted_at: i64) -> DeletedMessage {
        DeletedMessage {
            sender: Some("me".to_string()),
            content: format!("m{ts}"),
            ts,
            deleted_at,
            session_id: None,
        }
    }

    fn key(ts: i64, deleted_at: i64) -> DeletedKey {
        DeletedKey { ts, deleted_at }
    }

    #[test]
    fn test_same_ts_different_deletions_are_distinct() {
        let mut app = AppState::default();
        app.deleted.items = vec![entry(10, 100), entry(10, 200)];
        toggle_batch_mode(&mut app);

        toggle_selected(&mut app, key(10, 200));
        assert!(app.deleted.is_selected(key(10, 200)));
        assert!(!app.deleted.is_selected(key(10, 100)));
    }

    #[test]
    fn test_toggle_unknown_entry_is_ignored() {
        let mut app = AppState::default();
        app.deleted.items = vec![entry(10, 100)];
        toggle_batch_mode(&mut app);
        toggle_selected(&mut app, key(11, 100));
        assert!(app.deleted.selection.is_empty());
    }

    #[test]
    fn test_replace_drops_stale_selection() {
        let mut state = DeletedState::default();
        state.items = vec![entry(1, 5), entry(2, 5)];
        state.selection.insert(key(1, 5), entry(1, 5));
        state.selection.insert(key(2, 5), entry(2, 5));

        state.replace(vec![entry(2, 5)]);
        assert_eq!(state.selection.keys().copied().collect::<Vec<_>>(), [key(2, 5)]);
    }

    #[test]
    fn test_history_view_needs_active_session() {
        let mut app = AppState::default();
        assert!(show_history(&mut app, true).is_empty());
        assert!(!app.deleted.view_open);
    }
}
