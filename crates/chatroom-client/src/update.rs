//! Client reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects in order.

use crate::effects::UiEffect;
use crate::events::{Action, MessageUiEvent, UiEvent};
use crate::features::{analytics, composer, deleted, messages, search, session};
use crate::overlays::confirm;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute. Never fails: backend errors arrive as
/// `Err(String)` inside result events and end up as notices.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Init => session::reload_sessions(app),
        UiEvent::Action(action) => handle_action(app, action),
        UiEvent::Channel { channel, event } => session::handle_channel_event(app, channel, event),
        UiEvent::TypingTimeout { generation } => composer::handle_typing_timeout(app, generation),
        UiEvent::TaskCompleted { kind, completed } => {
            let latest = app.tasks.state_mut(kind).finish_if_active(completed.id);
            if !latest && !kind.is_mutation() {
                return vec![];
            }
            app.confirm.finish(completed.id);
            let mut effects = update(app, *completed.result);
            effects.extend(confirm::resume_queued(app));
            effects
        }
        UiEvent::Session(event) => session::handle_session_event(app, event),
        UiEvent::Messages(event) => handle_message_event(app, event),
        UiEvent::Analytics(event) => analytics::handle_analytics_event(app, event),
    }
}

fn handle_action(app: &mut AppState, action: Action) -> Vec<UiEffect> {
    match action {
        Action::SelectSession(target) => {
            if app.sessions.active == target {
                return vec![];
            }
            session::select_session(app, target)
        }
        Action::Refresh => match app.sessions.active.clone() {
            Some(active) => session::refresh(app, &active),
            None => vec![],
        },
        Action::ReloadSessions => session::reload_sessions(app),
        Action::AddSession(name) => session::add_session(app, &name),
        Action::RequestDeleteSession(id) => session::request_delete_session(app, id),

        Action::SetInput(text) => composer::set_input(app, text),
        Action::Send => composer::send(app),

        Action::ToggleBatchMode => messages::toggle_batch_mode(app),
        Action::ToggleSelected(ts) => messages::toggle_selected(app, ts),
        Action::SelectAll(checked) => messages::select_all(app, checked),
        Action::RequestBatchDelete => messages::request_batch_delete(app),

        Action::ShowDeletedHistory(open) => deleted::show_history(app, open),
        Action::ToggleDeletedBatchMode => deleted::toggle_batch_mode(app),
        Action::ToggleDeletedSelected(key) => deleted::toggle_selected(app, key),
        Action::SelectAllDeleted(checked) => deleted::select_all(app, checked),
        Action::RequestRestore(key) => deleted::request_restore(app, key),
        Action::RequestRestoreBatch => deleted::request_restore_batch(app),

        Action::Confirm => confirm::handle_confirm(app),
        Action::Cancel => confirm::handle_cancel(app),

        Action::Search(query) => search::search(app, &query),
        Action::JumpToSession(id) => search::jump_to_session(app, id),

        Action::ShowAnalytics => analytics::show(app),
        Action::CloseAnalytics => analytics::close(app),

        Action::Quit => {
            app.should_quit = true;
            vec![UiEffect::Quit]
        }
    }
}

fn handle_message_event(app: &mut AppState, event: MessageUiEvent) -> Vec<UiEffect> {
    match event {
        MessageUiEvent::DeletedHistoryLoaded { session, result } => {
            deleted::handle_history_loaded(app, &session, result)
        }
        MessageUiEvent::BatchDeleted {
            session,
            ts_list,
            result,
        } => messages::handle_batch_deleted(app, &session, &ts_list, result),
        MessageUiEvent::Restored {
            session,
            entry,
            result,
        } => deleted::handle_restored(app, &session, entry, result),
        MessageUiEvent::RestoreBatchFinished {
            session,
            restored,
            failed,
        } => deleted::handle_restore_batch_finished(app, &session, &restored, &failed),
    }
}
