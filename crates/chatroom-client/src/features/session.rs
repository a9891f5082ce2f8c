//! Session registry and the live channel of the active session.

use chatroom_core::{ChannelEvent, ChannelId};
use chatroom_types::SessionId;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::SessionUiEvent;
use crate::overlays::PendingAction;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Known sessions, in server order.
    pub list: Vec<SessionId>,
    /// Session whose messages are shown. At most one.
    pub active: Option<SessionId>,
    /// Bumped whenever the list may have changed: a load finished, or a
    /// session was created or deleted.
    pub revision: u64,
    /// Most recently requested create; only that one is selected on success.
    pub latest_create: Option<SessionId>,
}

impl SessionState {
    pub fn contains(&self, session: &str) -> bool {
        self.list.iter().any(|s| s == session)
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Lifecycle of the active session's live channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Idle,
    Connecting(ChannelId),
    Open(ChannelId),
    /// The server closed or the connection failed; the handle still exists.
    Lost(ChannelId),
}

impl ChannelState {
    pub fn id(&self) -> Option<ChannelId> {
        match *self {
            ChannelState::Idle => None,
            ChannelState::Connecting(id) | ChannelState::Open(id) | ChannelState::Lost(id) => {
                Some(id)
            }
        }
    }

    pub fn take(&mut self) -> Option<ChannelId> {
        std::mem::take(self).id()
    }
}

/// Makes `target` the active session.
///
/// Tears down everything scoped to the previous session first: its channel
/// is closed before the new one is opened, and both message stores, both
/// selections, the typing indicator and the session views are reset.
pub fn select_session(app: &mut AppState, target: Option<SessionId>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    if let Some(channel) = app.channel.take() {
        effects.push(UiEffect::CloseChannel { channel });
    }

    app.messages.reset();
    app.deleted.reset();
    app.composer.reset_typing();
    app.analytics.reset();
    app.tasks.deleted_history.clear();
    app.tasks.hourly_trend.clear();

    app.sessions.active.clone_from(&target);
    let Some(session) = target else {
        return effects;
    };

    let channel = ChannelId(app.task_seq.next_id().0);
    app.channel = ChannelState::Connecting(channel);
    effects.push(UiEffect::OpenChannel {
        channel,
        session: session.clone(),
    });

    let task = app.tasks.start(TaskKind::DeletedHistory, &mut app.task_seq);
    effects.push(UiEffect::LoadDeletedHistory { task, session });
    effects
}

/// Reloads `session` from scratch. Ignored unless it is still active.
pub fn refresh(app: &mut AppState, session: &str) -> Vec<UiEffect> {
    if !app.is_active(session) {
        return vec![];
    }
    select_session(app, Some(session.to_string()))
}

pub fn reload_sessions(app: &mut AppState) -> Vec<UiEffect> {
    let task = app.tasks.start(TaskKind::SessionList, &mut app.task_seq);
    vec![UiEffect::LoadSessions { task }]
}

pub fn add_session(app: &mut AppState, name: &str) -> Vec<UiEffect> {
    let session = name.trim();
    if session.is_empty() {
        return vec![];
    }
    let task = app.tasks.start(TaskKind::SessionCreate, &mut app.task_seq);
    app.sessions.latest_create = Some(session.to_string());
    vec![UiEffect::CreateSession {
        task,
        session: session.to_string(),
    }]
}

pub fn request_delete_session(app: &mut AppState, session: SessionId) -> Vec<UiEffect> {
    app.confirm.request(
        format!("Delete session '{session}' and all of its messages?"),
        PendingAction::DeleteSession { session },
    );
    vec![]
}

pub fn handle_session_event(app: &mut AppState, event: SessionUiEvent) -> Vec<UiEffect> {
    match event {
        SessionUiEvent::ListLoaded { result } => {
            app.sessions.bump_revision();
            match result {
                Ok(list) => app.sessions.list = list,
                Err(error) => {
                    app.sessions.list.clear();
                    app.notify(format!("Could not load sessions: {error}"));
                }
            }
            vec![]
        }
        SessionUiEvent::Created { session, result } => {
            let latest = app.sessions.latest_create.as_ref() == Some(&session);
            if latest {
                app.sessions.latest_create = None;
            }
            match result {
                Ok(()) => {
                    if !app.sessions.contains(&session) {
                        app.sessions.list.push(session.clone());
                    }
                    app.sessions.bump_revision();
                    if latest {
                        select_session(app, Some(session))
                    } else {
                        vec![]
                    }
                }
                Err(error) => {
                    app.notify(format!("Could not create session '{session}': {error}"));
                    vec![]
                }
            }
        }
        SessionUiEvent::Deleted { session, result } => match result {
            Ok(()) => {
                app.sessions.list.retain(|s| *s != session);
                app.sessions.bump_revision();
                app.search.results.retain(|s| *s != session);
                if app.is_active(&session) {
                    select_session(app, None)
                } else {
                    vec![]
                }
            }
            Err(error) => {
                app.notify(format!("Could not delete session '{session}': {error}"));
                vec![]
            }
        },
        SessionUiEvent::SearchLoaded { query, result } => {
            crate::features::search::handle_results(app, query, result);
            vec![]
        }
    }
}

/// Applies one live channel event. Events from any channel other than the
/// current one are dropped.
pub fn handle_channel_event(
    app: &mut AppState,
    channel: ChannelId,
    event: ChannelEvent,
) -> Vec<UiEffect> {
    if app.channel.id() != Some(channel) {
        return vec![];
    }

    match event {
        ChannelEvent::Opened => {
            app.channel = ChannelState::Open(channel);
        }
        ChannelEvent::Message(message) => {
            if message.sender == app.settings.assistant_sender {
                app.composer.assistant_typing = false;
            }
            app.messages.ingest(message);
        }
        ChannelEvent::Closed => {
            app.channel = ChannelState::Lost(channel);
            app.notify("Live updates closed by the server; use /refresh to reconnect");
        }
        ChannelEvent::Failed(error) => {
            app.channel = ChannelState::Lost(channel);
            app.notify(format!("Live updates unavailable: {error}"));
        }
    }
    vec![]
}
