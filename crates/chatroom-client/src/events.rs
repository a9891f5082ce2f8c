//! Events consumed by the reducer.
//!
//! User intents arrive as [`Action`]s, everything else comes from the
//! runtime: live channel traffic, timers and async task results.

use chatroom_core::{ChannelEvent, ChannelId};
use chatroom_types::{DeletedKey, DeletedMessage, HourlyTrendResponse, SessionId};

use crate::common::{TaskCompleted, TaskKind};

#[derive(Debug)]
pub enum UiEvent {
    /// First event after startup.
    Init,
    Action(Action),
    Channel {
        channel: ChannelId,
        event: ChannelEvent,
    },
    TypingTimeout {
        generation: u64,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
    Session(SessionUiEvent),
    Messages(MessageUiEvent),
    Analytics(AnalyticsUiEvent),
}

impl From<Action> for UiEvent {
    fn from(action: Action) -> Self {
        UiEvent::Action(action)
    }
}

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectSession(Option<SessionId>),
    Refresh,
    ReloadSessions,
    AddSession(String),
    RequestDeleteSession(SessionId),

    SetInput(String),
    Send,

    ToggleBatchMode,
    ToggleSelected(i64),
    SelectAll(bool),
    RequestBatchDelete,

    ShowDeletedHistory(bool),
    ToggleDeletedBatchMode,
    ToggleDeletedSelected(DeletedKey),
    SelectAllDeleted(bool),
    RequestRestore(DeletedKey),
    RequestRestoreBatch,

    Confirm,
    Cancel,

    Search(String),
    JumpToSession(SessionId),

    ShowAnalytics,
    CloseAnalytics,

    Quit,
}

#[derive(Debug)]
pub enum SessionUiEvent {
    ListLoaded {
        result: Result<Vec<SessionId>, String>,
    },
    Created {
        session: SessionId,
        result: Result<(), String>,
    },
    Deleted {
        session: SessionId,
        result: Result<(), String>,
    },
    SearchLoaded {
        query: String,
        result: Result<Vec<SessionId>, String>,
    },
}

/// Results of message-level backend calls, tagged with the session they
/// were issued for.
#[derive(Debug)]
pub enum MessageUiEvent {
    DeletedHistoryLoaded {
        session: SessionId,
        result: Result<Vec<DeletedMessage>, String>,
    },
    BatchDeleted {
        session: SessionId,
        ts_list: Vec<i64>,
        result: Result<String, String>,
    },
    Restored {
        session: SessionId,
        entry: DeletedKey,
        result: Result<(), String>,
    },
    RestoreBatchFinished {
        session: SessionId,
        restored: Vec<DeletedKey>,
        failed: Vec<(DeletedKey, String)>,
    },
}

#[derive(Debug)]
pub enum AnalyticsUiEvent {
    TrendLoaded {
        session: SessionId,
        result: Result<HourlyTrendResponse, String>,
    },
}
