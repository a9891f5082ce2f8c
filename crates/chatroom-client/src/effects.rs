//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O, timers and task spawning only; the reducer never
//! touches the network itself.

use std::time::Duration;

use chatroom_core::ChannelId;
use chatroom_types::{DeletedKey, SessionId};

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Open the live channel for a session.
    OpenChannel {
        channel: ChannelId,
        session: SessionId,
    },

    /// Close a live channel. Always emitted before the replacement is opened.
    CloseChannel { channel: ChannelId },

    /// Transmit a message; the runtime stamps the timestamp.
    SendMessage {
        channel: ChannelId,
        sender: String,
        content: String,
    },

    /// Fire `TypingTimeout { generation }` after `after`.
    StartTypingTimer { generation: u64, after: Duration },

    LoadSessions {
        task: TaskId,
    },
    CreateSession {
        task: TaskId,
        session: SessionId,
    },
    DeleteSession {
        task: TaskId,
        session: SessionId,
    },
    LoadDeletedHistory {
        task: TaskId,
        session: SessionId,
    },
    BatchDelete {
        task: TaskId,
        session: SessionId,
        ts_list: Vec<i64>,
    },
    Restore {
        task: TaskId,
        session: SessionId,
        entry: DeletedKey,
    },
    /// Restore entries one at a time, in the given order.
    RestoreBatch {
        task: TaskId,
        session: SessionId,
        entries: Vec<DeletedKey>,
    },
    Search {
        task: TaskId,
        query: String,
    },
    LoadHourlyTrend {
        task: TaskId,
        session: SessionId,
    },
}
