//! Application state.
//!
//! Each feature owns a slice; the reducer is the only writer.

use std::collections::VecDeque;
use std::time::Duration;

use chatroom_core::Config;
use chatroom_types::{DEFAULT_ASSISTANT_SENDER, DEFAULT_SELF_SENDER};

use crate::common::{TaskSeq, Tasks};
use crate::features::analytics::AnalyticsState;
use crate::features::composer::ComposerState;
use crate::features::deleted::DeletedState;
use crate::features::messages::MessageState;
use crate::features::search::SearchState;
use crate::features::session::{ChannelState, SessionState};
use crate::overlays::ConfirmGate;

/// Notices kept for display; older ones are dropped.
pub const MAX_NOTICES: usize = 50;

/// Values the reducer needs from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub self_sender: String,
    pub assistant_sender: String,
    pub typing_timeout: Duration,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            self_sender: config.self_sender.clone(),
            assistant_sender: config.assistant_sender.clone(),
            typing_timeout: config.typing_timeout(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            self_sender: DEFAULT_SELF_SENDER.to_string(),
            assistant_sender: DEFAULT_ASSISTANT_SENDER.to_string(),
            typing_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub settings: ClientSettings,
    pub sessions: SessionState,
    pub channel: ChannelState,
    pub messages: MessageState,
    pub deleted: DeletedState,
    pub composer: ComposerState,
    pub search: SearchState,
    pub analytics: AnalyticsState,
    pub confirm: ConfirmGate,
    /// Most recent user-visible notices, oldest first.
    pub notices: VecDeque<String>,
    /// Notices posted since startup, including dropped ones.
    pub notices_posted: u64,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notices.push_back(text.into());
        self.notices_posted = self.notices_posted.wrapping_add(1);
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    /// True if `session` is the currently active session.
    pub fn is_active(&self, session: &str) -> bool {
        self.sessions.active.as_deref() == Some(session)
    }
}
