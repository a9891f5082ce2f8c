//! Confirmation gate.
//!
//! Destructive operations are parked here until the user answers. The gate
//! holds at most one pending action; a new request replaces an unanswered
//! one. Once confirmed, the gate stays open until the submitted task
//! completes, then closes regardless of the outcome. A confirmation given
//! while a task of the same kind is still running is queued and submitted
//! when that task finishes.

use chatroom_types::{DeletedKey, SessionId};

use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::state::AppState;

/// The operation that runs when the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteSession {
        session: SessionId,
    },
    BatchDelete {
        session: SessionId,
        ts_list: Vec<i64>,
    },
    Restore {
        session: SessionId,
        entry: DeletedKey,
    },
    /// Entries are kept in restore order (oldest original timestamp first).
    RestoreBatch {
        session: SessionId,
        entries: Vec<DeletedKey>,
    },
}

impl PendingAction {
    pub fn task_kind(&self) -> TaskKind {
        match self {
            PendingAction::DeleteSession { .. } => TaskKind::SessionDelete,
            PendingAction::BatchDelete { .. } => TaskKind::BatchDelete,
            PendingAction::Restore { .. } | PendingAction::RestoreBatch { .. } => {
                TaskKind::Restore
            }
        }
    }

    /// Session whose message stores the action touches, if any.
    fn scoped_session(&self) -> Option<&str> {
        match self {
            PendingAction::DeleteSession { .. } => None,
            PendingAction::BatchDelete { session, .. }
            | PendingAction::Restore { session, .. }
            | PendingAction::RestoreBatch { session, .. } => Some(session),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PendingAction::DeleteSession { .. } => "session delete",
            PendingAction::BatchDelete { .. } => "batch delete",
            PendingAction::Restore { .. } | PendingAction::RestoreBatch { .. } => "restore",
        }
    }
}

/// Where a pending action stands after the prompt was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStatus {
    /// Waiting for `/yes` or `/no`.
    Awaiting,
    /// Confirmed, but a task of the same kind is still running.
    Queued,
    /// Confirmed and running; the gate closes when this task completes.
    Submitted(TaskId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmGate {
    #[default]
    Closed,
    Pending {
        message: String,
        action: PendingAction,
        status: ConfirmStatus,
    },
}

impl ConfirmGate {
    /// Opens the gate, replacing whatever was pending.
    pub fn request(&mut self, message: impl Into<String>, action: PendingAction) {
        *self = ConfirmGate::Pending {
            message: message.into(),
            action,
            status: ConfirmStatus::Awaiting,
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ConfirmGate::Pending { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ConfirmGate::Closed => None,
            ConfirmGate::Pending { message, .. } => Some(message),
        }
    }

    pub fn status(&self) -> Option<ConfirmStatus> {
        match self {
            ConfirmGate::Closed => None,
            ConfirmGate::Pending { status, .. } => Some(*status),
        }
    }

    pub fn close(&mut self) {
        *self = ConfirmGate::Closed;
    }

    /// Closes the gate if `task` is the one it is waiting on.
    pub fn finish(&mut self, task: TaskId) {
        if self.status() == Some(ConfirmStatus::Submitted(task)) {
            self.close();
        }
    }

    /// Task kind of a queued confirmation, if one is waiting.
    pub fn queued_kind(&self) -> Option<TaskKind> {
        match self {
            ConfirmGate::Pending {
                action,
                status: ConfirmStatus::Queued,
                ..
            } => Some(action.task_kind()),
            _ => None,
        }
    }

    fn set_status(&mut self, next: ConfirmStatus) {
        if let ConfirmGate::Pending { status, .. } = self {
            *status = next;
        }
    }
}

/// Runs the pending action. If a task of the same kind is still in flight
/// the confirmation is queued instead. No-op if nothing awaits an answer.
pub fn handle_confirm(app: &mut AppState) -> Vec<UiEffect> {
    let ConfirmGate::Pending {
        action,
        status: ConfirmStatus::Awaiting,
        ..
    } = &app.confirm
    else {
        return vec![];
    };

    if app.tasks.state(action.task_kind()).is_running() {
        let label = action.label();
        app.confirm.set_status(ConfirmStatus::Queued);
        app.notify(format!(
            "A {label} is still running; this one will start when it finishes"
        ));
        return vec![];
    }
    submit(app)
}

/// Submits a queued confirmation once nothing of its kind is running.
pub fn resume_queued(app: &mut AppState) -> Vec<UiEffect> {
    match app.confirm.queued_kind() {
        Some(kind) if !app.tasks.state(kind).is_running() => submit(app),
        _ => vec![],
    }
}

fn submit(app: &mut AppState) -> Vec<UiEffect> {
    let ConfirmGate::Pending { action, .. } = &app.confirm else {
        return vec![];
    };
    let action = action.clone();

    if let Some(session) = action.scoped_session()
        && !app.is_active(session)
    {
        app.confirm.close();
        app.notify(format!(
            "Session '{session}' is no longer open; nothing was changed"
        ));
        return vec![];
    }

    let task = app.tasks.start(action.task_kind(), &mut app.task_seq);
    app.confirm.set_status(ConfirmStatus::Submitted(task));

    let effect = match action {
        PendingAction::DeleteSession { session } => UiEffect::DeleteSession { task, session },
        PendingAction::BatchDelete { session, ts_list } => UiEffect::BatchDelete {
            task,
            session,
            ts_list,
        },
        PendingAction::Restore { session, entry } => UiEffect::Restore {
            task,
            session,
            entry,
        },
        PendingAction::RestoreBatch { session, entries } => UiEffect::RestoreBatch {
            task,
            session,
            entries,
        },
    };
    vec![effect]
}

/// Dismisses the gate without running anything.
pub fn handle_cancel(app: &mut AppState) -> Vec<UiEffect> {
    app.confirm.close();
    vec![]
}
