//! Async task bookkeeping.
//!
//! Every backend call is a task. The reducer allocates the id and marks the
//! task active when it emits the effect. Fetch completions whose id is no
//! longer active for their kind are dropped; mutation completions are always
//! applied, since the server has already acted on them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SessionList,
    SessionCreate,
    SessionDelete,
    DeletedHistory,
    BatchDelete,
    Restore,
    Search,
    HourlyTrend,
}

impl TaskKind {
    /// True for calls that change server state.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            TaskKind::SessionCreate
                | TaskKind::SessionDelete
                | TaskKind::BatchDelete
                | TaskKind::Restore
        )
    }
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub session_list: TaskState,
    pub session_create: TaskState,
    pub session_delete: TaskState,
    pub deleted_history: TaskState,
    pub batch_delete: TaskState,
    pub restore: TaskState,
    pub search: TaskState,
    pub hourly_trend: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SessionList => &self.session_list,
            TaskKind::SessionCreate => &self.session_create,
            TaskKind::SessionDelete => &self.session_delete,
            TaskKind::DeletedHistory => &self.deleted_history,
            TaskKind::BatchDelete => &self.batch_delete,
            TaskKind::Restore => &self.restore,
            TaskKind::Search => &self.search,
            TaskKind::HourlyTrend => &self.hourly_trend,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SessionList => &mut self.session_list,
            TaskKind::SessionCreate => &mut self.session_create,
            TaskKind::SessionDelete => &mut self.session_delete,
            TaskKind::DeletedHistory => &mut self.deleted_history,
            TaskKind::BatchDelete => &mut self.batch_delete,
            TaskKind::Restore => &mut self.restore,
            TaskKind::Search => &mut self.search,
            TaskKind::HourlyTrend => &mut self.hourly_trend,
        }
    }

    /// Allocates an id and marks it as the active task for `kind`.
    ///
    /// Any previously active task of the same kind is superseded.
    pub fn start(&mut self, kind: TaskKind, seq: &mut TaskSeq) -> TaskId {
        let id = seq.next_id();
        self.state_mut(kind).start(id);
        id
    }
}
