//! Full-text search across sessions.

use chatroom_types::SessionId;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::features::session;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    /// Sessions containing at least one match.
    pub results: Vec<SessionId>,
    /// True once a search finished, so "no results" can be told apart from
    /// "never searched".
    pub attempted: bool,
}

impl SearchState {
    pub fn clear(&mut self) {
        *self = SearchState::default();
    }
}

pub fn search(app: &mut AppState, query: &str) -> Vec<UiEffect> {
    let query = query.trim();
    if query.is_empty() {
        return vec![];
    }
    app.search.query = query.to_string();
    app.search.attempted = false;
    let task = app.tasks.start(TaskKind::Search, &mut app.task_seq);
    vec![UiEffect::Search {
        task,
        query: query.to_string(),
    }]
}

pub(crate) fn handle_results(
    app: &mut AppState,
    query: String,
    result: Result<Vec<SessionId>, String>,
) {
    if app.search.query != query {
        return;
    }
    app.search.attempted = true;
    match result {
        Ok(results) => app.search.results = results,
        Err(error) => {
            app.search.results.clear();
            app.notify(format!("Search failed: {error}"));
        }
    }
}

/// Opens a session from the search results and clears the search.
pub fn jump_to_session(app: &mut AppState, session: SessionId) -> Vec<UiEffect> {
    app.search.clear();
    app.tasks.search.clear();
    session::select_session(app, Some(session))
}
