//! Hourly activity chart for the active session.

use chatroom_types::HourlyTrend;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::AnalyticsUiEvent;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalyticsState {
    pub visible: bool,
    pub trend: Vec<HourlyTrend>,
    /// Backend note shown in place of an empty chart.
    pub note: Option<String>,
}

impl AnalyticsState {
    pub fn reset(&mut self) {
        self.visible = false;
        self.trend.clear();
        self.note = None;
    }
}

pub fn show(app: &mut AppState) -> Vec<UiEffect> {
    let Some(session) = app.sessions.active.clone() else {
        return vec![];
    };
    let task = app.tasks.start(TaskKind::HourlyTrend, &mut app.task_seq);
    vec![UiEffect::LoadHourlyTrend { task, session }]
}

pub fn close(app: &mut AppState) -> Vec<UiEffect> {
    app.analytics.visible = false;
    vec![]
}

/// A failed load still opens the chart, just empty.
pub fn handle_analytics_event(app: &mut AppState, event: AnalyticsUiEvent) -> Vec<UiEffect> {
    match event {
        AnalyticsUiEvent::TrendLoaded { session, result } => {
            if !app.is_active(&session) {
                return vec![];
            }
            let report = result.unwrap_or_default();
            app.analytics.trend = report.hourly_trend;
            app.analytics.note = report.message;
            app.analytics.visible = true;
            vec![]
        }
    }
}
