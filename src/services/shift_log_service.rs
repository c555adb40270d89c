use crate::{
    access::Action,
    error::AppResult,
    models::{Role, ShiftAction, ShiftLog},
    params::ActionFilter,
    session::Session,
    state::AppState,
};

/// Shown in place of a duration that cannot be computed.
pub const DURATION_UNAVAILABLE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionCounts {
    pub all: usize,
    pub open: usize,
    pub close: usize,
}

/// Shift open/close events in the order the backend returned them.
#[derive(Debug, Clone, Default)]
pub struct ShiftLogView {
    logs: Vec<ShiftLog>,
}

impl ShiftLogView {
    pub fn from_logs(logs: Vec<ShiftLog>) -> Self {
        Self { logs }
    }

    pub async fn load(state: &AppState, session: &Session) -> AppResult<Self> {
        let mut view = Self::default();
        view.refresh(state, session).await?;
        Ok(view)
    }

    pub async fn refresh(&mut self, state: &AppState, session: &Session) -> AppResult<()> {
        let user = session.require(Action::ViewShiftLogs)?;
        let operator_id = (user.role == Role::Operator).then_some(user.id);
        self.logs = state.backend.shift_logs(operator_id).await?;
        Ok(())
    }

    pub fn logs(&self) -> &[ShiftLog] {
        &self.logs
    }

    pub fn filter(&self, filter: ActionFilter) -> Vec<&ShiftLog> {
        self.logs
            .iter()
            .filter(|log| filter.matches(log.action))
            .collect()
    }

    pub fn counts(&self) -> ActionCounts {
        let open = self
            .logs
            .iter()
            .filter(|log| log.action == ShiftAction::Open)
            .count();
        ActionCounts {
            all: self.logs.len(),
            open,
            close: self.logs.len() - open,
        }
    }
}

pub fn format_duration(log: &ShiftLog) -> String {
    log.duration()
        .map(|d| d.to_string())
        .unwrap_or_else(|| DURATION_UNAVAILABLE.to_string())
}
