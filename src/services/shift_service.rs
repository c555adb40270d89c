use crate::{
    access::Action,
    error::{AppError, AppResult},
    models::Shift,
    session::Session,
    state::AppState,
};

/// Whether an operator currently has an open shift.
///
/// A gate is built per view and only knows what its last `refresh`, `open`
/// or `close` told it; call `refresh` after anything else may have changed
/// the shift.
#[derive(Debug, Clone)]
pub struct ShiftGate {
    operator_id: i64,
    current: Option<Shift>,
}

impl ShiftGate {
    /// A gate that has not asked the backend yet and so reports closed.
    pub fn new(operator_id: i64) -> Self {
        Self {
            operator_id,
            current: None,
        }
    }

    pub fn for_session(session: &Session) -> AppResult<Self> {
        let user = session.require(Action::ManageShift)?;
        Ok(Self::new(user.id))
    }

    pub async fn load(state: &AppState, session: &Session) -> AppResult<Self> {
        let mut gate = Self::for_session(session)?;
        gate.refresh(state).await?;
        Ok(gate)
    }

    pub fn operator_id(&self) -> i64 {
        self.operator_id
    }

    pub fn current(&self) -> Option<&Shift> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub async fn refresh(&mut self, state: &AppState) -> AppResult<Option<&Shift>> {
        let shift = state.backend.current_shift(self.operator_id).await?;
        tracing::debug!(
            operator_id = self.operator_id,
            open = shift.is_some(),
            "shift status refreshed"
        );
        self.current = shift;
        Ok(self.current.as_ref())
    }

    /// The open shift of `operator_id`, or `ShiftClosed`.
    pub fn ensure_open(&self, operator_id: i64) -> AppResult<&Shift> {
        match &self.current {
            Some(shift) if self.operator_id == operator_id && shift.is_open() => Ok(shift),
            _ => Err(AppError::ShiftClosed),
        }
    }

    pub async fn open(&mut self, state: &AppState) -> AppResult<&Shift> {
        if self.current.is_some() {
            return Err(AppError::ShiftAlreadyOpen);
        }
        let shift = state.backend.open_shift(self.operator_id).await?;
        tracing::info!(
            operator_id = self.operator_id,
            shift_id = shift.id,
            "shift opened"
        );
        Ok(self.current.insert(shift))
    }

    /// Closes the open shift and returns it as the backend recorded it.
    pub async fn close(&mut self, state: &AppState) -> AppResult<Shift> {
        let shift_id = match &self.current {
            Some(shift) => shift.id,
            None => return Err(AppError::NoOpenShift),
        };
        let closed = state.backend.close_shift(shift_id, self.operator_id).await?;
        self.current = None;
        tracing::info!(operator_id = self.operator_id, shift_id, "shift closed");
        Ok(closed)
    }
}
