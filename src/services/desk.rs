use crate::{
    access::{Action, is_allowed},
    error::AppResult,
    services::{
        catalog_service::Catalog, operation_service::OperationStore, shift_service::ShiftGate,
    },
    session::Session,
    state::AppState,
};

/// Everything the operator screen shows at once.
#[derive(Debug, Clone)]
pub struct Desk {
    pub operations: OperationStore,
    pub catalog: Catalog,
    /// Present only for roles that run shifts.
    pub shift: Option<ShiftGate>,
}

/// Outcome of each part of a `Desk::refresh`; one failing part does not
/// prevent the others from updating.
#[derive(Debug)]
pub struct DeskRefresh {
    pub operations: AppResult<()>,
    pub catalog: AppResult<()>,
    pub shift: Option<AppResult<()>>,
}

impl DeskRefresh {
    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &crate::error::AppError)> {
        [
            ("operations", self.operations.as_ref().err()),
            ("services", self.catalog.as_ref().err()),
            (
                "shift",
                self.shift.as_ref().and_then(|r| r.as_ref().err()),
            ),
        ]
        .into_iter()
        .filter_map(|(part, err)| err.map(|err| (part, err)))
    }
}

impl Desk {
    pub fn new(session: &Session) -> AppResult<Self> {
        let user = session.require(Action::ViewOperations)?;
        let shift = is_allowed(user.role, Action::ManageShift).then(|| ShiftGate::new(user.id));
        Ok(Self {
            operations: OperationStore::default(),
            catalog: Catalog::default(),
            shift,
        })
    }

    /// Loads operations, services and shift status concurrently.
    pub async fn refresh(&mut self, state: &AppState, session: &Session) -> DeskRefresh {
        let Desk {
            operations,
            catalog,
            shift,
        } = self;

        let shift_refresh = async {
            match shift.as_mut() {
                Some(gate) => Some(gate.refresh(state).await.map(|_| ())),
                None => None,
            }
        };
        let (operations, catalog, shift) = tokio::join!(
            operations.refresh(state, session),
            catalog.refresh(state, session),
            shift_refresh,
        );

        let outcome = DeskRefresh {
            operations,
            catalog,
            shift,
        };
        for (part, err) in outcome.errors() {
            tracing::warn!(part, error = %err, "desk refresh failed");
        }
        outcome
    }
}
