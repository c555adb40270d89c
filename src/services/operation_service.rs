use crate::{
    access::Action,
    dto::operations::{CreateOperationRequest, OperationDraft, PayOperationRequest},
    error::{AppError, AppResult},
    models::{Operation, OperationEvent, OperationStatus, Role},
    params::StatusFilter,
    services::{catalog_service::Catalog, shift_service::ShiftGate},
    session::Session,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub paid: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(OperationStatus::Pending) => self.pending,
            StatusFilter::Only(OperationStatus::Paid) => self.paid,
            StatusFilter::Only(OperationStatus::Cancelled) => self.cancelled,
        }
    }
}

/// Operations visible to the current user.
#[derive(Debug, Clone, Default)]
pub struct OperationStore {
    records: Vec<Operation>,
}

impl OperationStore {
    pub fn from_records(records: Vec<Operation>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Operation] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&Operation> {
        self.records.iter().find(|op| op.id == id)
    }

    /// Records matching `filter`, in stored order. The store is untouched.
    pub fn filter(&self, filter: StatusFilter) -> Vec<&Operation> {
        self.records
            .iter()
            .filter(|op| filter.matches(op.status))
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        self.records
            .iter()
            .fold(StatusCounts::default(), |mut counts, op| {
                counts.all += 1;
                match op.status {
                    OperationStatus::Pending => counts.pending += 1,
                    OperationStatus::Paid => counts.paid += 1,
                    OperationStatus::Cancelled => counts.cancelled += 1,
                }
                counts
            })
    }

    fn upsert(&mut self, operation: Operation) {
        match self.records.iter_mut().find(|op| op.id == operation.id) {
            Some(existing) => *existing = operation,
            None => self.records.push(operation),
        }
    }

    /// Reloads from the backend. Operators see their own operations; other
    /// roles get the unscoped list.
    pub async fn refresh(&mut self, state: &AppState, session: &Session) -> AppResult<()> {
        let user = session.require(Action::ViewOperations)?;
        let operator_id = (user.role == Role::Operator).then_some(user.id);
        self.records = state.backend.list_operations(operator_id).await?;
        tracing::debug!(count = self.records.len(), "operations loaded");
        Ok(())
    }

    pub async fn create(
        &mut self,
        state: &AppState,
        session: &Session,
        gate: &ShiftGate,
        catalog: &Catalog,
        draft: OperationDraft,
    ) -> AppResult<Operation> {
        let operator = session.require(Action::CreateOperation)?;
        let client_name = draft.client_name.trim();
        let car = draft.car.trim();
        if client_name.is_empty() || car.is_empty() {
            return Err(AppError::Validation("client name and car are required".into()));
        }
        gate.ensure_open(operator.id)?;

        let service = catalog
            .service(draft.service_id)
            .ok_or_else(|| AppError::NotFound(format!("service {}", draft.service_id)))?;
        let price = draft.price.unwrap_or(service.price);
        if price <= 0 {
            return Err(AppError::Validation("price must be positive".into()));
        }

        let payload = CreateOperationRequest {
            client_name: client_name.to_string(),
            car: car.to_string(),
            service_id: service.id,
            price,
            comment: draft.comment.filter(|c| !c.trim().is_empty()),
            status: OperationStatus::Pending,
        };
        let created = state.backend.create_operation(operator.id, &payload).await?;
        tracing::info!(
            operator_id = operator.id,
            operation_id = created.id,
            price = created.price,
            "operation created"
        );
        self.upsert(created.clone());
        Ok(created)
    }

    pub async fn pay(
        &mut self,
        state: &AppState,
        session: &Session,
        id: i64,
        comment: Option<String>,
    ) -> AppResult<Operation> {
        let operator = session.require(Action::PayOperation)?;
        let current = self.lookup(state, id).await?;
        current.status.apply(id, OperationEvent::Pay)?;

        let payload = PayOperationRequest {
            comment: comment.filter(|c| !c.trim().is_empty()),
        };
        let paid = state
            .backend
            .pay_operation(id, operator.id, &payload)
            .await?;
        tracing::info!(operator_id = operator.id, operation_id = id, "operation paid");
        self.upsert(paid.clone());
        Ok(paid)
    }

    pub async fn cancel(
        &mut self,
        state: &AppState,
        session: &Session,
        id: i64,
        reason: &str,
    ) -> AppResult<Operation> {
        let operator = session.require(Action::CancelOperation)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("a cancellation reason is required".into()));
        }
        let current = self.lookup(state, id).await?;
        current.status.apply(id, OperationEvent::Cancel)?;

        let cancelled = state
            .backend
            .cancel_operation(id, operator.id, reason)
            .await?;
        tracing::info!(operator_id = operator.id, operation_id = id, "operation cancelled");
        self.upsert(cancelled.clone());
        Ok(cancelled)
    }

    pub async fn delete(&mut self, state: &AppState, session: &Session, id: i64) -> AppResult<()> {
        let user = session.require(Action::DeleteOperation)?;
        state.backend.delete_operation(id).await?;
        self.records.retain(|op| op.id != id);
        tracing::info!(user_id = user.id, operation_id = id, "operation deleted");
        Ok(())
    }

    /// The stored record, or the backend's copy when this store never saw it.
    async fn lookup(&mut self, state: &AppState, id: i64) -> AppResult<Operation> {
        if let Some(op) = self.get(id) {
            return Ok(op.clone());
        }
        let fetched = state.backend.get_operation(id).await?;
        self.upsert(fetched.clone());
        Ok(fetched)
    }
}
