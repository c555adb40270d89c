use crate::{
    access::Action,
    dto::masters::CreateMasterRequest,
    error::{AppError, AppResult},
    models::{Master, Service},
    phone,
    session::Session,
    state::AppState,
};

/// Services offered by the shop, as last loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    pub fn from_services(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub async fn load(state: &AppState, session: &Session) -> AppResult<Self> {
        let mut catalog = Self::default();
        catalog.refresh(state, session).await?;
        Ok(catalog)
    }

    pub async fn refresh(&mut self, state: &AppState, session: &Session) -> AppResult<()> {
        session.require(Action::ViewCatalog)?;
        self.services = state.backend.list_services().await?;
        tracing::debug!(count = self.services.len(), "services loaded");
        Ok(())
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn service(&self, id: i64) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

/// Masters qualified for a service. An empty list means nobody is assigned.
pub async fn masters_for_service(
    state: &AppState,
    session: &Session,
    service_id: i64,
) -> AppResult<Vec<Master>> {
    session.require(Action::ViewCatalog)?;
    state.backend.service_masters(service_id).await
}

pub async fn list_masters(state: &AppState, session: &Session) -> AppResult<Vec<Master>> {
    session.require(Action::ManageMasters)?;
    state.backend.list_masters().await
}

pub async fn create_master(
    state: &AppState,
    session: &Session,
    name: &str,
    raw_phone: &str,
) -> AppResult<Master> {
    let operator = session.require(Action::ManageMasters)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("master name is required".into()));
    }
    let payload = CreateMasterRequest {
        name: name.to_string(),
        phone: phone::normalize(raw_phone)?,
    };

    let master = state.backend.create_master(operator.id, &payload).await?;
    tracing::info!(operator_id = operator.id, master_id = master.id, "master created");
    Ok(master)
}

pub async fn assign_master(
    state: &AppState,
    session: &Session,
    service_id: i64,
    master_id: i64,
) -> AppResult<()> {
    let operator = session.require(Action::ManageMasters)?;
    state
        .backend
        .assign_master(service_id, master_id, operator.id)
        .await?;
    tracing::info!(
        operator_id = operator.id,
        service_id,
        master_id,
        "master assigned"
    );
    Ok(())
}
