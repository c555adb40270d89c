#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use autoservice_desk::{
    backend::Backend,
    config::AppConfig,
    dto::{
        masters::CreateMasterRequest,
        operations::{CreateOperationRequest, PayOperationRequest},
    },
    error::{AppError, AppResult},
    models::{
        Master, Operation, OperationStatus, Role, Service, Shift, ShiftAction, ShiftLog, User,
    },
    session::{Session, SessionStore},
    state::AppState,
};
use chrono::Utc;
use tempfile::TempDir;

pub const VALID_CODE: &str = "1234";

/// In-memory stand-in for the shop backend. It enforces the same rules the
/// real one does and records every call it receives.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    calls: Vec<&'static str>,
    users: HashMap<String, User>,
    operations: Vec<Operation>,
    shifts: Vec<Shift>,
    logs: Vec<ShiftLog>,
    services: Vec<Service>,
    masters: Vec<Master>,
    assignments: Vec<(i64, i64)>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn open_shift_of(&self, operator_id: i64) -> Option<&Shift> {
        self.shifts
            .iter()
            .find(|s| s.operator_id == operator_id && s.is_open())
    }
}

fn rejected(status: u16, detail: &str) -> AppError {
    AppError::Rejected {
        status,
        detail: detail.to_string(),
    }
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().expect("backend lock");
        inner.calls.push(call);
        inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().expect("backend lock").calls.clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|c| *c == call)
    }

    pub fn add_user(&self, phone: &str, user: User) {
        self.inner
            .lock()
            .expect("backend lock")
            .users
            .insert(phone.to_string(), user);
    }

    pub fn add_service(&self, id: i64, name: &str, price: i64) {
        self.inner.lock().expect("backend lock").services.push(Service {
            id,
            name: name.to_string(),
            price,
        });
    }

    pub fn set_service_price(&self, id: i64, price: i64) {
        let mut inner = self.inner.lock().expect("backend lock");
        if let Some(service) = inner.services.iter_mut().find(|s| s.id == id) {
            service.price = price;
        }
    }

    pub fn add_master(&self, name: &str) -> i64 {
        let mut inner = self.inner.lock().expect("backend lock");
        let id = inner.next_id();
        inner.masters.push(Master {
            id,
            name: name.to_string(),
            phone: None,
        });
        id
    }

    /// Opens a shift behind the client's back, as another device would.
    pub fn open_shift_elsewhere(&self, operator_id: i64) -> i64 {
        let mut inner = self.inner.lock().expect("backend lock");
        let id = inner.next_id();
        inner.shifts.push(Shift {
            id,
            operator_id,
            start_time: Utc::now(),
            end_time: None,
        });
        id
    }

    pub fn operation(&self, id: i64) -> Option<Operation> {
        self.inner
            .lock()
            .expect("backend lock")
            .operations
            .iter()
            .find(|op| op.id == id)
            .cloned()
    }

    pub fn insert_operation(&self, operator_id: i64, status: OperationStatus) -> i64 {
        let mut inner = self.inner.lock().expect("backend lock");
        let id = inner.next_id();
        inner.operations.push(Operation {
            id,
            client_name: format!("Client {id}"),
            car: "Lada Vesta".into(),
            service_id: 1,
            price: 1500,
            status,
            comment: None,
            cancel_reason: None,
            operator_id,
            master_id: None,
            date: Utc::now(),
            service: None,
            master: None,
            operator: None,
        });
        id
    }

    pub fn operation_ids(&self) -> Vec<i64> {
        self.inner
            .lock()
            .expect("backend lock")
            .operations
            .iter()
            .map(|op| op.id)
            .collect()
    }

    pub fn assignments(&self) -> Vec<(i64, i64)> {
        self.inner.lock().expect("backend lock").assignments.clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn request_login_code(&self, phone: &str) -> AppResult<()> {
        let inner = self.record("request_login_code");
        if !inner.users.contains_key(phone) {
            return Err(rejected(404, "Пользователь не найден"));
        }
        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> AppResult<User> {
        let inner = self.record("verify_code");
        if code != VALID_CODE {
            return Err(rejected(400, "Неверный код"));
        }
        inner
            .users
            .get(phone)
            .cloned()
            .ok_or_else(|| rejected(404, "Пользователь не найден"))
    }

    async fn register(&self, phone: &str, name: &str) -> AppResult<i64> {
        let mut inner = self.record("register");
        if inner.users.contains_key(phone) {
            return Err(rejected(400, "Пользователь уже существует"));
        }
        let id = inner.next_id();
        inner.users.insert(
            phone.to_string(),
            User {
                id,
                name: name.to_string(),
                phone: Some(phone.to_string()),
                role: Role::Client,
            },
        );
        Ok(id)
    }

    async fn list_operations(&self, operator_id: Option<i64>) -> AppResult<Vec<Operation>> {
        let inner = self.record("list_operations");
        Ok(inner
            .operations
            .iter()
            .filter(|op| operator_id.is_none_or(|id| op.operator_id == id))
            .cloned()
            .collect())
    }

    async fn get_operation(&self, id: i64) -> AppResult<Operation> {
        let inner = self.record("get_operation");
        inner
            .operations
            .iter()
            .find(|op| op.id == id)
            .cloned()
            .ok_or_else(|| rejected(404, "Запись не найдена"))
    }

    async fn create_operation(
        &self,
        operator_id: i64,
        payload: &CreateOperationRequest,
    ) -> AppResult<Operation> {
        let mut inner = self.record("create_operation");
        if inner.open_shift_of(operator_id).is_none() {
            return Err(rejected(400, "Сначала откройте смену"));
        }
        let id = inner.next_id();
        let operation = Operation {
            id,
            client_name: payload.client_name.clone(),
            car: payload.car.clone(),
            service_id: payload.service_id,
            price: payload.price,
            status: payload.status,
            comment: payload.comment.clone(),
            cancel_reason: None,
            operator_id,
            master_id: None,
            date: Utc::now(),
            service: None,
            master: None,
            operator: None,
        };
        inner.operations.push(operation.clone());
        Ok(operation)
    }

    async fn pay_operation(
        &self,
        id: i64,
        _operator_id: i64,
        payload: &PayOperationRequest,
    ) -> AppResult<Operation> {
        let mut inner = self.record("pay_operation");
        let operation = inner
            .operations
            .iter_mut()
            .find(|op| op.id == id)
            .ok_or_else(|| rejected(404, "Запись не найдена"))?;
        if operation.status != OperationStatus::Pending {
            return Err(rejected(400, "Операция уже обработана"));
        }
        operation.status = OperationStatus::Paid;
        operation.comment = payload.comment.clone();
        Ok(operation.clone())
    }

    async fn cancel_operation(
        &self,
        id: i64,
        _operator_id: i64,
        reason: &str,
    ) -> AppResult<Operation> {
        let mut inner = self.record("cancel_operation");
        let operation = inner
            .operations
            .iter_mut()
            .find(|op| op.id == id)
            .ok_or_else(|| rejected(404, "Запись не найдена"))?;
        if operation.status != OperationStatus::Pending {
            return Err(rejected(400, "Операция уже обработана"));
        }
        operation.status = OperationStatus::Cancelled;
        operation.cancel_reason = Some(reason.to_string());
        Ok(operation.clone())
    }

    async fn delete_operation(&self, id: i64) -> AppResult<()> {
        let mut inner = self.record("delete_operation");
        let before = inner.operations.len();
        inner.operations.retain(|op| op.id != id);
        if inner.operations.len() == before {
            return Err(rejected(404, "Запись не найдена"));
        }
        Ok(())
    }

    async fn open_shift(&self, operator_id: i64) -> AppResult<Shift> {
        let mut inner = self.record("open_shift");
        if inner.open_shift_of(operator_id).is_some() {
            return Err(rejected(400, "Смена уже открыта"));
        }
        let id = inner.next_id();
        let shift = Shift {
            id,
            operator_id,
            start_time: Utc::now(),
            end_time: None,
        };
        inner.shifts.push(shift.clone());
        let log_id = inner.next_id();
        inner.logs.push(ShiftLog {
            id: log_id,
            operator_id,
            operator_name: None,
            action: ShiftAction::Open,
            timestamp: shift.start_time,
            shift_start: Some(shift.start_time),
            shift_end: None,
        });
        Ok(shift)
    }

    async fn close_shift(&self, shift_id: i64, operator_id: i64) -> AppResult<Shift> {
        let mut inner = self.record("close_shift");
        let shift = inner
            .shifts
            .iter_mut()
            .find(|s| s.id == shift_id && s.operator_id == operator_id && s.is_open())
            .ok_or_else(|| rejected(404, "Открытая смена не найдена"))?;
        // Every shift in this backend lasts exactly 95 minutes.
        shift.end_time = Some(shift.start_time + chrono::Duration::minutes(95));
        let closed = shift.clone();
        let log_id = inner.next_id();
        inner.logs.push(ShiftLog {
            id: log_id,
            operator_id,
            operator_name: None,
            action: ShiftAction::Close,
            timestamp: closed.end_time.unwrap_or(closed.start_time),
            shift_start: Some(closed.start_time),
            shift_end: closed.end_time,
        });
        Ok(closed)
    }

    async fn current_shift(&self, operator_id: i64) -> AppResult<Option<Shift>> {
        let inner = self.record("current_shift");
        Ok(inner.open_shift_of(operator_id).cloned())
    }

    async fn shift_logs(&self, operator_id: Option<i64>) -> AppResult<Vec<ShiftLog>> {
        let inner = self.record("shift_logs");
        Ok(inner
            .logs
            .iter()
            .filter(|log| operator_id.is_none_or(|id| log.operator_id == id))
            .cloned()
            .collect())
    }

    async fn list_services(&self) -> AppResult<Vec<Service>> {
        let inner = self.record("list_services");
        Ok(inner.services.clone())
    }

    async fn service_masters(&self, service_id: i64) -> AppResult<Vec<Master>> {
        let inner = self.record("service_masters");
        Ok(inner
            .masters
            .iter()
            .filter(|m| inner.assignments.contains(&(service_id, m.id)))
            .cloned()
            .collect())
    }

    async fn list_masters(&self) -> AppResult<Vec<Master>> {
        let inner = self.record("list_masters");
        Ok(inner.masters.clone())
    }

    async fn create_master(
        &self,
        _operator_id: i64,
        payload: &CreateMasterRequest,
    ) -> AppResult<Master> {
        let mut inner = self.record("create_master");
        if inner
            .masters
            .iter()
            .any(|m| m.phone.as_deref() == Some(payload.phone.as_str()))
        {
            return Err(rejected(400, "Мастер с таким телефоном уже существует"));
        }
        let id = inner.next_id();
        let master = Master {
            id,
            name: payload.name.clone(),
            phone: Some(payload.phone.clone()),
        };
        inner.masters.push(master.clone());
        Ok(master)
    }

    async fn assign_master(
        &self,
        service_id: i64,
        master_id: i64,
        _operator_id: i64,
    ) -> AppResult<()> {
        let mut inner = self.record("assign_master");
        if !inner.masters.iter().any(|m| m.id == master_id) {
            return Err(rejected(404, "Мастер не найден"));
        }
        inner.assignments.push((service_id, master_id));
        Ok(())
    }
}

pub fn operator() -> User {
    User {
        id: 7,
        name: "Ирина".into(),
        phone: Some("+79991112233".into()),
        role: Role::Operator,
    }
}

pub fn master() -> User {
    User {
        id: 8,
        name: "Пётр".into(),
        phone: Some("+79990000008".into()),
        role: Role::Master,
    }
}

pub fn client() -> User {
    User {
        id: 9,
        name: "Алексей".into(),
        phone: Some("+79990000009".into()),
        role: Role::Client,
    }
}

pub fn state(backend: &Arc<MemoryBackend>) -> AppState {
    AppState::with_backend(backend.clone())
}

/// A fresh session file in its own temp dir, optionally already logged in.
pub fn session(user: Option<User>) -> anyhow::Result<(TempDir, Session)> {
    let dir = tempfile::tempdir()?;
    let mut session = Session::restore(SessionStore::new(dir.path().join("session.json")))?;
    if let Some(user) = user {
        session.set_user(user)?;
    }
    Ok((dir, session))
}

pub fn http_config(base_url: &str, timeout: Duration) -> AppConfig {
    AppConfig {
        backend_url: base_url.to_string(),
        request_timeout: timeout,
        session_file: std::env::temp_dir().join("autoservice-desk-unused-session.json"),
    }
}

/// Serves `router` on an ephemeral local port and returns its base url.
pub async fn serve(router: axum::Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}
