use async_trait::async_trait;

use crate::{
    dto::{
        masters::CreateMasterRequest,
        operations::{CreateOperationRequest, PayOperationRequest},
    },
    error::AppResult,
    models::{Master, Operation, Service, Shift, ShiftLog, User},
};

pub mod http;

pub use http::HttpBackend;

/// The remote shop API. Every method is one request; none retries.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn request_login_code(&self, phone: &str) -> AppResult<()>;
    async fn verify_code(&self, phone: &str, code: &str) -> AppResult<User>;
    async fn register(&self, phone: &str, name: &str) -> AppResult<i64>;

    async fn list_operations(&self, operator_id: Option<i64>) -> AppResult<Vec<Operation>>;
    async fn get_operation(&self, id: i64) -> AppResult<Operation>;
    async fn create_operation(
        &self,
        operator_id: i64,
        payload: &CreateOperationRequest,
    ) -> AppResult<Operation>;
    async fn pay_operation(
        &self,
        id: i64,
        operator_id: i64,
        payload: &PayOperationRequest,
    ) -> AppResult<Operation>;
    async fn cancel_operation(&self, id: i64, operator_id: i64, reason: &str)
    -> AppResult<Operation>;
    async fn delete_operation(&self, id: i64) -> AppResult<()>;

    async fn open_shift(&self, operator_id: i64) -> AppResult<Shift>;
    async fn close_shift(&self, shift_id: i64, operator_id: i64) -> AppResult<Shift>;
    /// `None` when the operator has no open shift.
    async fn current_shift(&self, operator_id: i64) -> AppResult<Option<Shift>>;
    async fn shift_logs(&self, operator_id: Option<i64>) -> AppResult<Vec<ShiftLog>>;

    async fn list_services(&self) -> AppResult<Vec<Service>>;
    async fn service_masters(&self, service_id: i64) -> AppResult<Vec<Master>>;
    async fn list_masters(&self) -> AppResult<Vec<Master>>;
    async fn create_master(
        &self,
        operator_id: i64,
        payload: &CreateMasterRequest,
    ) -> AppResult<Master>;
    async fn assign_master(&self, service_id: i64, master_id: i64, operator_id: i64)
    -> AppResult<()>;
}
