use serde::Serialize;

use crate::models::OperationStatus;

/// What the operator fills in; the price falls back to the service's price.
#[derive(Debug, Clone, Default)]
pub struct OperationDraft {
    pub client_name: String,
    pub car: String,
    pub service_id: i64,
    pub price: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CreateOperationRequest {
    pub client_name: String,
    pub car: String,
    pub service_id: i64,
    pub price: i64,
    pub comment: Option<String>,
    pub status: OperationStatus,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct PayOperationRequest {
    pub comment: Option<String>,
}
