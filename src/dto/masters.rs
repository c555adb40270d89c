use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct CreateMasterRequest {
    pub name: String,
    pub phone: String,
}
