use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub phone: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub phone: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(alias = "user_id")]
    pub id: i64,
}
