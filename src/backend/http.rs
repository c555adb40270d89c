use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::Backend;
use crate::{
    config::AppConfig,
    dto::{
        auth::{LoginRequest, RegisterRequest, RegisterResponse, VerifyRequest},
        masters::CreateMasterRequest,
        operations::{CreateOperationRequest, PayOperationRequest},
    },
    error::{AppError, AppResult},
    models::{Master, Operation, Service, Shift, ShiftLog, User},
    response::error_detail,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// `Backend` over HTTP. The client-wide timeout bounds every call.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let request = builder
            .header(REQUEST_ID_HEADER, &request_id)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("build request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "request started"
        );
        let started = Instant::now();
        let response = self.client.execute(request).await.map_err(|err| {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, error = %err, "request failed");
            transport_error(err)
        })?;
        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %response.status(),
            ms = %started.elapsed().as_millis(),
            "request finished"
        );
        Ok(response)
    }

    async fn send(&self, builder: RequestBuilder, fallback: &str) -> AppResult<Response> {
        let response = self.execute(builder).await?;
        ensure_success(response, fallback).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> AppResult<T> {
        let response = self.send(builder, fallback).await?;
        decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Unavailable("timed out".into())
    } else if err.is_connect() {
        AppError::Unavailable("connection failed".into())
    } else {
        AppError::Unavailable(err.to_string())
    }
}

async fn ensure_success(response: Response, fallback: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.map_err(transport_error)?;
    let detail = error_detail(&body).unwrap_or_else(|| fallback.to_string());
    Err(AppError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|e| AppError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn request_login_code(&self, phone: &str) -> AppResult<()> {
        let body = LoginRequest {
            phone: phone.to_string(),
        };
        self.send(
            self.client.post(self.url("/auth/login")).json(&body),
            "failed to send the login code",
        )
        .await?;
        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> AppResult<User> {
        let body = VerifyRequest {
            phone: phone.to_string(),
            code: code.to_string(),
        };
        self.send_json(
            self.client.post(self.url("/auth/verify")).json(&body),
            "invalid verification code",
        )
        .await
    }

    async fn register(&self, phone: &str, name: &str) -> AppResult<i64> {
        let body = RegisterRequest {
            phone: phone.to_string(),
            name: name.to_string(),
        };
        let created: RegisterResponse = self
            .send_json(
                self.client.post(self.url("/users/register")).json(&body),
                "registration failed",
            )
            .await?;
        Ok(created.id)
    }

    async fn list_operations(&self, operator_id: Option<i64>) -> AppResult<Vec<Operation>> {
        let mut builder = self.client.get(self.url("/operations/"));
        if let Some(operator_id) = operator_id {
            builder = builder.query(&[("operator_id", operator_id)]);
        }
        self.send_json(builder, "failed to load operations").await
    }

    async fn get_operation(&self, id: i64) -> AppResult<Operation> {
        self.send_json(
            self.client.get(self.url(&format!("/operations/{id}"))),
            "operation not found",
        )
        .await
    }

    async fn create_operation(
        &self,
        operator_id: i64,
        payload: &CreateOperationRequest,
    ) -> AppResult<Operation> {
        self.send_json(
            self.client
                .post(self.url("/operations/"))
                .query(&[("operator_id", operator_id)])
                .json(payload),
            "failed to create the operation",
        )
        .await
    }

    async fn pay_operation(
        &self,
        id: i64,
        operator_id: i64,
        payload: &PayOperationRequest,
    ) -> AppResult<Operation> {
        self.send_json(
            self.client
                .patch(self.url(&format!("/operations/{id}/pay")))
                .query(&[("operator_id", operator_id)])
                .json(payload),
            "payment failed",
        )
        .await
    }

    async fn cancel_operation(
        &self,
        id: i64,
        operator_id: i64,
        reason: &str,
    ) -> AppResult<Operation> {
        let operator_id = operator_id.to_string();
        self.send_json(
            self.client
                .patch(self.url(&format!("/operations/{id}/cancel")))
                .query(&[("operator_id", operator_id.as_str()), ("reason", reason)]),
            "cancellation failed",
        )
        .await
    }

    async fn delete_operation(&self, id: i64) -> AppResult<()> {
        self.send(
            self.client.delete(self.url(&format!("/operations/{id}"))),
            "failed to delete the operation",
        )
        .await?;
        Ok(())
    }

    async fn open_shift(&self, operator_id: i64) -> AppResult<Shift> {
        self.send_json(
            self.client
                .post(self.url("/shifts/open"))
                .query(&[("operator_id", operator_id)]),
            "failed to open the shift",
        )
        .await
    }

    async fn close_shift(&self, shift_id: i64, operator_id: i64) -> AppResult<Shift> {
        self.send_json(
            self.client
                .post(self.url("/shifts/close"))
                .query(&[("shift_id", shift_id), ("operator_id", operator_id)]),
            "failed to close the shift",
        )
        .await
    }

    async fn current_shift(&self, operator_id: i64) -> AppResult<Option<Shift>> {
        let response = self
            .execute(
                self.client
                    .get(self.url("/shifts/current"))
                    .query(&[("operator_id", operator_id)]),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "failed to check the shift").await?;
        let body = response.bytes().await.map_err(transport_error)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let shift: Option<Shift> =
            serde_json::from_slice(&body).map_err(|e| AppError::Decode(e.to_string()))?;
        Ok(shift.filter(Shift::is_open))
    }

    async fn shift_logs(&self, operator_id: Option<i64>) -> AppResult<Vec<ShiftLog>> {
        let mut builder = self.client.get(self.url("/shifts/logs"));
        if let Some(operator_id) = operator_id {
            builder = builder.query(&[("operator_id", operator_id)]);
        }
        self.send_json(builder, "failed to load shift logs").await
    }

    async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.send_json(
            self.client.get(self.url("/services/")),
            "failed to load services",
        )
        .await
    }

    /// A 404 means nobody is assigned to the service.
    async fn service_masters(&self, service_id: i64) -> AppResult<Vec<Master>> {
        let response = self
            .execute(
                self.client
                    .get(self.url(&format!("/services/{service_id}/masters"))),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response = ensure_success(response, "failed to load masters").await?;
        decode(response).await
    }

    async fn list_masters(&self) -> AppResult<Vec<Master>> {
        self.send_json(
            self.client.get(self.url("/users/masters")),
            "failed to load masters",
        )
        .await
    }

    async fn create_master(
        &self,
        operator_id: i64,
        payload: &CreateMasterRequest,
    ) -> AppResult<Master> {
        self.send_json(
            self.client
                .post(self.url("/users/create_master"))
                .query(&[("operator_id", operator_id)])
                .json(payload),
            "failed to create the master",
        )
        .await
    }

    async fn assign_master(
        &self,
        service_id: i64,
        master_id: i64,
        operator_id: i64,
    ) -> AppResult<()> {
        self.send(
            self.client
                .post(self.url(&format!("/services/{service_id}/assign-master")))
                .query(&[
                    ("service_id", service_id),
                    ("master_id", master_id),
                    ("operator_id", operator_id),
                ]),
            "failed to assign the master",
        )
        .await?;
        Ok(())
    }
}
