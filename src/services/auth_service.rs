use crate::{
    error::{AppError, AppResult},
    models::User,
    phone,
    session::Session,
    state::AppState,
};

/// Asks the backend to send a login code; returns the normalized phone the
/// code was sent to.
pub async fn request_code(state: &AppState, raw_phone: &str) -> AppResult<String> {
    let phone = phone::normalize(raw_phone)?;
    state.backend.request_login_code(&phone).await?;
    tracing::info!(phone = %phone, "login code requested");
    Ok(phone)
}

pub async fn verify_code(
    state: &AppState,
    session: &mut Session,
    raw_phone: &str,
    code: &str,
) -> AppResult<User> {
    let phone = phone::normalize(raw_phone)?;
    let code = phone::validate_code(code)?;

    let mut user = state.backend.verify_code(&phone, code).await?;
    if user.phone.is_none() {
        user.phone = Some(phone);
    }
    let user = session.set_user(user)?.clone();
    tracing::info!(user_id = user.id, role = %user.role, "logged in");
    Ok(user)
}

pub async fn register(state: &AppState, raw_phone: &str, name: &str) -> AppResult<i64> {
    let phone = phone::normalize(raw_phone)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let id = state.backend.register(&phone, name).await?;
    tracing::info!(user_id = id, "user registered");
    Ok(id)
}

pub fn logout(session: &mut Session) -> AppResult<()> {
    if let Some(user) = session.user() {
        tracing::info!(user_id = user.id, "logged out");
    }
    session.clear()
}
