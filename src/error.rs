use thiserror::Error;

use crate::{
    access::Action,
    models::{OperationEvent, OperationStatus, Role},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("server unavailable or request timed out ({0})")]
    Unavailable(String),

    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("not logged in")]
    NotLoggedIn,

    #[error("role {role} is not allowed to {action}")]
    Forbidden { role: Role, action: Action },

    #[error("open a shift first")]
    ShiftClosed,

    #[error("a shift is already open")]
    ShiftAlreadyOpen,

    #[error("there is no open shift to close")]
    NoOpenShift,

    #[error("operation {id} is already {from}, cannot {event} it")]
    InvalidTransition {
        id: i64,
        from: OperationStatus,
        event: OperationEvent,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("unexpected backend response: {0}")]
    Decode(String),

    #[error("session storage error")]
    Session(#[from] std::io::Error),

    #[error("Internal Error")]
    Internal(#[from] anyhow::Error),
}

/// How a failure reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Backend unreachable or timed out.
    Network,
    /// Backend answered with a non-success status.
    Rejected,
    /// Caught locally before any request was sent.
    Precondition,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unavailable(_) => ErrorKind::Network,
            AppError::Rejected { .. } => ErrorKind::Rejected,
            AppError::NotLoggedIn
            | AppError::Forbidden { .. }
            | AppError::ShiftClosed
            | AppError::ShiftAlreadyOpen
            | AppError::NoOpenShift
            | AppError::InvalidTransition { .. }
            | AppError::NotFound(_)
            | AppError::Validation(_) => ErrorKind::Precondition,
            AppError::Decode(_) | AppError::Session(_) | AppError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
