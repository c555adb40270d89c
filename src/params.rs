use std::str::FromStr;

use crate::{
    error::AppError,
    models::{OperationStatus, ShiftAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OperationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OperationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Only(OperationStatus::Pending)),
            "paid" => Ok(StatusFilter::Only(OperationStatus::Paid)),
            "cancelled" | "canceled" => Ok(StatusFilter::Only(OperationStatus::Cancelled)),
            other => Err(AppError::Validation(format!(
                "unknown status filter `{other}` (all, pending, paid, cancelled)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionFilter {
    #[default]
    All,
    Only(ShiftAction),
}

impl ActionFilter {
    pub fn matches(&self, action: ShiftAction) -> bool {
        match self {
            ActionFilter::All => true,
            ActionFilter::Only(wanted) => *wanted == action,
        }
    }
}

impl FromStr for ActionFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ActionFilter::All),
            "open" => Ok(ActionFilter::Only(ShiftAction::Open)),
            "close" => Ok(ActionFilter::Only(ShiftAction::Close)),
            other => Err(AppError::Validation(format!(
                "unknown action filter `{other}` (all, open, close)"
            ))),
        }
    }
}
