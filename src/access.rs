use std::fmt;

use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewOperations,
    CreateOperation,
    PayOperation,
    CancelOperation,
    DeleteOperation,
    ManageShift,
    ViewShiftLogs,
    ViewCatalog,
    ManageMasters,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewOperations => "view operations",
            Action::CreateOperation => "create operations",
            Action::PayOperation => "pay operations",
            Action::CancelOperation => "cancel operations",
            Action::DeleteOperation => "delete operations",
            Action::ManageShift => "manage shifts",
            Action::ViewShiftLogs => "view shift logs",
            Action::ViewCatalog => "view the catalog",
            Action::ManageMasters => "manage masters",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    use Action::*;
    match role {
        Role::Operator => true,
        Role::Master => matches!(
            action,
            ViewOperations | DeleteOperation | ViewShiftLogs | ViewCatalog
        ),
        Role::Client => matches!(action, ViewOperations | ViewCatalog),
    }
}

pub fn ensure_allowed(user: &User, action: Action) -> AppResult<()> {
    if !is_allowed(user.role, action) {
        return Err(AppError::Forbidden {
            role: user.role,
            action,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_operators_touch_shifts_and_create() {
        for action in [Action::CreateOperation, Action::ManageShift, Action::ManageMasters] {
            assert!(is_allowed(Role::Operator, action));
            assert!(!is_allowed(Role::Master, action));
            assert!(!is_allowed(Role::Client, action));
        }
    }

    #[test]
    fn clients_only_read() {
        assert!(is_allowed(Role::Client, Action::ViewOperations));
        assert!(is_allowed(Role::Client, Action::ViewCatalog));
        assert!(!is_allowed(Role::Client, Action::DeleteOperation));
        assert!(!is_allowed(Role::Client, Action::ViewShiftLogs));
    }

    #[test]
    fn forbidden_names_role_and_action() {
        let user = User {
            id: 2,
            name: "Пётр".into(),
            phone: None,
            role: Role::Master,
        };
        let err = ensure_allowed(&user, Action::PayOperation).unwrap_err();
        assert_eq!(err.to_string(), "role master is not allowed to pay operations");
    }
}
