use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    access::{Action, ensure_allowed},
    error::{AppError, AppResult},
    models::User,
};

/// JSON file holding the logged-in user between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted user. A file that does not parse is removed and
    /// treated as logged out.
    pub fn load(&self) -> AppResult<Option<User>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding unreadable session"
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, user: &User) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(user)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Identity of whoever is using the desk. Loaded once at startup, set on a
/// successful verify, cleared on logout.
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    user: Option<User>,
}

impl Session {
    pub fn restore(store: SessionStore) -> AppResult<Self> {
        let user = store.load()?;
        if let Some(user) = &user {
            tracing::debug!(user_id = user.id, role = %user.role, "session restored");
        }
        Ok(Self { store, user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> AppResult<&User> {
        self.user.as_ref().ok_or(AppError::NotLoggedIn)
    }

    /// The current user, provided their role may perform `action`.
    pub fn require(&self, action: Action) -> AppResult<&User> {
        let user = self.require_user()?;
        ensure_allowed(user, action)?;
        Ok(user)
    }

    pub fn set_user(&mut self, user: User) -> AppResult<&User> {
        self.store.save(&user)?;
        Ok(self.user.insert(user))
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.user = None;
        self.store.clear()
    }
}
