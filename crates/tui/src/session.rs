use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Credentials of the logged-in user, persisted across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Account preselected as source on the payment screens.
    #[serde(default)]
    pub account_number: Option<String>,
}

/// JSON file holding at most one [`Session`].
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

    /// A missing file is not an error: there is simply no session.
    pub fn load(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// The session owned by the running app.
///
/// Every mutation goes through here so the file on disk and the in-memory
/// copy never disagree. `generation` changes whenever the user changes, so
/// replies to requests issued for an earlier user can be told apart.
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    current: Option<Session>,
    generation: u64,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            current: None,
            generation: 0,
        }
    }

    /// Restores the session saved by a previous run. An unreadable file is
    /// dropped and treated as logged out.
    pub fn load_session(&mut self) -> Option<&Session> {
        self.current = match self.store.load() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(path = %self.store.path().display(), "discarding session file: {err}");
                let _ = self.store.clear();
                None
            }
        };
        self.generation += 1;
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self, session: Session) -> Result<()> {
        let saved = self.store.save(&session);
        self.current = Some(session);
        self.generation += 1;
        saved
    }

    /// Updates the default account, if a session exists.
    pub fn set_account_number(&mut self, account_number: &str) -> Result<()> {
        let Some(session) = self.current.as_mut() else {
            return Ok(());
        };
        session.account_number = Some(account_number.to_string());
        self.store.save(session)
    }

    pub fn clear_session(&mut self) -> Result<()> {
        self.current = None;
        self.generation += 1;
        self.store.clear()
    }
}
