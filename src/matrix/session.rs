//! Persistence of the Matrix login session.
//!
//! The data directory holds two entries:
//! - `session`: JSON file with the SDK session and the last sync token
//! - `sqlite`: the SDK state store
//!
//! Restoring the session avoids creating a new device on every restart, and
//! the sync token lets the bot skip messages it already answered.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, trace};
use matrix_sdk::authentication::matrix::MatrixSession;
use serde::{Deserialize, Serialize};
use tokio::fs;

const SESSION_FILE: &str = "session";
const SQLITE_DIR: &str = "sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    user_session: MatrixSession,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session file and store locations inside the data directory, and the
/// session read at startup if there was one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    stored: Option<StoredSession>,
    sqlite_path: PathBuf,
    session_path: PathBuf,
}

impl SessionStore {
    /// Opens the store in `data_dir`, creating the directory if needed.
    ///
    /// A missing or unreadable session file is not an error: the bot will log
    /// in again and overwrite it.
    pub async fn open(data_dir: &Path) -> Result<SessionStore> {
        fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

        let session_path = data_dir.join(SESSION_FILE);
        let sqlite_path = data_dir.join(SQLITE_DIR);

        let stored = match read_session(&session_path).await {
            Ok(stored) => stored,
            Err(err) => {
                debug!("ignoring unreadable session file: {:?}", err);
                None
            }
        };
        debug!(
            "session store at {}, session found: {}",
            data_dir.display(),
            stored.is_some()
        );

        Ok(SessionStore {
            stored,
            sqlite_path,
            session_path,
        })
    }

    pub fn user_session(&self) -> Option<&MatrixSession> {
        self.stored.as_ref().map(|stored| &stored.user_session)
    }

    pub fn sync_token(&self) -> Option<&str> {
        self.stored
            .as_ref()
            .and_then(|stored| stored.sync_token.as_deref())
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    /// Writes a fresh session, dropping any previous sync token.
    pub async fn save_user_session(&self, user_session: &MatrixSession) -> Result<()> {
        trace!("persist user session");

        let stored = StoredSession {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&stored)?).await?;

        Ok(())
    }

    /// Updates the sync token of the session file.
    pub async fn save_sync_token(&self, sync_token: &str) -> Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut stored = read_session(&self.session_path)
            .await?
            .context("no session to attach the sync token to")?;
        stored.sync_token = Some(sync_token.to_owned());
        fs::write(&self.session_path, serde_json::to_string(&stored)?).await?;

        Ok(())
    }
}

async fn read_session(session_path: &Path) -> Result<Option<StoredSession>> {
    if !fs::try_exists(session_path).await? {
        return Ok(None);
    }

    let data = fs::read_to_string(session_path).await?;
    Ok(Some(serde_json::from_str(&data)?))
}
