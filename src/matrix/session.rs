//! On-disk persistence of the Matrix session.
//!
//! The session directory contains:
//! - `session`: JSON file with the user session and the last sync token
//! - `sqlite`: SQLite database for the Matrix SDK state, encrypted with the passphrase

use std::path::{Path, PathBuf};

use log::{debug, trace};
use matrix_sdk::authentication::matrix::MatrixSession;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Content of the `session` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedSession {
    /// Authentication of the bot device
    user_session: MatrixSession,
    /// Token to resume the sync from, absent until the first sync
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session store rooted at a directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session read at startup, if the bot already logged in once
    saved: Option<SavedSession>,
    /// `dir/sqlite`
    sqlite_path: PathBuf,
    /// `dir/session`
    session_path: PathBuf,
}

impl SessionStore {
    /// Opens the store in `dir`, creating the directory when missing.
    ///
    /// A missing or unreadable session file is not an error: the bot will log in again.
    pub async fn open(dir: &Path) -> Result<SessionStore, anyhow::Error> {
        fs::create_dir_all(dir).await?;

        let session_path = dir.join("session");
        let saved = match read_session(&session_path).await {
            Ok(saved) => Some(saved),
            Err(e) => {
                debug!("no usable session at {}: {}", session_path.display(), e);
                None
            }
        };

        Ok(SessionStore {
            saved,
            sqlite_path: dir.join("sqlite"),
            session_path,
        })
    }

    /// Path of the SDK state store.
    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    /// User session saved by a previous run.
    pub fn user_session(&self) -> Option<&MatrixSession> {
        self.saved.as_ref().map(|saved| &saved.user_session)
    }

    /// Sync token saved by a previous run.
    pub fn sync_token(&self) -> Option<&str> {
        self.saved.as_ref().and_then(|saved| saved.sync_token.as_deref())
    }

    /// Writes a fresh session file, without sync token.
    pub async fn save_user_session(&self, user_session: &MatrixSession) -> anyhow::Result<()> {
        trace!("saving user session");

        let saved = SavedSession {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&saved)?).await?;

        Ok(())
    }

    /// Updates the sync token of the session file.
    pub async fn save_sync_token(&self, sync_token: &str) -> anyhow::Result<()> {
        trace!("saving sync token {}", sync_token);

        let mut saved = read_session(&self.session_path).await?;
        saved.sync_token = Some(sync_token.to_owned());
        fs::write(&self.session_path, serde_json::to_string(&saved)?).await?;

        Ok(())
    }
}

async fn read_session(path: &Path) -> Result<SavedSession, anyhow::Error> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use matrix_sdk::{SessionMeta, SessionTokens};
    use tempfile::TempDir;

    use super::*;

    fn create_user_session() -> MatrixSession {
        MatrixSession {
            meta: SessionMeta {
                user_id: "@sorteio:example.com".try_into().unwrap(),
                device_id: "DEVICEID".into(),
            },
            tokens: SessionTokens {
                access_token: "access_token".to_string(),
                refresh_token: None,
            },
        }
    }

    #[tokio::test]
    async fn test_open_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("session");

        let store = SessionStore::open(&dir).await.unwrap();

        assert!(dir.is_dir());
        assert!(store.user_session().is_none());
        assert!(store.sync_token().is_none());
        assert_eq!(store.sqlite_path(), dir.join("sqlite"));
    }

    #[tokio::test]
    async fn test_saved_session_is_restored() {
        let temp_dir = TempDir::new().unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("s72594_4483_1934").await.unwrap();

        let reopened = SessionStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.user_session().unwrap().meta.user_id.as_str(),
            "@sorteio:example.com"
        );
        assert_eq!(reopened.sync_token(), Some("s72594_4483_1934"));
    }

    #[tokio::test]
    async fn test_new_login_drops_sync_token() {
        let temp_dir = TempDir::new().unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("old_token").await.unwrap();
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();

        let reopened = SessionStore::open(temp_dir.path()).await.unwrap();
        assert!(reopened.user_session().is_some());
        assert!(reopened.sync_token().is_none());
    }

    #[tokio::test]
    async fn test_corrupted_session_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("session"), "{ not json")
            .await
            .unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        assert!(store.user_session().is_none());
    }

    #[tokio::test]
    async fn test_save_sync_token_without_session() {
        let temp_dir = TempDir::new().unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        assert!(store.save_sync_token("token").await.is_err());
    }
}
