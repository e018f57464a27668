use std::path::PathBuf;

use crate::{Res, TidlError, config, types::Session};

pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        SessionManager { session }
    }

    pub async fn load() -> Res<Self> {
        let path = Self::session_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TidlError::Session("no stored session, run tidl login".to_string())
            } else {
                TidlError::filesystem(&path, e)
            }
        })?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Self { session })
    }

    pub async fn persist(&self) -> Res<()> {
        let path = Self::session_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| TidlError::filesystem(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&self.session)?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| TidlError::filesystem(&path, e))
    }

    pub async fn clear() -> Res<()> {
        let path = Self::session_path();
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TidlError::filesystem(&path, e)),
        }
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    fn session_path() -> PathBuf {
        config::data_dir().join("cache/session.json")
    }
}
