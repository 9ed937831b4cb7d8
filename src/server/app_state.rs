use std::sync::Arc;

use dashmap::DashMap;

use crate::common::types::{AnyResult, SessionId};
use crate::common::HttpClient;
use crate::configs::Config;
use crate::server::session_manager::Session;
use crate::widgets::WidgetManager;

/// Top-level application state.
pub struct AppState {
    pub sessions: DashMap<SessionId, Arc<Session>>,
    pub widgets: Arc<WidgetManager>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> AnyResult<Self> {
        let client = HttpClient::new()?;
        let widgets = Arc::new(WidgetManager::new(client, &config));

        Ok(Self {
            sessions: DashMap::new(),
            widgets,
            config,
        })
    }

    pub fn create_session(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(&self.widgets));
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    pub fn remove_session(&self, session_id: &SessionId) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(session_id)?;
        session.shutdown();
        Some(session)
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Unix seconds with sub-second precision, for snapshot timestamps.
pub fn now_unix() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
