use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::{api, server::AppState};

/// GET /v1/info
pub async fn get_info(State(state): State<Arc<AppState>>) -> Json<api::Info> {
    tracing::debug!("GET /v1/info");
    Json(api::Info {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_time: option_env!("BUILD_TIME")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        git: api::GitInfo {
            branch: option_env!("GIT_BRANCH").unwrap_or("unknown").to_string(),
            commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
        },
        widgets: state.widgets.widget_names(),
    })
}

/// GET /version
pub async fn get_version() -> String {
    tracing::debug!("GET /version");
    env!("CARGO_PKG_VERSION").to_string()
}
