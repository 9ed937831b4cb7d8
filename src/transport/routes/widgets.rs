use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{common::DashlinkError, server::AppState};

use super::widget_error_response;

/// GET /v1/github/contributions
pub async fn get_github_contributions(State(state): State<Arc<AppState>>) -> Response {
    tracing::debug!("GET /v1/github/contributions");
    let Some(github) = state.widgets.github.clone() else {
        return widget_disabled("GitHub", "/v1/github/contributions");
    };

    match github.fetch_contributions().await {
        Ok(calendar) => Json(calendar).into_response(),
        Err(e) => widget_error_response(&e, "/v1/github/contributions"),
    }
}

/// GET /v1/discord/avatar
pub async fn get_discord_avatar(State(state): State<Arc<AppState>>) -> Response {
    tracing::debug!("GET /v1/discord/avatar");
    let Some(discord) = state.widgets.discord.clone() else {
        return widget_disabled("Discord", "/v1/discord/avatar");
    };

    match discord.fetch_avatar().await {
        Ok(avatar) => Json(avatar).into_response(),
        Err(e) => widget_error_response(&e, "/v1/discord/avatar"),
    }
}

fn widget_disabled(name: &str, path: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(
            serde_json::to_value(DashlinkError::new(
                503,
                "Service Unavailable",
                format!("{} widget is not enabled", name),
                path,
            ))
            .unwrap(),
        ),
    )
        .into_response()
}
