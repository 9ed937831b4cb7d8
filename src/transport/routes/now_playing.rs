use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{
    api::{NowPlayingView, SessionCreated},
    common::{DashlinkError, types::SessionId},
    server::AppState,
    widgets::spotify::NowPlayingFeed,
};

use super::widget_error_response;

/// POST /v1/sessions
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.create_session();
    tracing::info!("POST /v1/sessions -> {}", session.session_id);
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.session_id.clone(),
        }),
    )
}

/// DELETE /v1/sessions/{sessionId}
pub async fn destroy_session(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("DELETE /v1/sessions/{}", session_id);
    match state.remove_session(&session_id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => session_not_found(&session_id).into_response(),
    }
}

/// GET /v1/sessions/{sessionId}/now-playing
pub async fn get_now_playing(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match session_feed(&state, &session_id) {
        Ok(feed) => Json(NowPlayingView::from_feed(&feed)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /v1/sessions/{sessionId}/now-playing/start
pub async fn start_updates(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    tracing::info!("POST /v1/sessions/{}/now-playing/start", session_id);
    match session_feed(&state, &session_id) {
        Ok(feed) => {
            feed.clone().start();
            Json(NowPlayingView::from_feed(&feed)).into_response()
        }
        Err(resp) => resp,
    }
}

/// POST /v1/sessions/{sessionId}/now-playing/stop
pub async fn stop_updates(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    tracing::info!("POST /v1/sessions/{}/now-playing/stop", session_id);
    match session_feed(&state, &session_id) {
        Ok(feed) => {
            feed.stop();
            Json(NowPlayingView::from_feed(&feed)).into_response()
        }
        Err(resp) => resp,
    }
}

/// POST /v1/sessions/{sessionId}/now-playing/refresh
///
/// One poll outside the schedule. A failed poll keeps the previous
/// snapshot, so the error body is returned instead of a stale "success".
pub async fn refresh_now(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    tracing::info!("POST /v1/sessions/{}/now-playing/refresh", session_id);
    let feed = match session_feed(&state, &session_id) {
        Ok(feed) => feed,
        Err(resp) => return resp,
    };

    match feed.force_refresh_now().await {
        Ok(()) => Json(NowPlayingView::from_feed(&feed)).into_response(),
        Err(e) => widget_error_response(
            &e,
            &format!("/v1/sessions/{}/now-playing/refresh", session_id),
        ),
    }
}

fn session_feed(
    state: &AppState,
    session_id: &SessionId,
) -> Result<Arc<NowPlayingFeed>, Response> {
    let session = state
        .sessions
        .get(session_id)
        .map(|kv| kv.value().clone())
        .ok_or_else(|| session_not_found(session_id).into_response())?;

    session.now_playing.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(
                serde_json::to_value(DashlinkError::new(
                    503,
                    "Service Unavailable",
                    "Spotify widget is not enabled",
                    format!("/v1/sessions/{}/now-playing", session_id),
                ))
                .unwrap(),
            ),
        )
            .into_response()
    })
}

fn session_not_found(session_id: &SessionId) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(
            serde_json::to_value(DashlinkError::not_found(
                format!("Session not found: {}", session_id),
                format!("/v1/sessions/{}", session_id),
            ))
            .unwrap(),
        ),
    )
}
