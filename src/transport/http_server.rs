use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{
    server::AppState,
    transport::{
        middleware::{add_response_headers, check_auth},
        routes::{info, now_playing, widgets},
        websocket_server,
    },
};

const API_V1: &str = "/v1";

pub fn router(state: Arc<AppState>) -> Router {
    let v1_routes = Router::new()
        .route("/info", get(info::get_info))
        .route("/sessions", post(now_playing::create_session))
        .route(
            "/sessions/{session_id}",
            delete(now_playing::destroy_session),
        )
        .route(
            "/sessions/{session_id}/now-playing",
            get(now_playing::get_now_playing),
        )
        .route(
            "/sessions/{session_id}/now-playing/start",
            post(now_playing::start_updates),
        )
        .route(
            "/sessions/{session_id}/now-playing/stop",
            post(now_playing::stop_updates),
        )
        .route(
            "/sessions/{session_id}/now-playing/refresh",
            post(now_playing::refresh_now),
        )
        .route(
            "/sessions/{session_id}/now-playing/ws",
            get(websocket_server::now_playing_handler),
        )
        .route("/github/contributions", get(widgets::get_github_contributions))
        .route("/discord/avatar", get(widgets::get_discord_avatar));

    Router::new()
        .nest(API_V1, v1_routes)
        .route("/version", get(info::get_version))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .layer(middleware::from_fn(add_response_headers))
        // The dashboard frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
