use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::api::NowPlayingView;
use crate::common::types::SessionId;
use crate::server::AppState;
use crate::widgets::spotify::NowPlayingFeed;

/// GET /v1/sessions/{sessionId}/now-playing/ws
///
/// Pushes the now-playing view on every tick event, so clients render the
/// interpolated position without polling.
pub async fn now_playing_handler(
    Path(session_id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(session) = state.sessions.get(&session_id).map(|kv| kv.value().clone()) else {
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };
    let Some(feed) = session.now_playing.clone() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Spotify widget is not enabled",
        )
            .into_response();
    };

    debug!("WebSocket connected: session={}", session_id);
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, feed))
}

async fn handle_socket(mut socket: WebSocket, session_id: SessionId, feed: Arc<NowPlayingFeed>) {
    let ticks = feed.subscribe();

    // Late subscribers get the current view right away instead of waiting
    // for the next tick.
    if send_view(&mut socket, &feed).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            tick = ticks.recv_async() => {
                if tick.is_err() {
                    // Feed torn down.
                    break;
                }
                if let Err(e) = send_view(&mut socket, &feed).await {
                    warn!("Socket send error: session={} err={}", session_id, e);
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error: session={} err={}", session_id, e);
                        break;
                    }
                    // Inbound messages are ignored; commands go through REST.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("WebSocket disconnected: session={}", session_id);
}

async fn send_view(socket: &mut WebSocket, feed: &NowPlayingFeed) -> Result<(), axum::Error> {
    let view = NowPlayingView::from_feed(feed);
    match serde_json::to_string(&view) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!("Failed to serialize now-playing view: {}", e);
            Ok(())
        }
    }
}
