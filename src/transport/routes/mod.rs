pub mod info;
pub mod now_playing;
pub mod widgets;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::common::{DashlinkError, WidgetError};

/// Dashlink v1 JSON error body for a failed widget fetch.
pub(crate) fn widget_error_response(err: &WidgetError, path: &str) -> Response {
    let body = DashlinkError::from_widget(err, path);
    let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(serde_json::to_value(&body).unwrap())).into_response()
}
