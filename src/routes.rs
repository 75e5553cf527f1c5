//! HTTP boundary: the contact-form endpoint.
//!
//! `POST /api/contact/send` accepts the raw form fields, validates them,
//! hands validated submissions to the dispatcher, and reduces failures to
//! the stable user-safe messages. Provider detail never crosses this
//! boundary; it is logged inside the dispatcher.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatcher;
use crate::submission::{validate, ContactSubmission};

/// Shared state for the contact routes.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Build the contact router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact/send", post(send_contact))
        .with_state(state)
}

/// Request body for a contact submission.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Success body returned on delivery.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

async fn send_contact(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Response {
    let submission = ContactSubmission::new(request.name, request.email, request.message);

    if let Err(errors) = validate(&submission) {
        tracing::debug!(errors = %errors, "Contact submission rejected");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: errors.to_string(),
            }),
        )
            .into_response();
    }

    match state.dispatcher.send(&submission).await {
        Ok(delivery) => (
            StatusCode::OK,
            Json(SendResponse {
                success: true,
                message: "Message sent successfully".to_string(),
                message_id: delivery.message_id,
            }),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: error.user_message(),
            }),
        )
            .into_response(),
    }
}
