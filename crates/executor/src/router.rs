use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::models::{TradeSignal, WebhookPayload};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::services::order_sequencer::{OrderSequencer, SequenceError};

#[derive(Clone)]
pub struct AppState {
    sequencer: Arc<OrderSequencer>,
    webhook_secret: Arc<str>,
}

impl AppState {
    pub fn new(sequencer: Arc<OrderSequencer>, webhook_secret: impl Into<Arc<str>>) -> Self {
        Self {
            sequencer,
            webhook_secret: webhook_secret.into(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn index() -> &'static str {
    "OKX limit bot is running."
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

/// True only when `body.secret` is a string equal to the configured secret.
fn secret_matches(body: &Value, expected: &str) -> bool {
    body.get("secret").and_then(Value::as_str) == Some(expected)
}

pub async fn webhook(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Reply {
    let span = info_span!("webhook", request_id = %Uuid::new_v4());
    handle_webhook(state, body).instrument(span).await
}

async fn handle_webhook(state: AppState, body: Result<Json<Value>, JsonRejection>) -> Reply {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Unreadable webhook body: {}", rejection.body_text());
            return reply(
                StatusCode::BAD_REQUEST,
                json!({ "error": rejection.body_text() }),
            );
        }
    };

    // Before any typed parsing: a wrong secret is a 403 whatever else the body holds.
    if !secret_matches(&body, &state.webhook_secret) {
        warn!("Rejected webhook with invalid secret");
        return reply(StatusCode::FORBIDDEN, json!({ "error": "Invalid secret" }));
    }

    let payload: WebhookPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Malformed signal: {}", e);
            return reply(StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }));
        }
    };

    info!("Webhook received: {:?}", payload);

    let signal = match TradeSignal::try_from(payload) {
        Ok(signal) => signal,
        Err(e) => {
            warn!("Invalid signal: {}", e);
            return reply(StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }));
        }
    };

    match state.sequencer.execute(&signal).await {
        Ok(order_id) => reply(
            StatusCode::OK,
            json!({ "status": "order placed", "order_id": order_id }),
        ),
        Err(SequenceError::Placement(e)) => reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": e.to_string(), "response": e.raw_response() }),
        ),
        Err(e) => {
            error!("Signal aborted: {}", e);
            let mut body = json!({ "error": e.to_string() });
            if let SequenceError::Persist { order_id, .. } = &e {
                body["order_id"] = json!(order_id);
            }
            reply(StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    }
}
