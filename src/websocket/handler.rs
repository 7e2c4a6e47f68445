use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{auth::verify_token, middleware::extract_token, state::AppState, websocket::types::WsEvent};

#[derive(Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// WebSocket upgrade. The token is verified once at handshake (query
/// parameter or session cookie); no token, no upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> Response {
    let token = query
        .token
        .as_deref()
        .or_else(|| extract_token(&headers));

    let user_id = match token.map(|t| verify_token(t, &state.config.jwt_secret)) {
        Some(Ok(user_id)) => user_id,
        Some(Err(err)) => return err.into_response(),
        None => {
            return crate::error::AppError::Unauthorized(
                "Missing authentication token".to_string(),
            )
            .into_response()
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsEvent>();

    state.ws_connections.add_connection(user_id, tx);

    // Pump fan-out events into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // No client-to-server domain events; drain frames until the peer closes.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.ws_connections.remove_connection(&user_id);
}
