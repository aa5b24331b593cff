use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tincan_core::{ClientFrame, CloseReason};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::relay::Relay;

pub async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<Relay>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: Relay) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let client_id = relay.register(tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match serde_json::to_string(&frame) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize frame: {e}"),
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let client_id = client_id.clone();

        async move {
            let mut reason = CloseReason::ConnectionLost;
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ClientFrame>(&text) {
                            Ok(frame) => relay.handle_frame(&client_id, frame),
                            // Unknown frames are logged and ignored; the
                            // connection stays open.
                            Err(e) => warn!("Invalid frame from {client_id}: {e}"),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket error for {client_id}: {e}");
                        reason = CloseReason::ConnectionError;
                        break;
                    }
                }
            }
            reason
        }
    });

    let reason = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            CloseReason::ConnectionLost
        }
        res = (&mut recv_task) => {
            send_task.abort();
            res.unwrap_or(CloseReason::ConnectionError)
        }
    };

    relay.connection_closed(&client_id, reason);
}
