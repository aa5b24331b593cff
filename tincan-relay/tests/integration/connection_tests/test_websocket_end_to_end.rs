use std::time::Duration;

use axum::{Router, routing::get};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tincan_core::{ClientFrame, ClientId, ServerFrame};
use tincan_relay::{Relay, RelayConfig, ws_handler};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::integration::init_tracing;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn recv_frame(ws: &mut Socket) -> ServerFrame {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("invalid frame");
        }
    }
}

async fn send_frame(ws: &mut Socket, frame: &ClientFrame) {
    let json = serde_json::to_string(frame).unwrap();
    ws.send(Message::text(json)).await.expect("send failed");
}

async fn expect_id(ws: &mut Socket) -> ClientId {
    match recv_frame(ws).await {
        ServerFrame::Id { id } => id,
        other => panic!("expected id frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_websocket_end_to_end() {
    init_tracing();

    let relay = Relay::new(&RelayConfig::default());
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(relay.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = format!("ws://{addr}/ws");
    let (mut ws_a, _) = connect_async(url.as_str()).await.expect("connect A");
    let (mut ws_b, _) = connect_async(url.as_str()).await.expect("connect B");

    let id_a = expect_id(&mut ws_a).await;
    let id_b = expect_id(&mut ws_b).await;
    assert_ne!(id_a, id_b);

    // Consent handshake over real sockets.
    send_frame(
        &mut ws_a,
        &ClientFrame::Request {
            target_id: id_b.clone(),
        },
    )
    .await;
    assert_eq!(
        recv_frame(&mut ws_b).await,
        ServerFrame::Request { from: id_a.clone() }
    );

    send_frame(
        &mut ws_b,
        &ClientFrame::Response {
            target_id: id_a.clone(),
            accepted: true,
        },
    )
    .await;
    assert_eq!(
        recv_frame(&mut ws_a).await,
        ServerFrame::Response {
            from: id_b.clone(),
            accepted: true,
        }
    );

    // A signaling payload crosses unmodified.
    let offer = json!({"sdp": "v=0\r\no=- 0 0 IN IP4 127.0.0.1", "type": "offer"});
    send_frame(
        &mut ws_a,
        &ClientFrame::Offer {
            offer: offer.clone(),
            target_id: id_b.clone(),
        },
    )
    .await;
    assert_eq!(
        recv_frame(&mut ws_b).await,
        ServerFrame::Offer {
            from: id_a.clone(),
            offer,
        }
    );

    // A closing its socket is an implicit disconnect for B.
    ws_a.close(None).await.expect("close A");
    match recv_frame(&mut ws_b).await {
        ServerFrame::Disconnect { from, reason } => {
            assert_eq!(from, id_a);
            assert_eq!(reason.as_deref(), Some("connection lost"));
        }
        other => panic!("expected disconnect frame, got {other:?}"),
    }

    assert!(relay.partner_of(&id_b).is_none());
    assert!(!relay.has_active_calls());
    assert!(!relay.is_connected(&id_a));
    assert!(relay.is_connected(&id_b));
}
