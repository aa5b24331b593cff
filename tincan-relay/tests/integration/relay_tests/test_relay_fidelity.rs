use serde_json::json;
use tincan_core::{ClientFrame, ServerFrame};

use crate::integration::{create_relay, init_tracing};
use crate::utils::{TestClient, establish_call};

/// Signaling payloads must arrive content-identical, tagged with the
/// sender's identifier.
#[tokio::test]
async fn test_relay_fidelity() {
    init_tracing();

    let relay = create_relay();
    let mut a = TestClient::connect(&relay);
    let mut b = TestClient::connect(&relay);
    establish_call(&relay, &mut a, &mut b).await;

    let offer = json!({"type": "offer", "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1"});
    relay.handle_frame(
        &a.id,
        ClientFrame::Offer {
            offer: offer.clone(),
            target_id: b.id.clone(),
        },
    );
    assert_eq!(
        b.recv().await,
        ServerFrame::Offer {
            from: a.id.clone(),
            offer,
        }
    );

    let answer = json!({"type": "answer", "sdp": "v=0\r\ns=reply"});
    relay.handle_frame(
        &b.id,
        ClientFrame::Answer {
            answer: answer.clone(),
            target_id: a.id.clone(),
        },
    );
    assert_eq!(
        a.recv().await,
        ServerFrame::Answer {
            from: b.id.clone(),
            answer,
        }
    );

    let candidate = json!({
        "candidate": "candidate:842163049 1 udp 1677729535 10.0.0.2 40821 typ srflx",
        "sdpMid": "0",
        "sdpMLineIndex": 0,
    });
    relay.handle_frame(
        &b.id,
        ClientFrame::Candidate {
            candidate: candidate.clone(),
            target_id: a.id.clone(),
        },
    );
    assert_eq!(
        a.recv().await,
        ServerFrame::Candidate {
            from: b.id.clone(),
            candidate,
        }
    );
}
