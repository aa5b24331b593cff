use tincan_core::{ClientFrame, ServerFrame};
use tincan_relay::Relay;

use super::test_client::TestClient;

/// Run the consent handshake until the two clients are paired.
pub async fn establish_call(relay: &Relay, caller: &mut TestClient, callee: &mut TestClient) {
    relay.handle_frame(
        &caller.id,
        ClientFrame::Request {
            target_id: callee.id.clone(),
        },
    );
    assert_eq!(
        callee.recv().await,
        ServerFrame::Request {
            from: caller.id.clone(),
        }
    );

    relay.handle_frame(
        &callee.id,
        ClientFrame::Response {
            target_id: caller.id.clone(),
            accepted: true,
        },
    );
    assert_eq!(
        caller.recv().await,
        ServerFrame::Response {
            from: callee.id.clone(),
            accepted: true,
        }
    );

    assert_eq!(relay.partner_of(&caller.id), Some(callee.id.clone()));
    assert_eq!(relay.partner_of(&callee.id), Some(caller.id.clone()));
}
