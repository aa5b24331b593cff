use tincan_core::{ClientFrame, ServerFrame};

use crate::integration::{create_relay, init_tracing};
use crate::utils::{TestClient, establish_call};

#[tokio::test]
async fn test_explicit_disconnect() {
    init_tracing();

    let relay = create_relay();
    let mut a = TestClient::connect(&relay);
    let mut b = TestClient::connect(&relay);
    establish_call(&relay, &mut a, &mut b).await;

    relay.handle_frame(&a.id, ClientFrame::Disconnect { target_id: None });

    // Explicit hang-up carries no reason.
    assert_eq!(
        b.recv().await,
        ServerFrame::Disconnect {
            from: a.id.clone(),
            reason: None,
        }
    );
    assert!(!relay.has_active_calls());

    // Both stay connected; only the pairing is gone.
    assert!(relay.is_connected(&a.id));
    assert!(relay.is_connected(&b.id));

    // Hanging up again with no call is a no-op.
    relay.handle_frame(&a.id, ClientFrame::Disconnect { target_id: None });
    assert!(b.try_recv().is_none());
}

#[tokio::test]
async fn test_disconnect_ignores_client_supplied_target() {
    init_tracing();

    let relay = create_relay();
    let mut a = TestClient::connect(&relay);
    let mut b = TestClient::connect(&relay);
    let mut c = TestClient::connect(&relay);
    establish_call(&relay, &mut a, &mut b).await;

    // A names an unrelated client; the pairing table decides who is
    // actually notified.
    relay.handle_frame(
        &a.id,
        ClientFrame::Disconnect {
            target_id: Some(c.id.clone()),
        },
    );

    assert_eq!(
        b.recv().await,
        ServerFrame::Disconnect {
            from: a.id.clone(),
            reason: None,
        }
    );
    assert!(c.try_recv().is_none());
}
