use tincan_core::ServerFrame;
use tokio::sync::mpsc;
use tracing::warn;

use crate::session::call_session::CallSession;

/// Host-issued commands for a session owned by [`drive`].
#[derive(Debug)]
pub enum CallCommand {
    EnableAudio,
    Dial(String),
    HangUp,
}

/// Run a session over its inbound frame stream, host commands and media
/// events. Returns when the relay connection or the command channel
/// closes, releasing any in-call resources first.
///
/// Precondition failures on commands are reported through the status
/// callback; hosts that want them synchronously call the session
/// methods directly instead.
pub async fn drive(
    mut session: CallSession,
    mut frames: mpsc::UnboundedReceiver<ServerFrame>,
    mut commands: mpsc::UnboundedReceiver<CallCommand>,
) {
    let Some(mut media) = session.take_media_events() else {
        warn!("media events already taken; session cannot be driven");
        return;
    };

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = session.handle_frame(frame).await {
                        session.report(&e.to_string());
                    }
                }
                None => break,
            },

            command = commands.recv() => match command {
                Some(CallCommand::EnableAudio) => {
                    if let Err(e) = session.enable_audio().await {
                        session.report(&e.to_string());
                    }
                }
                Some(CallCommand::Dial(target)) => {
                    if let Err(e) = session.dial(&target) {
                        session.report(&e.to_string());
                    }
                }
                Some(CallCommand::HangUp) => session.hang_up().await,
                None => break,
            },

            event = media.recv() => match event {
                Some(event) => {
                    if let Err(e) = session.handle_media_event(event).await {
                        session.report(&e.to_string());
                    }
                }
                None => break,
            },
        }
    }

    session.transport_closed().await;
}
