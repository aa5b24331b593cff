use std::sync::Arc;

use serde_json::Value;
use tincan_core::{ClientFrame, ClientId, ServerFrame};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::media::{AudioSource, MediaBackend, MediaEvent, PeerLink};
use crate::prompt::{ConsentPrompt, StatusFn};
use crate::session::state::{CallRole, CallState};

/// The local session state machine.
///
/// Driven by inbound relay frames, host commands and media events; every
/// transition out of an active call releases the capture and the peer
/// link before the state returns to `Idle`.
pub struct CallSession {
    client_id: Option<ClientId>,
    state: CallState,
    outbound: mpsc::UnboundedSender<ClientFrame>,
    backend: Arc<dyn MediaBackend>,
    prompt: Arc<dyn ConsentPrompt>,
    status: StatusFn,
    capture: Option<Box<dyn AudioSource>>,
    link: Option<Box<dyn PeerLink>>,
    media_tx: mpsc::UnboundedSender<MediaEvent>,
    media_rx: Option<mpsc::UnboundedReceiver<MediaEvent>>,
    pending_candidates: Vec<Value>,
}

impl CallSession {
    pub fn new(
        outbound: mpsc::UnboundedSender<ClientFrame>,
        backend: Arc<dyn MediaBackend>,
        prompt: Arc<dyn ConsentPrompt>,
        status: StatusFn,
    ) -> Self {
        let (media_tx, media_rx) = mpsc::unbounded_channel();
        Self {
            client_id: None,
            state: CallState::Idle,
            outbound,
            backend,
            prompt,
            status,
            capture: None,
            link: None,
            media_tx,
            media_rx: Some(media_rx),
            pending_candidates: Vec::new(),
        }
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn audio_enabled(&self) -> bool {
        self.capture.is_some()
    }

    /// The media event stream, for whoever pumps the session. Present
    /// until the first take.
    pub fn take_media_events(&mut self) -> Option<mpsc::UnboundedReceiver<MediaEvent>> {
        self.media_rx.take()
    }

    /// Open the local audio capture. Explicit user action; a call cannot
    /// be placed or accepted without it.
    pub async fn enable_audio(&mut self) -> Result<(), ClientError> {
        if self.capture.is_none() {
            self.capture = Some(self.backend.open_capture().await?);
            self.report("Local audio stream enabled.");
        }
        Ok(())
    }

    /// Place a call to `target`. Fails synchronously if the target is
    /// empty, no identity has been assigned yet, local audio is not
    /// enabled, or another call is already underway.
    pub fn dial(&mut self, target: &str) -> Result<(), ClientError> {
        if target.is_empty() {
            return Err(ClientError::EmptyTarget);
        }
        if self.client_id.is_none() {
            return Err(ClientError::NotRegistered);
        }
        if self.capture.is_none() {
            return Err(ClientError::MediaDisabled);
        }
        if !self.state.is_idle() {
            return Err(ClientError::CallInProgress);
        }

        let target = ClientId::from(target);
        self.send(ClientFrame::Request {
            target_id: target.clone(),
        })?;
        self.report(&format!("Call request sent to: {target}"));
        self.state = CallState::AwaitingCallDecision { target };
        Ok(())
    }

    /// End the current call. A no-op (reported via status) when nothing
    /// is underway.
    pub async fn hang_up(&mut self) {
        let Some(partner) = self.state.counterpart().cloned() else {
            self.report("No active call to end.");
            return;
        };

        if self
            .send(ClientFrame::Disconnect {
                target_id: Some(partner),
            })
            .is_ok()
        {
            self.report("Disconnect message sent to the relay.");
        } else {
            self.report("Relay connection is not open.");
        }

        self.teardown().await;
        self.state = CallState::Idle;
        self.report("Call ended.");
    }

    /// The connection to the relay is gone; release everything locally.
    pub async fn transport_closed(&mut self) {
        self.teardown().await;
        self.state = CallState::Idle;
        self.client_id = None;
        self.report("Connection to the relay closed.");
    }

    /// Apply one inbound relay frame.
    pub async fn handle_frame(&mut self, frame: ServerFrame) -> Result<(), ClientError> {
        match frame {
            ServerFrame::Id { id } => {
                self.report(&format!("Client ID: {id}"));
                self.client_id = Some(id);
            }
            ServerFrame::Request { from } => self.handle_request(from).await?,
            ServerFrame::Response { from, accepted } => {
                self.handle_response(from, accepted).await?
            }
            ServerFrame::Offer { from, offer } => self.handle_offer(from, offer).await?,
            ServerFrame::Answer { from, answer } => self.handle_answer(from, answer).await?,
            ServerFrame::Candidate { from, candidate } => {
                self.handle_candidate(from, candidate).await?
            }
            ServerFrame::Disconnect { from, reason } => self.handle_disconnect(from, reason).await,
            ServerFrame::Error { message } => {
                self.report(&format!("Relay error: {message}"));
                // A failed request leaves nothing to wait for.
                if matches!(self.state, CallState::AwaitingCallDecision { .. }) {
                    self.state = CallState::Idle;
                }
            }
        }
        Ok(())
    }

    /// Apply one event from the media capability.
    pub async fn handle_media_event(&mut self, event: MediaEvent) -> Result<(), ClientError> {
        match event {
            MediaEvent::LocalCandidate(candidate) => {
                let Some(partner) = self.state.counterpart().cloned() else {
                    debug!("local candidate with no call in progress");
                    return Ok(());
                };
                self.send(ClientFrame::Candidate {
                    candidate,
                    target_id: partner,
                })?;
            }
            MediaEvent::RemoteTrack => self.report("Remote audio track started."),
        }
        Ok(())
    }

    async fn handle_request(&mut self, from: ClientId) -> Result<(), ClientError> {
        let resume = std::mem::replace(
            &mut self.state,
            CallState::AwaitingLocalDecision { from: from.clone() },
        );

        let mut accepted = self.prompt.decide(&from).await;
        if accepted && self.capture.is_none() {
            self.report("Cannot accept call: local audio is not enabled.");
            accepted = false;
        }

        self.send(ClientFrame::Response {
            target_id: from.clone(),
            accepted,
        })?;

        if accepted {
            self.report(&format!("Call accepted from: {from}"));
            self.begin_call(from, CallRole::Answering).await?;
        } else {
            self.report(&format!("Call rejected from: {from}"));
            self.state = resume;
        }
        Ok(())
    }

    async fn handle_response(&mut self, from: ClientId, accepted: bool) -> Result<(), ClientError> {
        if !matches!(self.state, CallState::AwaitingCallDecision { .. }) {
            debug!("response from {from} outside of a pending request");
            return Ok(());
        }
        if accepted {
            self.report(&format!("Call accepted by: {from}"));
            self.begin_call(from, CallRole::Offering).await
        } else {
            self.report(&format!("Call rejected by: {from}"));
            self.state = CallState::Idle;
            Ok(())
        }
    }

    async fn handle_offer(&mut self, from: ClientId, offer: Value) -> Result<(), ClientError> {
        let queued = std::mem::take(&mut self.pending_candidates);
        let Some(link) = self.link.as_mut() else {
            warn!("offer from {from} with no open negotiation");
            return Ok(());
        };

        link.set_remote_description(offer).await?;
        for candidate in queued {
            link.add_ice_candidate(candidate).await?;
        }

        let answer = link.create_answer().await?;
        link.set_local_description(answer.clone()).await?;
        self.send(ClientFrame::Answer {
            answer,
            target_id: from,
        })?;
        self.note_descriptions(true, true);
        Ok(())
    }

    async fn handle_answer(&mut self, from: ClientId, answer: Value) -> Result<(), ClientError> {
        let queued = std::mem::take(&mut self.pending_candidates);
        let Some(link) = self.link.as_mut() else {
            warn!("answer from {from} with no open negotiation");
            return Ok(());
        };

        link.set_remote_description(answer).await?;
        for candidate in queued {
            link.add_ice_candidate(candidate).await?;
        }
        self.note_descriptions(false, true);
        Ok(())
    }

    async fn handle_candidate(&mut self, from: ClientId, candidate: Value) -> Result<(), ClientError> {
        if self.state.counterpart() != Some(&from) {
            debug!("candidate from {from} outside of any call");
            return Ok(());
        }

        if self.remote_description_set() {
            if let Some(link) = self.link.as_mut() {
                return link.add_ice_candidate(candidate).await;
            }
        }

        // Candidates may outrun the description exchange; hold them
        // until the remote description lands.
        self.pending_candidates.push(candidate);
        Ok(())
    }

    async fn handle_disconnect(&mut self, from: ClientId, reason: Option<String>) {
        if self.state.counterpart() != Some(&from) {
            debug!("disconnect from {from} who is not the current partner");
            return;
        }
        if let Some(reason) = reason {
            debug!("partner {from} gone: {reason}");
        }
        self.report(&format!("Call disconnected by: {from}"));
        self.teardown().await;
        self.state = CallState::Idle;
    }

    /// Open a fresh peer link for `partner` and, in the offering role,
    /// send the initial description. Any failure releases local
    /// resources and returns the session to `Idle`.
    async fn begin_call(&mut self, partner: ClientId, role: CallRole) -> Result<(), ClientError> {
        if let Err(e) = self.try_begin_call(partner, role).await {
            self.teardown().await;
            self.state = CallState::Idle;
            return Err(e);
        }
        Ok(())
    }

    async fn try_begin_call(&mut self, partner: ClientId, role: CallRole) -> Result<(), ClientError> {
        // A live negotiation, if any, is replaced by the new call.
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
        self.pending_candidates.clear();

        let Some(capture) = self.capture.as_deref() else {
            return Err(ClientError::MediaDisabled);
        };

        let mut link = self.backend.open_link(self.media_tx.clone()).await?;
        link.add_track(capture).await?;

        let local_set = role == CallRole::Offering;
        if local_set {
            let offer = link.create_offer().await?;
            link.set_local_description(offer.clone()).await?;
            self.send(ClientFrame::Offer {
                offer,
                target_id: partner.clone(),
            })?;
        }

        self.link = Some(link);
        self.state = CallState::Negotiating {
            partner,
            role,
            local_set,
            remote_set: false,
        };
        Ok(())
    }

    /// Record description progress; both sides set means the call is up.
    fn note_descriptions(&mut self, local: bool, remote: bool) {
        let CallState::Negotiating {
            partner,
            local_set,
            remote_set,
            ..
        } = &mut self.state
        else {
            return;
        };

        *local_set |= local;
        *remote_set |= remote;
        if !(*local_set && *remote_set) {
            return;
        }

        let partner = partner.clone();
        self.state = CallState::InCall {
            partner: partner.clone(),
        };
        self.report(&format!("In call with: {partner}"));
    }

    fn remote_description_set(&self) -> bool {
        matches!(
            self.state,
            CallState::Negotiating {
                remote_set: true,
                ..
            } | CallState::InCall { .. }
        )
    }

    /// Release the peer link and the audio capture.
    async fn teardown(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        self.pending_candidates.clear();
    }

    fn send(&self, frame: ClientFrame) -> Result<(), ClientError> {
        self.outbound
            .send(frame)
            .map_err(|_| ClientError::ChannelClosed)
    }

    pub(crate) fn report(&self, message: &str) {
        (self.status)(message);
    }
}
