use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::image_provider::ImageProvider;
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use game_core::{Effect, Intent, RoundEvent, RoundEventBus, RoundEventHandler, RoundId, RoundState};
use game_types::{RoundView, ServerMessage};

/// Writes every round event to the tracing log.
pub struct TracingEventHandler;

impl RoundEventHandler for TracingEventHandler {
    fn handle_event(&self, event: &RoundEvent) {
        match event {
            RoundEvent::ImageFailed { round, reason } => {
                warn!(round = %round, "Image fetch failed: {}", reason)
            }
            RoundEvent::StaleImageDiscarded { round, current } => {
                info!(round = %round, current = %current, "Discarded image for superseded round")
            }
            RoundEvent::RoundSolved { round, guess_count } => {
                info!(round = %round, guess_count, "Round solved")
            }
            RoundEvent::RoundAbandoned { round, guess_count } => {
                info!(round = %round, guess_count, "Round given up")
            }
            other => debug!(round = %other.round(), "{:?}", other),
        }
    }
}

#[derive(Debug)]
struct Session {
    round: RoundState,
    created_at: Instant,
    last_activity: Instant,
}

impl Session {
    fn new(round: RoundState) -> Self {
        let now = Instant::now();
        Self {
            round,
            created_at: now,
            last_activity: now,
        }
    }

    fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Owns one round per connected browser and runs the image requests the
/// rounds ask for.
///
/// Every state change is pushed to the browser while the sessions lock is
/// still held, so views arrive in the order the state changed. The lock order
/// is always sessions, then connections.
pub struct SessionManager {
    sessions: RwLock<HashMap<ConnectionId, Session>>,
    image_provider: Arc<dyn ImageProvider>,
    connection_manager: Arc<ConnectionManager>,
    event_bus: RoundEventBus,
}

impl SessionManager {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        image_provider: Arc<dyn ImageProvider>,
    ) -> Self {
        let mut event_bus = RoundEventBus::new();
        event_bus.add_handler(Box::new(TracingEventHandler));
        Self::new_with_event_bus(connection_manager, image_provider, event_bus)
    }

    pub fn new_with_event_bus(
        connection_manager: Arc<ConnectionManager>,
        image_provider: Arc<dyn ImageProvider>,
        event_bus: RoundEventBus,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            image_provider,
            connection_manager,
            event_bus,
        }
    }

    /// Start the first round for a newly connected browser and greet it
    /// with `SessionStarted`.
    pub async fn open_session(self: &Arc<Self>, connection_id: ConnectionId) -> Result<RoundView, String> {
        let transition = RoundState::begin(RoundId::FIRST);
        let view = transition.state.view();

        {
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(&connection_id) {
                return Err("Session already open".to_string());
            }
            sessions.insert(connection_id, Session::new(transition.state));
            self.push(
                connection_id,
                ServerMessage::SessionStarted {
                    session_id: connection_id.session_id(),
                    view: view.clone(),
                },
            )
            .await;
        }

        info!("Opened session {}", connection_id);
        self.event_bus.publish_all(&transition.events);
        if let Some(effect) = transition.effect {
            self.run_effect(connection_id, effect);
        }

        Ok(view)
    }

    pub async fn close_session(&self, connection_id: ConnectionId) -> bool {
        let removed = self.sessions.write().await.remove(&connection_id);
        if let Some(session) = &removed {
            info!(
                "Closed session {} after {:?}",
                connection_id,
                session.created_at.elapsed()
            );
        }
        removed.is_some()
    }

    pub async fn edit_guess_input(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        text: String,
    ) -> Result<RoundView, String> {
        self.apply_intent(connection_id, |_| Intent::EditGuessInput(text))
            .await
    }

    /// Submit whatever is currently in the session's guess input.
    pub async fn submit_guess(self: &Arc<Self>, connection_id: ConnectionId) -> Result<RoundView, String> {
        self.apply_intent(connection_id, |round| {
            Intent::SubmitGuess(round.current_guess_text().to_string())
        })
        .await
    }

    pub async fn give_up(self: &Arc<Self>, connection_id: ConnectionId) -> Result<RoundView, String> {
        self.apply_intent(connection_id, |_| Intent::GiveUp).await
    }

    pub async fn restart(self: &Arc<Self>, connection_id: ConnectionId) -> Result<RoundView, String> {
        self.apply_intent(connection_id, |_| Intent::Restart).await
    }

    /// Mark the session as in use without changing its round. Returns false
    /// when the session is gone.
    pub async fn touch_session(&self, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&connection_id) {
            Some(session) => {
                session.update_activity();
                true
            }
            None => false,
        }
    }

    pub async fn get_view(&self, connection_id: ConnectionId) -> Option<RoundView> {
        let sessions = self.sessions.read().await;
        sessions.get(&connection_id).map(|session| session.round.view())
    }

    pub async fn get_round(&self, connection_id: ConnectionId) -> Option<RoundState> {
        let sessions = self.sessions.read().await;
        sessions.get(&connection_id).map(|session| session.round.clone())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn cleanup_inactive_sessions(&self, timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|connection_id, session| {
            let keep = !session.is_expired(timeout);
            if !keep {
                info!("Removing inactive session: {}", connection_id);
            }
            keep
        });
        before - sessions.len()
    }

    async fn apply_intent<F>(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        make_intent: F,
    ) -> Result<RoundView, String>
    where
        F: FnOnce(&RoundState) -> Intent,
    {
        let (view, effect) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&connection_id).ok_or("Session not found")?;
            session.update_activity();

            let intent = make_intent(&session.round);
            let transition = session.round.transition(intent);
            self.event_bus.publish_all(&transition.events);
            session.round = transition.state;

            let view = session.round.view();
            self.push(connection_id, ServerMessage::StateUpdate { view: view.clone() })
                .await;
            (view, transition.effect)
        };

        if let Some(effect) = effect {
            self.run_effect(connection_id, effect);
        }

        Ok(view)
    }

    fn run_effect(self: &Arc<Self>, connection_id: ConnectionId, effect: Effect) {
        match effect {
            Effect::RequestImage(round) => {
                let manager = Arc::clone(self);
                tokio::spawn(async move {
                    let intent = match manager.image_provider.random_image().await {
                        Ok(url) => Intent::ImageLoaded { round, url },
                        Err(e) => Intent::ImageFailed {
                            round,
                            reason: e.to_string(),
                        },
                    };
                    manager.complete_image_request(connection_id, intent).await;
                });
            }
        }
    }

    /// Fold a finished image request into the session and push the new view.
    /// Results for a superseded round leave the state untouched and send
    /// nothing.
    async fn complete_image_request(&self, connection_id: ConnectionId, intent: Intent) {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&connection_id) else {
            debug!("Session {} closed before its image arrived", connection_id);
            return;
        };

        let transition = session.round.transition(intent);
        self.event_bus.publish_all(&transition.events);
        if transition.state == session.round {
            return;
        }
        session.round = transition.state;

        let view = session.round.view();
        self.push(connection_id, ServerMessage::StateUpdate { view }).await;
    }

    async fn push(&self, connection_id: ConnectionId, message: ServerMessage) {
        if let Err(e) = self
            .connection_manager
            .send_to_connection(connection_id, message)
            .await
        {
            warn!("Failed to push update to {}: {}", connection_id, e);
        }
    }
}
