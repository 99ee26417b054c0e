use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::session_manager::SessionManager;
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use game_types::{ClientMessage, ServerMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    session_manager: Arc<SessionManager>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        session_manager: Arc<SessionManager>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            session_manager,
        }
    }

    /// Open the session's first round. The session manager greets the
    /// browser with `SessionStarted`.
    pub async fn handle_connect(&self) -> Result<(), String> {
        self.session_manager
            .open_session(self.connection_id)
            .await
            .map(|_| ())
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        // Heartbeats count as activity for both the socket and its session
        self.connection_manager
            .update_activity(self.connection_id)
            .await;
        let session_open = self.session_manager.touch_session(self.connection_id).await;

        let result = match message {
            ClientMessage::EditGuessInput { text } => {
                self.session_manager
                    .edit_guess_input(self.connection_id, text)
                    .await
            }
            ClientMessage::SubmitGuess => self.session_manager.submit_guess(self.connection_id).await,
            ClientMessage::GiveUp => self.session_manager.give_up(self.connection_id).await,
            ClientMessage::Restart => {
                info!("Connection {} restarting round", self.connection_id);
                self.session_manager.restart(self.connection_id).await
            }
            ClientMessage::Heartbeat if session_open => return Ok(()),
            ClientMessage::Heartbeat => Err("Session not found".to_string()),
        };

        // Successful intents are pushed to the browser by the session manager
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Failed to apply message for {}: {}", self.connection_id, e);
                self.send_error(&e).await
            }
        }
    }

    pub async fn handle_disconnect(&self) {
        debug!("Handling disconnect for connection {}", self.connection_id);
        self.session_manager.close_session(self.connection_id).await;
    }

    pub async fn send_error(&self, message: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: message.to_string(),
        })
        .await
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }
}
