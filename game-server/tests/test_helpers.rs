#![allow(dead_code)]

use async_trait::async_trait;
use game_server::image_provider::{FetchError, ImageProvider};
use game_server::session_manager::SessionManager;
use game_server::websocket::connection::{ConnectionId, ConnectionManager};
use game_types::{RoundView, ServerMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

pub const AFGHAN_URL: &str = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";
pub const CORGI_URL: &str = "https://images.dog.ceo/breeds/corgi/x.jpg";

struct ScriptedResponse {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<String, String>,
}

/// Image provider that replays scripted responses in request order. A
/// response can be held back until the test releases it, which lets a test
/// finish a later request before an earlier one.
pub struct ScriptedImageProvider {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: AtomicUsize,
}

impl ScriptedImageProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_url(&self, url: &str) {
        self.push(None, Ok(url.to_string()));
    }

    pub fn push_failure(&self, status: &str) {
        self.push(None, Err(status.to_string()));
    }

    /// Queue a URL that is only returned once the sender is fired
    pub fn push_gated_url(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), Ok(url.to_string()));
        tx
    }

    fn push(&self, gate: Option<oneshot::Receiver<()>>, result: Result<String, String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ScriptedResponse { gate, result });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for ScriptedImageProvider {
    async fn random_image(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.responses.lock().unwrap().pop_front();
        let Some(response) = response else {
            return Err(FetchError::UnexpectedStatus("unscripted".to_string()));
        };

        if let Some(gate) = response.gate {
            let _ = gate.await;
        }

        response.result.map_err(FetchError::UnexpectedStatus)
    }
}

/// Test setup that provides all necessary components
pub struct TestSessionSetup {
    pub connection_manager: Arc<ConnectionManager>,
    pub session_manager: Arc<SessionManager>,
    pub provider: Arc<ScriptedImageProvider>,
}

impl TestSessionSetup {
    pub fn new() -> Self {
        let connection_manager = Arc::new(ConnectionManager::new());
        let provider = Arc::new(ScriptedImageProvider::new());

        Self {
            connection_manager: connection_manager.clone(),
            session_manager: Arc::new(SessionManager::new(connection_manager, provider.clone())),
            provider,
        }
    }

    /// Registers a connection and opens its session, returning the receiver
    /// the browser would read from
    pub async fn open_session(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerMessage>) {
        let connection_id = ConnectionId::new();
        let receiver = self
            .connection_manager
            .create_connection(connection_id)
            .await;
        self.session_manager
            .open_session(connection_id)
            .await
            .expect("Session should open");
        (connection_id, receiver)
    }

    /// Types a guess and submits it
    pub async fn guess(&self, connection_id: ConnectionId, text: &str) -> RoundView {
        self.session_manager
            .edit_guess_input(connection_id, text.to_string())
            .await
            .unwrap();
        self.session_manager.submit_guess(connection_id).await.unwrap()
    }
}

pub async fn next_message(receiver: &mut mpsc::UnboundedReceiver<ServerMessage>) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("Timeout waiting for server message")
        .expect("Connection channel closed")
}

pub async fn next_view(receiver: &mut mpsc::UnboundedReceiver<ServerMessage>) -> RoundView {
    match next_message(receiver).await {
        ServerMessage::StateUpdate { view } => view,
        ServerMessage::SessionStarted { view, .. } => view,
        other => panic!("Expected a view, got {:?}", other),
    }
}

/// Skips pushed views until one satisfies `check`
pub async fn wait_for_view(
    receiver: &mut mpsc::UnboundedReceiver<ServerMessage>,
    check: impl Fn(&RoundView) -> bool,
) -> RoundView {
    loop {
        let view = next_view(receiver).await;
        if check(&view) {
            return view;
        }
    }
}

pub fn assert_no_message(receiver: &mut mpsc::UnboundedReceiver<ServerMessage>) {
    if let Ok(message) = receiver.try_recv() {
        panic!("Expected no message, got {:?}", message);
    }
}

/// Waits until the provider has been asked for `count` images
pub async fn wait_for_calls(provider: &ScriptedImageProvider, count: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while provider.calls() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("Timeout waiting for image request");
}
