use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{RoundView, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    EditGuessInput { text: String },
    SubmitGuess,
    GiveUp,
    Restart,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    SessionStarted { session_id: SessionId, view: RoundView },
    StateUpdate { view: RoundView },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"EditGuessInput":{"text":"corgi"}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::EditGuessInput { text } if text == "corgi"));

        let msg: ClientMessage = serde_json::from_str(r#""GiveUp""#).unwrap();
        assert!(matches!(msg, ClientMessage::GiveUp));
    }

    #[test]
    fn test_server_error_wire_format() {
        let json = serde_json::to_string(&ServerMessage::Error {
            message: "bad".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"Error":{"message":"bad"}}"#);
    }
}
