// Begin/End commands as delivered by the background relay.
// The relay sends `{ "action": "START" }` / `{ "action": "STOP" }` to the content script.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Begin,
    End,
}

#[derive(Debug, Deserialize)]
struct RelayMessage {
    action: String,
}

impl Command {
    /// Decode a relay message such as `{"action":"START"}`.
    pub fn from_message_json(json: &str) -> Result<Self, EngineError> {
        let message: RelayMessage = serde_json::from_str(json)?;
        message.action.parse()
    }
}

impl FromStr for Command {
    type Err = EngineError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "START" | "begin" => Ok(Command::Begin),
            "STOP" | "end" => Ok(Command::End),
            other => Err(EngineError::UnknownCommand(other.to_string())),
        }
    }
}
