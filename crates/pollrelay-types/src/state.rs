use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the background task relaying one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayState {
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl RelayState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RelayState::Completed | RelayState::Failed)
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayState::Requesting => "requesting",
            RelayState::Streaming => "streaming",
            RelayState::Completed => "completed",
            RelayState::Failed => "failed",
        };
        f.write_str(name)
    }
}
