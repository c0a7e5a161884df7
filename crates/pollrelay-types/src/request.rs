use serde::{Deserialize, Serialize};

/// What a caller asks to relay: the payload sent upstream for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub message: String,
    /// Caller-side conversation context, forwarded as `session_id`
    #[serde(rename = "session_id", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl SessionRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
