use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform `{message, error?}` body used for confirmations and failures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), error: None }
    }

    pub fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { message: message.into(), error: Some(error.into()) }
    }
}
