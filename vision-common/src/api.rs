//! JSON bodies exchanged over the HTTP API.

use serde::{Deserialize, Serialize};

/// POST /api/emotion request body.
///
/// `image` is a base64 string, optionally framed as a data URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionRequest {
    pub image: String,
}

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// POST /chat request body.
///
/// `message` must be a string when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    /// The fixed echo reply.
    pub fn echo(message: &str) -> Self {
        Self {
            reply: format!("AI says: {}", message),
        }
    }
}

/// POST /api/messages request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageRequest {
    /// Sender and text, if both are present and non-empty.
    pub fn fields(&self) -> Option<(&str, &str)> {
        match (self.sender.as_deref(), self.text.as_deref()) {
            (Some(sender), Some(text)) if !sender.is_empty() && !text.is_empty() => {
                Some((sender, text))
            }
            _ => None,
        }
    }
}

/// POST /upload-file response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    pub message: String,
}

/// POST /upload-folder response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderUploadReply {
    pub message: String,
    pub files: Vec<String>,
}

impl FolderUploadReply {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            message: format!("{} files uploaded", files.len()),
            files,
        }
    }
}
