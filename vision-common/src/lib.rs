//! Vision AI Common Types
//!
//! Shared types used by the vision server and its tests.

pub mod api;
pub mod emotion;
pub mod frame;

pub use api::{
    ChatReply, ChatRequest, EmotionRequest, ErrorBody, FolderUploadReply, MessageRequest,
    UploadReply,
};
pub use emotion::{EmotionResult, EmotionScores};
pub use frame::{ChannelOrder, DecodedFrame};
