//! Shared API plumbing: response envelopes and error mapping

pub mod response;

pub use response::{AppError, ErrorResponse, MessageResponse};
