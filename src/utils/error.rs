use aws_sdk_dynamodb::error::DisplayErrorContext;
use thiserror::Error;

/// Every failure a record operation can surface.
///
/// `Validation` is raised before the store is touched; `RemoteService` covers
/// everything the store (or the transport to it) can throw back at us.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    RemoteService { message: String },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        AppError::RemoteService { message: message.into() }
    }

    /// Wraps an SDK error keeping the whole source chain in the message.
    ///
    /// `SdkError`'s own `Display` only prints "service error", which is useless
    /// on screen.
    pub fn from_sdk<E: std::error::Error>(err: E) -> Self {
        AppError::remote(DisplayErrorContext(&err).to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
