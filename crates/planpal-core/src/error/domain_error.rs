//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Event not found: {0}")]
    EventNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message text is empty")]
    EmptyText,

    #[error("Text too long: max {max} characters")]
    TextTooLong { max: usize },

    #[error("Invalid emoji symbol")]
    InvalidEmoji,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a member of the event's group")]
    NotAMember,

    #[error("Not the message sender")]
    NotMessageSender,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Lookup timed out: {0}")]
    LookupTimeout(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyText => "EMPTY_TEXT",
            Self::TextTooLong { .. } => "TEXT_TOO_LONG",
            Self::InvalidEmoji => "INVALID_EMOJI",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::LookupTimeout(_) => "LOOKUP_TIMEOUT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound(_) | Self::MessageNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyText
                | Self::TextTooLong { .. }
                | Self::InvalidEmoji
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAMember | Self::NotMessageSender)
    }

    /// Check if this is a transient error the caller may retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::LookupTimeout(_))
    }
}
