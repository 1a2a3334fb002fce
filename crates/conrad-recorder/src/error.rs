//! Error types for the recorder crate.

use std::fmt;
use thiserror::Error;

use crate::event::RawKey;

/// Error raised by a processor, formatter or emitter.
///
/// Stage errors are never wrapped: the recorder hands them back to the
/// caller of [`Recorder::audit_event`](crate::Recorder::audit_event) as-is.
pub type StageError = anyhow::Error;

/// The slot a component was configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Processor,
    Formatter,
    Emitter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processor => write!(f, "processor"),
            Self::Formatter => write!(f, "formatter"),
            Self::Emitter => write!(f, "emitter"),
        }
    }
}

/// A configured component could not be turned into a working stage.
///
/// Only ever returned while constructing a recorder.
#[derive(Debug, Clone, Error)]
#[error("invalid {role} '{value}': {reason}")]
pub struct ConfigurationError {
    /// Which slot the component was supplied for.
    pub role: Role,
    /// The offending value, rendered verbatim.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

impl ConfigurationError {
    pub fn new(role: Role, value: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self {
            role,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// An incoming event used a key that is neither a string nor a symbol.
#[derive(Debug, Clone, Error)]
#[error("forbidden key {key}: event keys must be strings or symbols")]
pub struct ForbiddenKeyError {
    /// The first offending key.
    pub key: RawKey,
}

/// Errors returned by [`Recorder::audit_event`](crate::Recorder::audit_event).
#[derive(Debug, Error)]
pub enum RecordError {
    /// The event was rejected before any processor ran.
    #[error(transparent)]
    ForbiddenKey(#[from] ForbiddenKeyError),

    /// A processor, the formatter or the emitter failed.
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Errors converting dynamic documents into events.
#[derive(Debug, Error)]
pub enum EventError {
    /// The document is not a mapping.
    #[error("event must be a mapping, got {0}")]
    NotAMapping(&'static str),
}
