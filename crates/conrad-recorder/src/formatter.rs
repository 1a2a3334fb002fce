//! Formatters turn a processed event into text.

use std::fmt;

use crate::error::StageError;
use crate::event::Event;

/// Converts the final event into its serialized representation.
pub trait Formatter: Send + Sync {
    fn format(&self, event: &Event) -> Result<String, StageError>;
}

/// Compact JSON, one object per event. The default formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, event: &Event) -> Result<String, StageError> {
        Ok(serde_json::to_string(event)?)
    }
}

/// Indented JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonFormatter;

impl Formatter for PrettyJsonFormatter {
    fn format(&self, event: &Event) -> Result<String, StageError> {
        Ok(serde_json::to_string_pretty(event)?)
    }
}

/// Formatter backed by a function or closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnFormatter<F> {
    f: F,
}

/// Wrap a function or closure as a formatter.
pub fn from_fn<F>(f: F) -> FnFormatter<F>
where
    F: Fn(&Event) -> Result<String, StageError> + Send + Sync,
{
    FnFormatter { f }
}

impl<F> Formatter for FnFormatter<F>
where
    F: Fn(&Event) -> Result<String, StageError> + Send + Sync,
{
    fn format(&self, event: &Event) -> Result<String, StageError> {
        (self.f)(event)
    }
}

impl<F> fmt::Debug for FnFormatter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormatter").finish_non_exhaustive()
    }
}
