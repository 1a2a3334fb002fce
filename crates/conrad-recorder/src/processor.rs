//! Processors: the stages that enrich or transform events.
//!
//! A processor receives the event produced by the previous stage and either
//! hands a (possibly new) event on with [`Flow::Continue`], or stops the
//! chain with [`Flow::Halt`]. Halting is not an error: the recorder simply
//! skips the remaining processors, the formatter and the emitter.

use chrono::Utc;
use conrad_core::TimestampUnit;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::error::StageError;
use crate::event::{Event, Key};

/// Key used by [`AddUuid`] when none is configured.
pub const DEFAULT_UUID_KEY: &str = "event_uuid";

/// Key used by [`AddTimestamp`] when none is configured.
pub const DEFAULT_TIMESTAMP_KEY: &str = "timestamp";

/// Outcome of a single processor step.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Pass this event to the next stage.
    Continue(Event),
    /// Stop processing this event. Nothing downstream runs.
    Halt,
}

impl Flow {
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt)
    }
}

/// Result of a processor step.
pub type ProcessResult = Result<Flow, StageError>;

/// A pipeline stage that transforms an event or halts the pipeline.
pub trait Processor: Send + Sync {
    fn process(&self, event: Event) -> ProcessResult;
}

/// Processor backed by a function or closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnProcessor<F> {
    f: F,
}

/// Wrap a function or closure as a processor.
///
/// ```
/// use conrad_recorder::processor::{self, Flow};
///
/// let sample = processor::from_fn(|event| {
///     if event.field("debug").is_some() {
///         return Ok(Flow::Halt);
///     }
///     Ok(Flow::Continue(event))
/// });
/// # let _ = sample;
/// ```
pub fn from_fn<F>(f: F) -> FnProcessor<F>
where
    F: Fn(Event) -> ProcessResult + Send + Sync,
{
    FnProcessor { f }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(Event) -> ProcessResult + Send + Sync,
{
    fn process(&self, event: Event) -> ProcessResult {
        (self.f)(event)
    }
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").finish_non_exhaustive()
    }
}

/// Processor backed by an infallible transform that never halts. See [`map`].
#[derive(Clone)]
pub struct MapProcessor<F> {
    f: F,
}

/// Wrap an infallible `Event -> Event` transform as a processor.
pub fn map<F>(f: F) -> MapProcessor<F>
where
    F: Fn(Event) -> Event + Send + Sync,
{
    MapProcessor { f }
}

impl<F> Processor for MapProcessor<F>
where
    F: Fn(Event) -> Event + Send + Sync,
{
    fn process(&self, event: Event) -> ProcessResult {
        Ok(Flow::Continue((self.f)(event)))
    }
}

impl<F> fmt::Debug for MapProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapProcessor").finish_non_exhaustive()
    }
}

/// Adds a freshly generated UUID (v4, hyphenated) to every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUuid {
    key: Key,
}

impl AddUuid {
    /// Insert the UUID under the `:event_uuid` symbol.
    pub fn new() -> Self {
        Self::with_key(Key::symbol(DEFAULT_UUID_KEY))
    }

    pub fn with_key(key: impl Into<Key>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for AddUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for AddUuid {
    fn process(&self, mut event: Event) -> ProcessResult {
        event.insert(self.key.clone(), Uuid::new_v4().to_string());
        Ok(Flow::Continue(event))
    }
}

/// Adds the current Unix time, as an integer, to every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTimestamp {
    unit: TimestampUnit,
    key: Key,
}

impl AddTimestamp {
    /// Milliseconds under the `:timestamp` symbol.
    pub fn new() -> Self {
        Self::with_unit(TimestampUnit::default())
    }

    pub fn with_unit(unit: TimestampUnit) -> Self {
        Self {
            unit,
            key: Key::symbol(DEFAULT_TIMESTAMP_KEY),
        }
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = key.into();
        self
    }

    fn now(&self) -> i64 {
        let now = Utc::now();
        match self.unit {
            TimestampUnit::Seconds => now.timestamp(),
            TimestampUnit::Milliseconds => now.timestamp_millis(),
        }
    }
}

impl Default for AddTimestamp {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for AddTimestamp {
    fn process(&self, mut event: Event) -> ProcessResult {
        event.insert(self.key.clone(), Value::from(self.now()));
        Ok(Flow::Continue(event))
    }
}
