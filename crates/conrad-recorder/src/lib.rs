//! # conrad-recorder
//!
//! Audit event recording for Conrad.
//!
//! Calling code records a domain event without knowing how it is enriched,
//! formatted or delivered. A [`Recorder`] owns:
//! - an ordered chain of [`Processor`]s that enrich or transform the event,
//!   any of which may halt the chain
//! - one [`Formatter`] that turns the final event into text
//! - one [`Emitter`] that delivers the text
//!
//! ## Built-in components
//!
//! | Role | Type | Registry name |
//! |------|------|---------------|
//! | processor | [`AddUuid`] | `add_uuid` |
//! | processor | [`AddTimestamp`] | `add_timestamp` |
//! | formatter | [`JsonFormatter`] (default) | `json` |
//! | formatter | [`PrettyJsonFormatter`] | `pretty_json` |
//! | emitter | [`StdoutEmitter`] (default) | `stdout` |
//! | emitter | [`StderrEmitter`] | `stderr` |
//! | emitter | [`FileEmitter`] | `file` |
//! | emitter | [`NullEmitter`] | `discard` |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use conrad_recorder::{AddUuid, Event, Flow, Recorder, Symbol, processor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = Recorder::builder()
//!     .processor(AddUuid::new())
//!     .processor(processor::from_fn(|event: Event| {
//!         if event.field("health_check").is_some() {
//!             return Ok(Flow::Halt);
//!         }
//!         Ok(Flow::Continue(event))
//!     }))
//!     .build()?;
//!
//! // Prints {"action":"login","user":"alice","event_uuid":"..."}
//! recorder.audit_event(
//!     Event::new()
//!         .with(Symbol::new("action"), "login")
//!         .with("user", "alice"),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod emitter;
pub mod error;
pub mod event;
pub mod formatter;
pub mod processor;
pub mod recorder;
pub mod registry;
pub mod validator;

pub use emitter::{Emitter, FileEmitter, NullEmitter, StderrEmitter, StdoutEmitter, WriterEmitter};
pub use error::{ConfigurationError, EventError, ForbiddenKeyError, RecordError, Role, StageError};
pub use event::{Event, Key, RawEvent, RawKey, Symbol};
pub use formatter::{Formatter, JsonFormatter, PrettyJsonFormatter};
pub use processor::{AddTimestamp, AddUuid, Flow, ProcessResult, Processor};
pub use recorder::{Component, Recorder, RecorderBuilder, RecorderOptions};
pub use registry::Registry;
pub use validator::validate_keys;

pub use serde_json::Value;
