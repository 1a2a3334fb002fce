//! The recorder.
//!
//! `audit_event` runs every event through four steps, on the caller's
//! thread:
//!
//! 1. key validation (strings and symbols only)
//! 2. the processor chain, in declaration order, stopping on [`Flow::Halt`]
//! 3. the formatter
//! 4. the emitter
//!
//! Stages are fixed at construction and the recorder keeps no per-call
//! state, so one recorder can be shared between threads.

use conrad_core::{ComponentConfig, RecorderConfig};
use std::fmt;
use std::sync::Arc;

use crate::emitter::{Emitter, StdoutEmitter};
use crate::error::{ConfigurationError, RecordError, StageError};
use crate::event::{Event, RawEvent};
use crate::formatter::{Formatter, JsonFormatter};
use crate::processor::{Flow, Processor};
use crate::registry::Registry;
use crate::validator::validate_keys;

/// A stage supplied to the recorder: either ready to use, or a
/// configuration value to resolve through a [`Registry`].
pub enum Component<T: ?Sized> {
    Ready(Arc<T>),
    Config(ComponentConfig),
}

impl<T: ?Sized> Component<T> {
    fn resolve(
        self,
        resolve: impl FnOnce(&ComponentConfig) -> Result<Arc<T>, ConfigurationError>,
    ) -> Result<Arc<T>, ConfigurationError> {
        match self {
            Self::Ready(stage) => Ok(stage),
            Self::Config(config) => resolve(&config),
        }
    }
}

impl<T: ?Sized> From<ComponentConfig> for Component<T> {
    fn from(config: ComponentConfig) -> Self {
        Self::Config(config)
    }
}

impl<T: ?Sized> From<&str> for Component<T> {
    fn from(name: &str) -> Self {
        Self::Config(ComponentConfig::named(name))
    }
}

impl<T: ?Sized> Clone for Component<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(stage) => Self::Ready(Arc::clone(stage)),
            Self::Config(config) => Self::Config(config.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Component<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => write!(f, "Ready(..)"),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// Construction options for a [`Recorder`].
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    /// Applied in order. Empty by default.
    pub processors: Vec<Component<dyn Processor>>,
    /// Defaults to [`JsonFormatter`].
    pub formatter: Component<dyn Formatter>,
    /// Defaults to [`StdoutEmitter`].
    pub emitter: Component<dyn Emitter>,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            formatter: Component::Ready(Arc::new(JsonFormatter)),
            emitter: Component::Ready(Arc::new(StdoutEmitter)),
        }
    }
}

impl From<&RecorderConfig> for RecorderOptions {
    fn from(config: &RecorderConfig) -> Self {
        Self {
            processors: config.processors.iter().cloned().map(Component::from).collect(),
            formatter: config.formatter.clone().into(),
            emitter: config.emitter.clone().into(),
        }
    }
}

/// Records audit events through a processor chain, a formatter and an
/// emitter.
pub struct Recorder {
    processors: Vec<Arc<dyn Processor>>,
    formatter: Arc<dyn Formatter>,
    emitter: Arc<dyn Emitter>,
}

impl Recorder {
    /// Create a recorder, resolving configured components through
    /// [`Registry::builtin`].
    pub fn new(options: RecorderOptions) -> Result<Self, ConfigurationError> {
        Self::with_registry(options, &Registry::builtin())
    }

    /// Create a recorder, resolving configured components through `registry`.
    ///
    /// Processors are resolved in order and the first failure is reported;
    /// the formatter and the emitter are then checked on their own.
    pub fn with_registry(
        options: RecorderOptions,
        registry: &Registry,
    ) -> Result<Self, ConfigurationError> {
        let processors = options
            .processors
            .into_iter()
            .map(|component| component.resolve(|config| registry.processor(config)))
            .collect::<Result<Vec<_>, _>>()?;
        let formatter = options
            .formatter
            .resolve(|config| registry.formatter(config))?;
        let emitter = options.emitter.resolve(|config| registry.emitter(config))?;

        tracing::info!(processors = processors.len(), "Recorder configured");

        Ok(Self {
            processors,
            formatter,
            emitter,
        })
    }

    /// Create a recorder from a configuration file's contents.
    pub fn from_config(config: &RecorderConfig) -> Result<Self, ConfigurationError> {
        Self::new(RecorderOptions::from(config))
    }

    /// Start a [`RecorderBuilder`].
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::default()
    }

    /// Number of processors in the chain.
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Record an event.
    ///
    /// Fails with [`RecordError::ForbiddenKey`] before any processor runs if
    /// a key is not a string or symbol. Errors raised by a processor, the
    /// formatter or the emitter come back unchanged as
    /// [`RecordError::Stage`]. A halted chain returns `Ok(())` without
    /// formatting or emitting anything.
    pub fn audit_event(&self, event: impl Into<RawEvent>) -> Result<(), RecordError> {
        let event = validate_keys(event.into())?;

        let Some(event) = self.run_processors(event)? else {
            return Ok(());
        };

        let formatted = self.formatter.format(&event)?;
        self.emitter.emit(&formatted)?;

        tracing::debug!(fields = event.len(), "Audit event recorded");
        Ok(())
    }

    /// Fold the event through the chain. `None` means a processor halted.
    fn run_processors(&self, event: Event) -> Result<Option<Event>, StageError> {
        let mut current = event;

        for (index, processor) in self.processors.iter().enumerate() {
            match processor.process(current)? {
                Flow::Continue(next) => current = next,
                Flow::Halt => {
                    tracing::debug!(processor = index, "Processor chain halted");
                    return Ok(None);
                }
            }
        }

        Ok(Some(current))
    }
}

impl Default for Recorder {
    /// No processors, JSON to stdout.
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            formatter: Arc::new(JsonFormatter),
            emitter: Arc::new(StdoutEmitter),
        }
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("processors", &self.processors.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Recorder`].
#[derive(Debug, Default)]
pub struct RecorderBuilder {
    options: RecorderOptions,
    registry: Option<Registry>,
}

impl RecorderBuilder {
    /// Append a processor.
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.options
            .processors
            .push(Component::Ready(Arc::new(processor)));
        self
    }

    /// Append a processor resolved from configuration at build time.
    pub fn processor_config(mut self, config: impl Into<ComponentConfig>) -> Self {
        self.options
            .processors
            .push(Component::Config(config.into()));
        self
    }

    /// Set the formatter.
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.options.formatter = Component::Ready(Arc::new(formatter));
        self
    }

    /// Set a formatter resolved from configuration at build time.
    pub fn formatter_config(mut self, config: impl Into<ComponentConfig>) -> Self {
        self.options.formatter = Component::Config(config.into());
        self
    }

    /// Set the emitter.
    pub fn emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.options.emitter = Component::Ready(Arc::new(emitter));
        self
    }

    /// Set an emitter resolved from configuration at build time.
    pub fn emitter_config(mut self, config: impl Into<ComponentConfig>) -> Self {
        self.options.emitter = Component::Config(config.into());
        self
    }

    /// Resolve configured components through `registry` instead of
    /// [`Registry::builtin`].
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Resolve every configured component and build the recorder.
    pub fn build(self) -> Result<Recorder, ConfigurationError> {
        match self.registry {
            Some(registry) => Recorder::with_registry(self.options, &registry),
            None => Recorder::new(self.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{NullEmitter, WriterEmitter};
    use crate::error::Role;
    use crate::processor::{self, AddUuid};
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_default_recorder() {
        let recorder = Recorder::default();
        assert_eq!(recorder.processor_count(), 0);
        recorder.audit_event(Event::new().with("a", "apple")).unwrap();
    }

    #[test]
    fn test_builder_with_ready_components() {
        let recorder = Recorder::builder()
            .processor(AddUuid::new())
            .emitter(NullEmitter)
            .build()
            .unwrap();
        assert_eq!(recorder.processor_count(), 1);
        recorder.audit_event(Event::new().with("a", "apple")).unwrap();
    }

    #[test]
    fn test_builder_with_configured_components() {
        let recorder = Recorder::builder()
            .processor_config("add_uuid")
            .processor_config("add_timestamp")
            .formatter_config("pretty_json")
            .emitter_config("discard")
            .build()
            .unwrap();
        assert_eq!(recorder.processor_count(), 2);
    }

    #[test]
    fn test_from_config() {
        let config =
            RecorderConfig::from_yaml("processors: [add_uuid]\nemitter: null_emitter").unwrap();
        let err = Recorder::from_config(&config).unwrap_err();
        assert_eq!(err.role, Role::Emitter);
        assert!(err.to_string().contains("null_emitter"));
    }

    #[test]
    fn test_validation_reports_later_processor() {
        let err = Recorder::builder()
            .processor(AddUuid::new())
            .processor_config("add_uuid")
            .processor_config("bad processor")
            .build()
            .unwrap_err();

        assert_eq!(err.role, Role::Processor);
        assert_eq!(err.value, "bad processor");
    }

    #[test]
    fn test_custom_registry_is_used() {
        let err = Recorder::builder()
            .processor_config("add_uuid")
            .registry(Registry::empty())
            .build()
            .unwrap_err();
        assert_eq!(err.role, Role::Processor);

        // Ready components need no registry
        Recorder::builder()
            .registry(Registry::empty())
            .emitter(NullEmitter)
            .build()
            .unwrap();
    }

    #[test]
    fn test_processor_receives_previous_output() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let recorder = Recorder::builder()
            .processor(processor::map(|event| event.with("first", 1)))
            .processor(processor::from_fn(|event: Event| {
                let first = event.field("first").cloned().unwrap_or(json!(null));
                Ok(Flow::Continue(event.with("second", first)))
            }))
            .formatter(crate::formatter::from_fn(move |event| {
                *sink.lock().unwrap() = Some(event.clone());
                Ok(String::new())
            }))
            .emitter(NullEmitter)
            .build()
            .unwrap();

        recorder.audit_event(Event::new()).unwrap();

        let event = seen.lock().unwrap().clone().unwrap();
        assert_eq!(event.field("second"), Some(&json!(1)));
    }

    #[test]
    fn test_recorder_is_reusable_after_failure() {
        let emitter = Arc::new(WriterEmitter::new(Vec::new()));
        let target = emitter.clone();

        let recorder = Recorder::builder()
            .processor(processor::from_fn(|event: Event| {
                if event.field("fail").is_some() {
                    anyhow::bail!("processor failed");
                }
                Ok(Flow::Continue(event))
            }))
            .emitter(crate::emitter::from_fn(move |formatted| target.emit(formatted)))
            .build()
            .unwrap();

        assert!(recorder.audit_event(Event::new().with("fail", true)).is_err());
        recorder.audit_event(Event::new().with("ok", true)).unwrap();

        let written = emitter
            .with_writer(|buffer| String::from_utf8(buffer.clone()).unwrap())
            .unwrap();
        assert_eq!(written, "{\"ok\":true}\n");
    }

    #[test]
    fn test_recorder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recorder>();
    }
}
