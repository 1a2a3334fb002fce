//! Component registry.
//!
//! Configuration files describe processors, formatters and emitters as
//! untyped values ([`ComponentConfig`]). The registry is where those values
//! are checked: a name that was never registered, options a factory refuses,
//! or a plain literal all fail with a [`ConfigurationError`] naming the role
//! and the offending value.

use conrad_core::{ComponentConfig, TimestampUnit};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::emitter::{Emitter, FileEmitter, NullEmitter, StderrEmitter, StdoutEmitter};
use crate::error::{ConfigurationError, Role};
use crate::event::Key;
use crate::formatter::{Formatter, JsonFormatter, PrettyJsonFormatter};
use crate::processor::{AddTimestamp, AddUuid, Processor};

/// Options passed to a component factory.
pub type Options = Map<String, Value>;

/// Builds a component from its options, or explains why it cannot.
pub type Factory<T> = Arc<dyn Fn(&Options) -> Result<Arc<T>, String> + Send + Sync>;

/// Named factories for every component role.
#[derive(Clone, Default)]
pub struct Registry {
    processors: HashMap<String, Factory<dyn Processor>>,
    formatters: HashMap<String, Factory<dyn Formatter>>,
    emitters: HashMap<String, Factory<dyn Emitter>>,
}

impl Registry {
    /// A registry with no components at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the built-in components:
    ///
    /// | Role | Name | Options |
    /// |------|------|---------|
    /// | processor | `add_uuid` | `key` |
    /// | processor | `add_timestamp` | `unit` (`seconds`/`milliseconds`), `key` |
    /// | formatter | `json` | |
    /// | formatter | `pretty_json` | |
    /// | emitter | `stdout` | |
    /// | emitter | `stderr` | |
    /// | emitter | `file` | `path` (required) |
    /// | emitter | `discard` | |
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.register_processor("add_uuid", |options| {
            let options: AddUuidOptions = parse_options(options)?;
            let processor = match options.key {
                Some(key) => AddUuid::with_key(Key::symbol(key)),
                None => AddUuid::new(),
            };
            Ok(Arc::new(processor) as Arc<dyn Processor>)
        });
        registry.register_processor("add_timestamp", |options| {
            let options: AddTimestampOptions = parse_options(options)?;
            let mut processor = AddTimestamp::with_unit(options.unit);
            if let Some(key) = options.key {
                processor = processor.key(Key::symbol(key));
            }
            Ok(Arc::new(processor) as Arc<dyn Processor>)
        });

        registry.register_formatter("json", |options| {
            parse_options::<NoOptions>(options)?;
            Ok(Arc::new(JsonFormatter) as Arc<dyn Formatter>)
        });
        registry.register_formatter("pretty_json", |options| {
            parse_options::<NoOptions>(options)?;
            Ok(Arc::new(PrettyJsonFormatter) as Arc<dyn Formatter>)
        });

        registry.register_emitter("stdout", |options| {
            parse_options::<NoOptions>(options)?;
            Ok(Arc::new(StdoutEmitter) as Arc<dyn Emitter>)
        });
        registry.register_emitter("stderr", |options| {
            parse_options::<NoOptions>(options)?;
            Ok(Arc::new(StderrEmitter) as Arc<dyn Emitter>)
        });
        registry.register_emitter("discard", |options| {
            parse_options::<NoOptions>(options)?;
            Ok(Arc::new(NullEmitter) as Arc<dyn Emitter>)
        });
        registry.register_emitter("file", |options| {
            let options: FileOptions = parse_options(options)?;
            let emitter = FileEmitter::new(&options.path)
                .map_err(|e| format!("cannot open '{}': {}", options.path, e))?;
            Ok(Arc::new(emitter) as Arc<dyn Emitter>)
        });

        registry
    }

    /// Register a processor factory, replacing any with the same name.
    pub fn register_processor<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Arc<dyn Processor>, String> + Send + Sync + 'static,
    {
        self.processors.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register a formatter factory, replacing any with the same name.
    pub fn register_formatter<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Arc<dyn Formatter>, String> + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register an emitter factory, replacing any with the same name.
    pub fn register_emitter<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Arc<dyn Emitter>, String> + Send + Sync + 'static,
    {
        self.emitters.insert(name.into(), Arc::new(factory));
        self
    }

    /// Resolve a configured processor.
    pub fn processor(
        &self,
        component: &ComponentConfig,
    ) -> Result<Arc<dyn Processor>, ConfigurationError> {
        resolve(&self.processors, Role::Processor, component)
    }

    /// Resolve a configured formatter.
    pub fn formatter(
        &self,
        component: &ComponentConfig,
    ) -> Result<Arc<dyn Formatter>, ConfigurationError> {
        resolve(&self.formatters, Role::Formatter, component)
    }

    /// Resolve a configured emitter.
    pub fn emitter(
        &self,
        component: &ComponentConfig,
    ) -> Result<Arc<dyn Emitter>, ConfigurationError> {
        resolve(&self.emitters, Role::Emitter, component)
    }

    /// Registered names for a role, sorted.
    pub fn names(&self, role: Role) -> Vec<&str> {
        let mut names: Vec<&str> = match role {
            Role::Processor => self.processors.keys().map(String::as_str).collect(),
            Role::Formatter => self.formatters.keys().map(String::as_str).collect(),
            Role::Emitter => self.emitters.keys().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("processors", &self.names(Role::Processor))
            .field("formatters", &self.names(Role::Formatter))
            .field("emitters", &self.names(Role::Emitter))
            .finish()
    }
}

fn resolve<T: ?Sized>(
    factories: &HashMap<String, Factory<T>>,
    role: Role,
    component: &ComponentConfig,
) -> Result<Arc<T>, ConfigurationError> {
    let Some(name) = component.name() else {
        return Err(ConfigurationError::new(
            role,
            component,
            format!("not a {} name or {{ type: ... }} map", role),
        ));
    };

    let factory = factories.get(name).ok_or_else(|| {
        ConfigurationError::new(
            role,
            component,
            format!("no {} registered under this name", role),
        )
    })?;

    factory(&component.options())
        .map_err(|reason| ConfigurationError::new(role, component, reason))
}

fn parse_options<T: DeserializeOwned>(options: &Options) -> Result<T, String> {
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|e| format!("invalid options: {}", e))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddUuidOptions {
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddTimestampOptions {
    #[serde(default)]
    unit: TimestampUnit,
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileOptions {
    path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::processor::Flow;
    use serde_json::json;

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        assert_eq!(registry.names(Role::Processor), vec!["add_timestamp", "add_uuid"]);
        assert_eq!(registry.names(Role::Formatter), vec!["json", "pretty_json"]);
        assert_eq!(
            registry.names(Role::Emitter),
            vec!["discard", "file", "stderr", "stdout"]
        );
    }

    #[test]
    fn test_resolve_named_processor() {
        let registry = Registry::builtin();
        let processor = registry.processor(&ComponentConfig::named("add_uuid")).unwrap();

        match processor.process(Event::new()).unwrap() {
            Flow::Continue(event) => assert!(event.field("event_uuid").is_some()),
            Flow::Halt => panic!("add_uuid halted"),
        }
    }

    #[test]
    fn test_resolve_processor_with_options() {
        let registry = Registry::builtin();
        let component = ComponentConfig::with_options(
            "add_timestamp",
            options(json!({"unit": "seconds", "key": "ts"})),
        );
        let processor = registry.processor(&component).unwrap();

        match processor.process(Event::new()).unwrap() {
            Flow::Continue(event) => {
                let ts = event.get(&Key::symbol("ts")).and_then(Value::as_i64).unwrap();
                // Seconds, not milliseconds
                assert!(ts < 100_000_000_000);
            }
            Flow::Halt => panic!("add_timestamp halted"),
        }
    }

    #[test]
    fn test_unknown_name() {
        let registry = Registry::builtin();
        let err = registry
            .formatter(&ComponentConfig::named("bad formatter"))
            .err().expect("expected an error");

        assert_eq!(err.role, Role::Formatter);
        assert_eq!(err.value, "bad formatter");
        assert!(err.to_string().contains("bad formatter"));
    }

    #[test]
    fn test_literal_is_rejected() {
        let registry = Registry::builtin();
        let err = registry
            .emitter(&ComponentConfig::Literal(json!(42)))
            .err().expect("expected an error");

        assert_eq!(err.role, Role::Emitter);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let registry = Registry::builtin();

        let unknown_option =
            ComponentConfig::with_options("add_uuid", options(json!({"colour": "red"})));
        let err = registry.processor(&unknown_option).err().expect("expected an error");
        assert!(err.reason.contains("invalid options"));

        let missing_path = ComponentConfig::named("file");
        assert!(registry.emitter(&missing_path).is_err());

        let bad_unit =
            ComponentConfig::with_options("add_timestamp", options(json!({"unit": "days"})));
        assert!(registry.processor(&bad_unit).is_err());
    }

    #[test]
    fn test_file_emitter_from_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let component = ComponentConfig::with_options(
            "file",
            options(json!({"path": path.to_str().unwrap()})),
        );

        let emitter = Registry::builtin().emitter(&component).unwrap();
        emitter.emit("line").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_register_custom_component() {
        let mut registry = Registry::empty();
        registry.register_formatter("keys", |_| {
            Ok(Arc::new(crate::formatter::from_fn(|event| {
                Ok(event.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(","))
            })) as Arc<dyn Formatter>)
        });

        let formatter = registry.formatter(&ComponentConfig::named("keys")).unwrap();
        let event = Event::new().with("a", 1).with("b", 2);
        assert_eq!(formatter.format(&event).unwrap(), "a,b");

        // Empty registry knows nothing else
        assert!(registry.formatter(&ComponentConfig::named("json")).is_err());
    }
}
