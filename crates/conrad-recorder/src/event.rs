//! Event types.
//!
//! Two representations exist:
//! - [`RawEvent`]: what callers hand to the recorder. Its keys are dynamic
//!   ([`RawKey`]) because events may come from untyped sources such as YAML
//!   documents, where a key can be a number, a list or even a map.
//! - [`Event`]: a validated, ordered mapping from [`Key`] to JSON values.
//!   This is what processors, formatters and emitters see.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::EventError;

/// An atomic symbolic identifier, e.g. `:event_uuid`.
///
/// Symbols and strings with the same name are different keys, but both
/// serialize as their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A validated event key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Text(String),
    Symbol(Symbol),
}

impl Key {
    pub fn text(name: impl Into<String>) -> Self {
        Self::Text(name.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(Symbol::new(name))
    }

    /// The key's name, regardless of its kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(name) => name,
            Self::Symbol(symbol) => symbol.as_str(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(name) => write!(f, "{}", name),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::text(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Text(name)
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

/// A key as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawKey {
    Text(String),
    Symbol(Symbol),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    Sequence(Vec<RawKey>),
    Mapping(Vec<(RawKey, RawKey)>),
    /// An arbitrary object, identified by its type name.
    Object(String),
}

impl RawKey {
    /// Use an arbitrary value as a key. Only its type name is kept.
    pub fn object<T: ?Sized>(_value: &T) -> Self {
        Self::Object(std::any::type_name::<T>().to_string())
    }

    /// The validated key, if this is a string or a symbol.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            Self::Text(name) => Some(Key::Text(name.clone())),
            Self::Symbol(symbol) => Some(Key::Symbol(symbol.clone())),
            _ => None,
        }
    }

    pub fn into_key(self) -> Result<Key, Self> {
        match self {
            Self::Text(name) => Ok(Key::Text(name)),
            Self::Symbol(symbol) => Ok(Key::Symbol(symbol)),
            other => Err(other),
        }
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(name) => write!(f, "{:?}", name),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Null => write!(f, "null"),
            Self::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Mapping(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Self::Object(type_name) => write!(f, "#<{}>", type_name),
        }
    }
}

impl From<&str> for RawKey {
    fn from(name: &str) -> Self {
        Self::Text(name.to_string())
    }
}

impl From<String> for RawKey {
    fn from(name: String) -> Self {
        Self::Text(name)
    }
}

impl From<Symbol> for RawKey {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<Key> for RawKey {
    fn from(key: Key) -> Self {
        match key {
            Key::Text(name) => Self::Text(name),
            Key::Symbol(symbol) => Self::Symbol(symbol),
        }
    }
}

impl From<i64> for RawKey {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for RawKey {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for RawKey {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for RawKey {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<RawKey>> From<Vec<T>> for RawKey {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// YAML keys map one-to-one, except `!symbol name` which becomes a symbol.
impl From<serde_yaml::Value> for RawKey {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Self::Text(s),
            Yaml::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Yaml::Mapping(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Self::from(k), Self::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => {
                let tagged = *tagged;
                match tagged.value {
                    Yaml::String(name) if tagged.tag == "symbol" => Self::Symbol(Symbol::new(name)),
                    _ => Self::Object(tagged.tag.to_string()),
                }
            }
        }
    }
}

/// An event as supplied by the caller: ordered entries with unvalidated keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    entries: Vec<(RawKey, Value)>,
}

impl RawEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<RawKey>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<RawKey>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(RawKey, Value)> {
        self.entries.iter()
    }

    /// Build an event from a YAML mapping.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, EventError> {
        use serde_yaml::Value as Yaml;

        let mapping = match value {
            Yaml::Mapping(mapping) => mapping,
            Yaml::Null => return Err(EventError::NotAMapping("null")),
            Yaml::Bool(_) => return Err(EventError::NotAMapping("a boolean")),
            Yaml::Number(_) => return Err(EventError::NotAMapping("a number")),
            Yaml::String(_) => return Err(EventError::NotAMapping("a string")),
            Yaml::Sequence(_) => return Err(EventError::NotAMapping("a sequence")),
            Yaml::Tagged(_) => return Err(EventError::NotAMapping("a tagged value")),
        };

        Ok(mapping
            .into_iter()
            .map(|(key, value)| (RawKey::from(key), yaml_to_json(value)))
            .collect())
    }

    /// Build an event from a JSON object.
    pub fn from_json(value: Value) -> Result<Self, EventError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Err(EventError::NotAMapping("null")),
            Value::Bool(_) => Err(EventError::NotAMapping("a boolean")),
            Value::Number(_) => Err(EventError::NotAMapping("a number")),
            Value::String(_) => Err(EventError::NotAMapping("a string")),
            Value::Array(_) => Err(EventError::NotAMapping("an array")),
        }
    }

    pub(crate) fn into_entries(self) -> Vec<(RawKey, Value)> {
        self.entries
    }
}

/// Convert a YAML value into JSON.
///
/// Nested mapping keys that are not strings are rendered with the
/// [`RawKey`] display form, so `{[1, 2]: x}` becomes `{"[1, 2]": "x"}`.
/// Tagged values become a single-entry object keyed by the tag.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match RawKey::from(key) {
                        RawKey::Text(name) => name,
                        other => other.to_string(),
                    };
                    (key, yaml_to_json(value))
                })
                .collect(),
        ),
        Yaml::Tagged(tagged) => {
            let tagged = *tagged;
            let mut object = Map::new();
            object.insert(tagged.tag.to_string(), yaml_to_json(tagged.value));
            Value::Object(object)
        }
    }
}

impl<K: Into<RawKey>, V: Into<Value>> FromIterator<(K, V)> for RawEvent {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        event.into_iter().collect()
    }
}

impl From<&Event> for RawEvent {
    fn from(event: &Event) -> Self {
        event.clone().into()
    }
}

impl From<&RawEvent> for RawEvent {
    fn from(event: &RawEvent) -> Self {
        event.clone()
    }
}

/// A validated event: an ordered mapping from [`Key`] to JSON values.
///
/// Inserting an existing key replaces its value in place, so insertion
/// order is the order in which keys first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    entries: IndexMap<Key, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a value by name, matching string and symbol keys alike.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Shallow merge: entries of `other` are inserted over this event's.
    pub fn merge(mut self, other: Event) -> Event {
        for (key, value) in other {
            self.insert(key, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    /// Convert to a JSON object. Keys that share a name collapse to the
    /// last value.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.clone()))
                .collect(),
        )
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl IntoIterator for Event {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Event {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
