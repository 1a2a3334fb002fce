//! Key validation for incoming events.

use crate::error::ForbiddenKeyError;
use crate::event::{Event, RawEvent};

/// Validate every key of an incoming event.
///
/// Only string and symbol keys are allowed. The first offending key fails
/// the whole event. Duplicate keys collapse to the last value.
pub fn validate_keys(event: RawEvent) -> Result<Event, ForbiddenKeyError> {
    let mut validated = Event::new();

    for (key, value) in event.into_entries() {
        match key.into_key() {
            Ok(key) => {
                validated.insert(key, value);
            }
            Err(key) => return Err(ForbiddenKeyError { key }),
        }
    }

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, RawKey, Symbol};
    use serde_json::json;

    #[test]
    fn test_accepts_strings_and_symbols() {
        let raw = RawEvent::new()
            .with("a", "apple")
            .with(Symbol::new("b"), "bear");
        let event = validate_keys(raw).unwrap();

        assert_eq!(event.get(&Key::text("a")), Some(&json!("apple")));
        assert_eq!(event.get(&Key::symbol("b")), Some(&json!("bear")));
    }

    #[test]
    fn test_rejects_non_identifier_keys() {
        let forbidden = vec![
            RawKey::Integer(1),
            RawKey::Float(1.5),
            RawKey::Bool(true),
            RawKey::Null,
            RawKey::from(vec![1, 2, 3]),
            RawKey::Mapping(vec![]),
            RawKey::object(&RawEvent::new()),
        ];

        for key in forbidden {
            let raw = RawEvent::new().with("ok", 1).with(key.clone(), "");
            let err = validate_keys(raw).unwrap_err();
            assert_eq!(err.key, key);
        }
    }

    #[test]
    fn test_reports_first_offending_key() {
        let raw = RawEvent::new()
            .with(RawKey::Integer(1), "")
            .with(RawKey::Integer(2), "");
        assert_eq!(validate_keys(raw).unwrap_err().key, RawKey::Integer(1));
    }

    #[test]
    fn test_validates_large_events() {
        let raw: RawEvent = (0..50_000).map(|i| (format!("k{}", i), i)).collect();
        let event = validate_keys(raw).unwrap();

        assert_eq!(event.len(), 50_000);
        assert_eq!(event.get(&Key::text("k49999")), Some(&json!(49999)));
    }

    #[test]
    fn test_empty_event_is_valid() {
        assert!(validate_keys(RawEvent::new()).unwrap().is_empty());
    }
}
