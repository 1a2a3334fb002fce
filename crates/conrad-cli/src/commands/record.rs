//! `conrad record` command implementation.
//!
//! Input is either:
//! - a YAML stream (JSON is valid YAML): each document is one event, or a
//!   list of events
//! - JSON Lines: one JSON object per line

use anyhow::{Context, Result};
use conrad_recorder::{RawEvent, Recorder};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use super::RecorderArgs;

pub fn run(file: Option<&Path>, args: &RecorderArgs) -> Result<()> {
    let config = args.resolve()?;
    let recorder = Recorder::from_config(&config)?;

    let input = read_input(file)?;
    let events = parse_events(&input)?;
    let total = events.len();

    let mut failed = 0usize;
    for (index, event) in events.into_iter().enumerate() {
        let recorded = event.and_then(|event| Ok(recorder.audit_event(event)?));
        if let Err(e) = recorded {
            tracing::warn!(event = index, error = %e, "Failed to record event");
            failed += 1;
        }
    }

    tracing::info!(total, failed, "Recording finished");

    if failed > 0 {
        anyhow::bail!("{} of {} events could not be recorded", failed, total);
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read events from {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read events from stdin")?;
            Ok(input)
        }
    }
}

/// Parse every event in `input`.
///
/// Only unreadable input fails the whole call. A document or line that is not
/// an event becomes a failed entry, so the events around it are still
/// recorded.
pub fn parse_events(input: &str) -> Result<Vec<Result<RawEvent>>> {
    if is_json_lines(input) {
        return Ok(input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                let value = serde_json::from_str(line)
                    .with_context(|| format!("Invalid JSON on line {}", index + 1))?;
                RawEvent::from_json(value)
                    .with_context(|| format!("Invalid event on line {}", index + 1))
            })
            .collect());
    }

    let mut events = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value = serde_yaml::Value::deserialize(document).context("Invalid YAML input")?;
        let event = |value| {
            RawEvent::from_yaml(value)
                .with_context(|| format!("Invalid event in document {}", index + 1))
        };
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(items) => events.extend(items.into_iter().map(event)),
            other => events.push(event(other)),
        }
    }

    Ok(events)
}

/// More than one non-empty line, each holding a JSON object.
fn is_json_lines(input: &str) -> bool {
    let mut lines = input.lines().map(str::trim).filter(|line| !line.is_empty());
    let count = lines.clone().count();
    count > 1 && lines.all(|line| line.starts_with('{') && line.ends_with('}'))
}
