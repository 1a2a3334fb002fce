//! # conrad-core
//!
//! Configuration types shared across Conrad crates.
//!
//! A recorder is described by a [`RecorderConfig`]: an ordered list of
//! processors, one formatter and one emitter. Each of them is a
//! [`ComponentConfig`], which is untyped on purpose: it names a component
//! that `conrad-recorder` resolves (and validates) when the recorder is
//! constructed.

pub mod config;

pub use config::{ComponentConfig, ConfigError, RecorderConfig, TimestampUnit};
