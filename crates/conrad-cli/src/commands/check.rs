//! `conrad check` command implementation.
//!
//! Builds a recorder from the configuration, which validates every
//! processor, the formatter and the emitter, then lists what the registry
//! provides.

use anyhow::Result;
use conrad_recorder::{Recorder, Registry, Role};

use super::RecorderArgs;

pub fn run(args: &RecorderArgs) -> Result<()> {
    let registry = Registry::builtin();
    let config = args.resolve()?;

    match Recorder::with_registry((&config).into(), &registry) {
        Ok(recorder) => {
            println!(
                "✓ configuration is valid ({} processor(s), formatter '{}', emitter '{}')",
                recorder.processor_count(),
                config.formatter,
                config.emitter
            );
        }
        Err(e) => {
            println!("✗ {}", e);
            print_components(&registry);
            anyhow::bail!("invalid configuration");
        }
    }

    print_components(&registry);
    Ok(())
}

fn print_components(registry: &Registry) {
    println!();
    for (label, role) in [
        ("Processors", Role::Processor),
        ("Formatters", Role::Formatter),
        ("Emitters", Role::Emitter),
    ] {
        println!("{}: {}", label, registry.names(role).join(", "));
    }
}
