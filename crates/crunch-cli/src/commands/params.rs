//! List parameters and distortion types.

use crunch_core::{DistortionVariant, ParamId};

pub fn run() -> anyhow::Result<()> {
    println!("Parameters:");
    println!("===========");
    for id in ParamId::ALL {
        let range = if id.is_boolean() { "on/off" } else { "0.0 - 1.0" };
        println!(
            "  {:12} {:10} default {:.2}  ({})",
            id.id(),
            id.name(),
            id.default_value(),
            range
        );
    }
    println!();

    println!("Distortion types:");
    println!("=================");
    for variant in DistortionVariant::ALL {
        let default = if variant == DistortionVariant::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {variant}{default}");
    }

    Ok(())
}
