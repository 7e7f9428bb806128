//! Preset management commands.
//!
//! Lists, shows, saves and deletes presets. User presets live in the
//! directory passed with `--preset-dir`.

use super::common::{library, load_preset, parse_key_val, parse_param};
use clap::{Args, Subcommand};
use crunch_config::{FACTORY_CATEGORY, Preset, PresetLibrary, USER_CATEGORY};
use crunch_core::{DistortionVariant, EffectParameters};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Directory of user presets
        #[arg(long)]
        preset_dir: Option<PathBuf>,

        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,

        /// Directory of user presets
        #[arg(long)]
        preset_dir: Option<PathBuf>,
    },

    /// Save settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Directory of user presets
        #[arg(long)]
        preset_dir: PathBuf,

        /// Distortion type (overdrive, distortion, fuzz, saturation)
        #[arg(short = 't', long = "type", default_value = "overdrive")]
        variant: String,

        /// Parameter value, e.g. --param drive=0.8 (repeatable)
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,

        /// Record 2x oversampling in the preset
        #[arg(long)]
        oversample: bool,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Delete a user preset
    Delete {
        /// Preset name to delete
        name: String,

        /// Directory of user presets
        #[arg(long)]
        preset_dir: PathBuf,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List {
            preset_dir,
            factory,
            user,
        } => list_presets(&library(preset_dir.as_deref()), factory, user),
        PresetsCommand::Show { name, preset_dir } => {
            show_preset(&load_preset(&name, preset_dir.as_deref())?)
        }
        PresetsCommand::Save {
            name,
            preset_dir,
            variant,
            param,
            oversample,
            force,
        } => {
            let variant: DistortionVariant = variant.parse()?;
            let mut params = EffectParameters {
                variant,
                ..EffectParameters::default()
            };
            for (key, value) in &param {
                let (id, value) = parse_param(key, value)?;
                params.set(id, value);
            }

            let mut preset = Preset::from_processor_state(&name, USER_CATEGORY, &params);
            if oversample || params.oversample {
                preset = preset.with_oversample(true);
            }

            let mut library = PresetLibrary::with_user_dir(preset_dir);
            if !force && library.get(&name).is_some() {
                anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
            }
            let path = library.save_user(&preset)?;
            println!("Saved preset '{name}' to {}", path.display());
            Ok(())
        }
        PresetsCommand::Delete { name, preset_dir } => {
            let mut library = PresetLibrary::with_user_dir(preset_dir);
            library.delete_user(&name)?;
            println!("Deleted preset '{name}'");
            Ok(())
        }
    }
}

fn list_presets(library: &PresetLibrary, factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    for category in library.categories() {
        if factory_only && category != FACTORY_CATEGORY {
            continue;
        }
        if user_only && category == FACTORY_CATEGORY {
            continue;
        }

        println!("{category} Presets:");
        println!("{}", "=".repeat(category.len() + 9));
        for preset in library.by_category(category) {
            let oversample = if preset.oversample == Some(true) {
                ", 2x"
            } else {
                ""
            };
            println!("  {:20} ({}{oversample})", preset.name, preset.variant);
        }
        println!();
    }

    if user_only && library.by_category(USER_CATEGORY).next().is_none() {
        match library.user_dir() {
            Some(dir) => println!("No user presets in {}", dir.display()),
            None => println!("No user presets (pass --preset-dir)"),
        }
    }

    Ok(())
}

fn show_preset(preset: &Preset) -> anyhow::Result<()> {
    let p = &preset.parameters;
    println!("Preset: {}", preset.name);
    println!("Category: {}", preset.category);
    println!("Type: {}", preset.variant);
    println!(
        "Oversample: {}",
        match preset.oversample {
            Some(true) => "on",
            Some(false) => "off",
            None => "unset",
        }
    );
    println!();
    println!("Parameters:");
    println!("  drive   {:.4}", p.drive);
    println!("  tone    {:.4}", p.tone);
    println!("  output  {:.4}", p.output);
    println!("  mix     {:.4}", p.mix);
    println!("  depth   {:.4}", p.depth);
    println!("  attack  {:.4}", p.attack);
    println!();
    println!("JSON:");
    println!("{}", preset.to_json()?);
    Ok(())
}
