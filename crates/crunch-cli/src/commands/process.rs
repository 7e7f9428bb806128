//! Offline file processing.

use super::common::{load_preset, parse_key_val, parse_param};
use crate::wav::{read_channels, write_channels};
use clap::Args;
use crunch_config::{MAX_CHANNELS, ProcessorConfig, build_processor};
use crunch_core::DistortionVariant;
use crunch_core::math::peak;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or path to a preset file
    #[arg(short, long)]
    preset: Option<String>,

    /// Directory of user presets searched by --preset
    #[arg(long)]
    preset_dir: Option<PathBuf>,

    /// Distortion type (overdrive, distortion, fuzz, saturation)
    #[arg(short = 't', long = "type")]
    variant: Option<String>,

    /// Parameter override, e.g. --param drive=0.8 (repeatable)
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Enable 2x oversampling
    #[arg(long)]
    oversample: bool,

    /// Processor configuration file (TOML); sample rate and channels follow the input
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Block size for processing
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24 or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (mut buffers, spec) = read_channels(&args.input)?;
    let frames = buffers.first().map_or(0, Vec::len);

    println!(
        "  {} Hz, {} channel(s), {} samples ({:.2}s)",
        spec.sample_rate,
        buffers.len(),
        frames,
        frames as f32 / spec.sample_rate as f32
    );

    if buffers.len() > MAX_CHANNELS {
        anyhow::bail!(
            "{} channels in input, at most {MAX_CHANNELS} are supported",
            buffers.len()
        );
    }

    let mut config = match &args.config {
        Some(path) => ProcessorConfig::load(path)?,
        None => ProcessorConfig::default(),
    };
    config.sample_rate = spec.sample_rate as f32;
    config.channels = buffers.len();
    if let Some(block_size) = args.block_size {
        config.max_block_size = block_size;
    }
    let block_size = config.max_block_size;
    let mut processor = build_processor(&config)?;

    if let Some(name) = &args.preset {
        let preset = load_preset(name, args.preset_dir.as_deref())?;
        println!("Loading preset: {}", preset.name);
        processor.apply_parameters(&preset.to_parameters(&processor.parameters()));
    }

    if let Some(name) = &args.variant {
        let variant: DistortionVariant = name.parse()?;
        processor.set_variant(variant);
    }

    for (key, value) in &args.param {
        let (id, value) = parse_param(key, value)?;
        processor.set_param(id, value);
    }

    if args.oversample {
        processor.set_oversampling(true);
    }

    let params = processor.parameters();
    tracing::debug!(?params, block_size, "processing");
    println!(
        "Processing: {} (drive {:.2}, tone {:.2}, output {:.2}, mix {:.2}, depth {:.2}){}",
        params.variant,
        params.drive,
        params.tone,
        params.output,
        params.mix,
        params.depth,
        if params.oversample { ", 2x oversampled" } else { "" }
    );

    // Pad by the reported latency so the delayed tail is kept, then trim
    // the same amount from the front.
    let latency = processor.latency();
    for buffer in &mut buffers {
        buffer.resize(frames + latency, 0.0);
    }
    let total = frames + latency;

    let input_peak = buffers.iter().map(|b| peak(&b[..frames])).fold(0.0, f32::max);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut offset = 0;
    while offset < total {
        let end = (offset + block_size).min(total);
        let mut block: Vec<&mut [f32]> = buffers
            .iter_mut()
            .map(|buffer| &mut buffer[offset..end])
            .collect();
        processor.process(&mut block)?;
        offset = end;
        pb.set_position(offset as u64);
    }

    pb.finish_with_message("done");

    for buffer in &mut buffers {
        buffer.drain(..latency);
    }

    let output_peak = buffers.iter().map(|b| peak(b)).fold(0.0, f32::max);

    println!("\nStats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dB", linear_to_db(output_peak));
    if latency > 0 {
        println!("  Latency compensated: {latency} samples");
    }
    let flushed = processor.non_finite_count();
    if flushed > 0 {
        println!("  Non-finite samples flushed: {flushed}");
    }

    println!("\nWriting {}...", args.output.display());
    write_channels(&args.output, &buffers, spec.sample_rate, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-10).log10()
}
