//! Multichannel WAV reading and writing.
//!
//! Samples are de-interleaved into one `Vec<f32>` per channel so they can be
//! handed to the processor as channel slices.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Read a WAV file as one buffer per channel, normalized to \[-1, 1\].
pub fn read_channels(path: &Path) -> anyhow::Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (buffer, &sample) in out.iter_mut().zip(frame) {
            buffer.push(sample);
        }
    }

    Ok((out, spec))
}

/// Write per-channel buffers as an interleaved WAV file.
///
/// 32-bit output is IEEE float, 16 and 24-bit output is PCM.
pub fn write_channels(
    path: &Path,
    channels: &[Vec<f32>],
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    if !matches!(bits_per_sample, 16 | 24 | 32) {
        anyhow::bail!("unsupported bit depth {bits_per_sample} (use 16, 24 or 32)");
    }

    let spec = WavSpec {
        channels: u16::try_from(channels.len())?,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("failed to create {}", path.display()))?;

    let frames = channels.first().map_or(0, Vec::len);
    let max_val = (1i64 << (bits_per_sample - 1)) as f32;
    for i in 0..frames {
        for channel in channels {
            let sample = channel[i];
            if bits_per_sample == 32 {
                writer.write_sample(sample)?;
            } else {
                writer.write_sample((sample * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
