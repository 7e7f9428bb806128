//! Error type for processor setup and block processing.

use thiserror::Error;

/// Errors returned by [`SignalProcessor`](crate::SignalProcessor).
///
/// Every variant is host misuse; none can be produced by the signal itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// `process` was called before `initialize`
    #[error("processor used before initialize()")]
    NotInitialized,

    /// Sample rate is zero, negative or not finite
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Maximum block size of zero
    #[error("maximum block size must be greater than zero")]
    InvalidBlockSize,

    /// Block longer than the size given to `initialize`
    #[error("block of {len} samples exceeds the initialized maximum of {max}")]
    BlockTooLarge {
        /// Length of the offending block.
        len: usize,
        /// Maximum block size the processor was initialized with.
        max: usize,
    },

    /// More channels than the processor was built for
    #[error("{got} channels supplied, processor supports at most {max}")]
    TooManyChannels {
        /// Channels supplied.
        got: usize,
        /// Channels supported.
        max: usize,
    },

    /// Channels of one block differ in length
    #[error("channel length mismatch: expected {expected} samples, got {got}")]
    ChannelLengthMismatch {
        /// Length of the first channel.
        expected: usize,
        /// Length of the mismatching channel.
        got: usize,
    },
}
