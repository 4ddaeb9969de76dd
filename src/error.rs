//! Error types for the watermarking codec.
//!
//! Every failure is reported before the raster is touched or any random
//! number is drawn, so an `Err` never comes with a partially marked image.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    /// More bits were requested than the selected (pixel, channel) pairs hold.
    #[error("capacity exceeded: need {required} bits, only {available} available")]
    CapacityExceeded { required: usize, available: usize },

    #[error("unknown pattern kind: {0:?}")]
    UnknownPattern(String),

    #[error("unknown parameter: {0:?}")]
    UnknownParameter(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Sample buffer length does not match the declared raster shape.
    #[error("dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Two rasters that must share a shape do not.
    #[error("shape mismatch: expected {expected_height}x{expected_width}, got {actual_height}x{actual_width}")]
    ShapeMismatch {
        expected_height: usize,
        expected_width: usize,
        actual_height: usize,
        actual_width: usize,
    },

    #[error("{height}x{width} raster exceeds the image size limit")]
    RasterTooLarge { height: usize, width: usize },

    #[error("pixel ({row}, {col}) lies outside the {height}x{width} raster")]
    PositionOutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    #[error("channel index {channel} out of range for {channels}-channel raster")]
    ChannelOutOfRange { channel: usize, channels: usize },

    #[error("identifier {id} does not fit in the payload (max {max})")]
    IdentifierOutOfRange { id: u32, max: u32 },

    #[error("malformed parameters: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;
