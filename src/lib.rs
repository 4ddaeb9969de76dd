//! Spatial-domain LSB watermarking.
//!
//! A carrier key seeds a PCG generator that picks distinct pixels; watermark
//! bits go into the least significant bit of chosen channels of those pixels.
//! Two schemes share that machinery:
//!
//! - [`embed_zero_bit`] / [`detect_zero_bit`] write a reference pattern and
//!   later test for its presence.
//! - [`embed_multibit`] / [`extract_multibit`] carry a message, each bit
//!   repeated and recovered by majority vote.
//!
//! Every call builds its own generator and returns fresh buffers, so calls
//! are independent of each other and never alter the caller's raster.

pub mod bit_codec;
pub mod carrier;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pattern;
pub mod payload;
pub mod raster;
pub mod redundancy;
pub mod selector;
pub mod watermark;

pub use bit_codec::{embed_bits, extract_bits, BitSequence};
pub use carrier::{Carrier, SeedDerivation};
pub use config::{MultiBitParams, ZeroBitParams};
pub use error::{Result, WatermarkError};
pub use metrics::{bit_accuracy, psnr};
pub use pattern::PatternKind;
pub use payload::IdentityPayload;
pub use raster::{PixelPosition, Raster};
pub use redundancy::RepetitionCode;
pub use selector::{select_pixels, PixelSet};
pub use watermark::{
    detect_zero_bit, embed_identity, embed_multibit, embed_zero_bit, extract_identity,
    extract_multibit, Detection, MultiBitEmbedding,
};
