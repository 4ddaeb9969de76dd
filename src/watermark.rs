//! Keyed watermark schemes built from the shared leaf codecs.
//!
//! Both schemes select pixels from the carrier seed and write LSBs through
//! [`crate::bit_codec`]. They differ only in payload:
//!
//! - **zero-bit**: a reference pattern whose presence is tested statistically.
//! - **multi-bit**: a message protected by a repetition code.

mod multi_bit;
mod zero_bit;

pub use multi_bit::{
    embed_identity, embed_multibit, extract_identity, extract_multibit, MultiBitEmbedding,
};
pub use zero_bit::{detect_zero_bit, embed_zero_bit, Detection};
