//! Message layouts carried by multi-bit watermarks.
//!
//! The marketplace payload is an owner/buyer identifier pair, 6 bits each,
//! most significant bit first. Free text is carried as its UTF-8 bytes, also
//! most significant bit first.

use bitvec::prelude::*;

use crate::bit_codec::BitSequence;
use crate::error::{Result, WatermarkError};

pub const ID_BITS: usize = 6;
pub const MAX_ID: u32 = (1 << ID_BITS) - 1;
pub const IDENTITY_BITS: usize = 2 * ID_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityPayload {
    pub owner_id: u32,
    pub buyer_id: u32,
}

impl IdentityPayload {
    pub fn new(owner_id: u32, buyer_id: u32) -> Self {
        IdentityPayload { owner_id, buyer_id }
    }

    pub fn to_bits(&self) -> Result<BitSequence> {
        let mut bits = BitSequence::with_capacity(IDENTITY_BITS);
        for id in [self.owner_id, self.buyer_id].iter().copied() {
            if id > MAX_ID {
                return Err(WatermarkError::IdentifierOutOfRange { id, max: MAX_ID });
            }
            bits.extend((0..ID_BITS).rev().map(|shift| (id >> shift) & 1 == 1));
        }
        Ok(bits)
    }

    /// Reads the pair from the first [`IDENTITY_BITS`] bits.
    pub fn from_bits(bits: &BitSlice<u8, Lsb0>) -> Result<Self> {
        if bits.len() < IDENTITY_BITS {
            return Err(WatermarkError::CapacityExceeded {
                required: IDENTITY_BITS,
                available: bits.len(),
            });
        }
        Ok(IdentityPayload {
            owner_id: read_msb_first(&bits[..ID_BITS]),
            buyer_id: read_msb_first(&bits[ID_BITS..IDENTITY_BITS]),
        })
    }
}

pub fn text_to_bits(text: &str) -> BitSequence {
    text.as_bytes().view_bits::<Msb0>().iter().by_vals().collect()
}

/// Inverse of [`text_to_bits`]. A trailing partial byte is dropped and
/// invalid UTF-8 is replaced.
pub fn bits_to_text(bits: &BitSlice<u8, Lsb0>) -> String {
    let bytes: Vec<u8> = bits
        .chunks_exact(8)
        .map(|byte| read_msb_first(byte) as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn read_msb_first(bits: &BitSlice<u8, Lsb0>) -> u32 {
    bits.iter()
        .by_vals()
        .fold(0, |acc, bit| (acc << 1) | u32::from(bit))
}
