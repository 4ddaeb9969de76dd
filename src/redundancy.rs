//! Repetition coding with hard majority voting.
//!
//! Each message bit is repeated `r` times in place (`m0 m0 m0 m1 m1 m1 ...`).
//! Decoding counts the ones in each group of `r` and emits 1 only when they
//! are a strict majority, so an even group split down the middle decodes to 0.

use bitvec::prelude::*;

use crate::bit_codec::BitSequence;
use crate::error::{Result, WatermarkError};

pub const DEFAULT_REDUNDANCY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionCode {
    redundancy: usize,
}

impl RepetitionCode {
    pub fn new(redundancy: usize) -> Result<Self> {
        if redundancy == 0 {
            return Err(WatermarkError::InvalidParameter {
                name: "redundancy",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(RepetitionCode { redundancy })
    }

    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    /// Length of the repeated message, or `None` if it overflows `usize`.
    pub fn encoded_len(&self, message_len: usize) -> Option<usize> {
        message_len.checked_mul(self.redundancy)
    }

    pub fn encode(&self, message: &BitSlice<u8, Lsb0>) -> BitSequence {
        let mut encoded =
            BitSequence::with_capacity(self.encoded_len(message.len()).unwrap_or_default());
        for bit in message.iter().by_vals() {
            encoded.extend(std::iter::repeat(bit).take(self.redundancy));
        }
        encoded
    }

    /// Majority-votes each complete group of `r` bits; a trailing partial
    /// group is ignored.
    pub fn decode(&self, redundant: &BitSlice<u8, Lsb0>) -> BitSequence {
        redundant
            .chunks_exact(self.redundancy)
            .map(|group| 2 * group.count_ones() > self.redundancy)
            .collect()
    }
}

impl Default for RepetitionCode {
    fn default() -> Self {
        RepetitionCode {
            redundancy: DEFAULT_REDUNDANCY,
        }
    }
}
