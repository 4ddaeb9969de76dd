use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Deserialize;

use crate::bit_codec::BitSequence;
use crate::carrier::Carrier;
use crate::error::WatermarkError;

/// Reference sequence written by a zero-bit watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum PatternKind {
    /// 0, 1, 0, 1, ...
    #[default]
    Alternating,
    Ones,
    /// Uniform bits from a generator keyed on the carrier checksum.
    Checksum,
}

impl PatternKind {
    pub fn generate(self, total_bits: usize, carrier: &Carrier) -> BitSequence {
        match self {
            PatternKind::Alternating => (0..total_bits).map(|i| i % 2 == 1).collect(),
            PatternKind::Ones => bitvec![u8, Lsb0; 1; total_bits],
            PatternKind::Checksum => {
                let mut rng = Pcg64::seed_from_u64(carrier.checksum_seed());
                (0..total_bits).map(|_| rng.gen::<bool>()).collect()
            }
        }
    }
}

impl FromStr for PatternKind {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternating" => Ok(PatternKind::Alternating),
            "ones" => Ok(PatternKind::Ones),
            "checksum" => Ok(PatternKind::Checksum),
            other => Err(WatermarkError::UnknownPattern(other.to_string())),
        }
    }
}

impl TryFrom<String> for PatternKind {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternKind::Alternating => "alternating",
            PatternKind::Ones => "ones",
            PatternKind::Checksum => "checksum",
        };
        f.write_str(name)
    }
}
