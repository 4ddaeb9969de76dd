//! Carrier keys and their reduction to generator seeds.
//!
//! A carrier is the shared secret of a watermark: the same carrier selects the
//! same pixels on embed and on extract. The default reduction of a vector
//! carrier sums absolute values, so two carriers that differ only in element
//! order or signs collide. [`SeedDerivation::Digest`] is available for callers
//! that need order-sensitive keys; it is never applied implicitly.

use num_traits::ToPrimitive;
use serde::Deserialize;
use sha3::{Digest, Sha3_256};

use crate::error::{Result, WatermarkError};

/// Seeds are kept below 2^31 - 1.
pub const SEED_MODULUS: u64 = (1 << 31) - 1;
const CHECKSUM_MODULUS: u64 = 256;
const SUM_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Carrier {
    /// Used directly as the seed.
    Scalar(u32),
    Vector(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedDerivation {
    /// `floor(sum(|v|) * 1e6) mod (2^31 - 1)`.
    #[default]
    AbsSum,
    /// SHA3-256 over the little-endian f64 encoding of each element.
    Digest,
}

impl Carrier {
    /// Builds a vector carrier from any numeric slice.
    ///
    /// Non-finite values are rejected since they have no stable seed.
    pub fn from_values<T: ToPrimitive + Copy>(values: &[T]) -> Result<Self> {
        values
            .iter()
            .map(|value| match value.to_f64() {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(WatermarkError::InvalidParameter {
                    name: "carrier",
                    reason: "carrier values must be finite numbers".to_string(),
                }),
            })
            .collect::<Result<Vec<f64>>>()
            .map(Carrier::Vector)
    }

    /// Seed for pixel selection using the default derivation.
    pub fn seed(&self) -> u64 {
        self.seed_with(SeedDerivation::AbsSum)
    }

    pub fn seed_with(&self, derivation: SeedDerivation) -> u64 {
        match (self, derivation) {
            (Carrier::Scalar(value), _) => u64::from(*value),
            (Carrier::Vector(_), SeedDerivation::AbsSum) => self.scaled_abs_sum() % SEED_MODULUS,
            (Carrier::Vector(values), SeedDerivation::Digest) => digest_seed(values),
        }
    }

    /// Seed for the `checksum` reference pattern, in `0..256`.
    pub fn checksum_seed(&self) -> u64 {
        self.scaled_abs_sum() % CHECKSUM_MODULUS
    }

    fn scaled_abs_sum(&self) -> u64 {
        let sum = match self {
            Carrier::Scalar(value) => f64::from(*value),
            Carrier::Vector(values) => values.iter().map(|v| v.abs()).sum::<f64>(),
        };
        (sum * SUM_SCALE).floor() as u64
    }
}

impl From<u32> for Carrier {
    fn from(value: u32) -> Self {
        Carrier::Scalar(value)
    }
}

impl From<Vec<f64>> for Carrier {
    fn from(values: Vec<f64>) -> Self {
        Carrier::Vector(values)
    }
}

fn digest_seed(values: &[f64]) -> u64 {
    let mut hasher = Sha3_256::new();
    for value in values {
        hasher.update(value.to_le_bytes());
    }
    let digest = hasher.finalize();
    let prefix = digest[..8]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    prefix % SEED_MODULUS
}
