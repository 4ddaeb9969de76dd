//! Diagnostics for marked rasters and recovered messages. Nothing here gates
//! an embed or extract.

use bitvec::prelude::*;

use crate::error::{Result, WatermarkError};
use crate::raster::Raster;

const PEAK: f64 = 255.0;

/// Peak signal-to-noise ratio in dB; infinite for identical rasters.
pub fn psnr(original: &Raster, modified: &Raster) -> Result<f64> {
    let (a, b) = (original.samples(), modified.samples());
    if original.height() != modified.height() || original.width() != modified.width() {
        return Err(WatermarkError::ShapeMismatch {
            expected_height: original.height(),
            expected_width: original.width(),
            actual_height: modified.height(),
            actual_width: modified.width(),
        });
    }
    if a.is_empty() {
        return Ok(f64::INFINITY);
    }

    let squared_error: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = f64::from(*x) - f64::from(*y);
            diff * diff
        })
        .sum();
    let mse = squared_error / a.len() as f64;

    if mse == 0.0 {
        Ok(f64::INFINITY)
    } else {
        Ok(20.0 * (PEAK / mse.sqrt()).log10())
    }
}

/// Fraction of agreeing bits over the shorter of the two sequences.
pub fn bit_accuracy(decoded: &BitSlice<u8, Lsb0>, original: &BitSlice<u8, Lsb0>) -> f64 {
    let len = decoded.len().min(original.len());
    if len == 0 {
        return 0.0;
    }
    let matching = decoded
        .iter()
        .by_vals()
        .zip(original.iter().by_vals())
        .filter(|(a, b)| a == b)
        .count();
    matching as f64 / len as f64
}
