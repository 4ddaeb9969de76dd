use tracing::debug;

use crate::bit_codec::{capacity, embed_bits, extract_bits};
use crate::carrier::Carrier;
use crate::config::ZeroBitParams;
use crate::error::Result;
use crate::raster::Raster;
use crate::selector::{select_pixels, PixelSet};

/// Outcome of testing a raster for a zero-bit watermark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub detected: bool,
    /// Share of extracted bits that agree with the expected pattern.
    pub confidence: f64,
    pub matched_bits: usize,
    pub total_bits: usize,
}

pub fn embed_zero_bit(raster: &Raster, carrier: &Carrier, params: &ZeroBitParams) -> Result<Raster> {
    params.validate()?;
    raster.check_channels(&params.channels)?;

    let pixels = keyed_pixels(raster, carrier, params);
    let pattern = params
        .pattern
        .generate(capacity(&pixels, &params.channels), carrier);
    embed_bits(raster, &pixels, &pattern, &params.channels)
}

/// Re-derives the embedding positions and compares their LSBs with the
/// expected pattern.
///
/// A marked raster read with its own carrier agrees almost everywhere; a wrong
/// carrier or an unmarked raster agrees about half the time.
pub fn detect_zero_bit(
    raster: &Raster,
    carrier: &Carrier,
    params: &ZeroBitParams,
) -> Result<Detection> {
    params.validate()?;
    raster.check_channels(&params.channels)?;

    let pixels = keyed_pixels(raster, carrier, params);
    let total_bits = capacity(&pixels, &params.channels);
    let extracted = extract_bits(raster, &pixels, &params.channels, total_bits)?;
    let expected = params.pattern.generate(total_bits, carrier);

    let matched_bits = extracted
        .iter()
        .by_vals()
        .zip(expected.iter().by_vals())
        .filter(|(found, wanted)| found == wanted)
        .count();
    let confidence = if total_bits == 0 {
        0.0
    } else {
        matched_bits as f64 / total_bits as f64
    };
    let detected = total_bits > 0 && confidence >= params.threshold;
    debug!(
        matched_bits,
        total_bits,
        confidence,
        detected,
        pattern = %params.pattern,
        "zero-bit detection"
    );

    Ok(Detection {
        detected,
        confidence,
        matched_bits,
        total_bits,
    })
}

fn keyed_pixels(raster: &Raster, carrier: &Carrier, params: &ZeroBitParams) -> PixelSet {
    select_pixels(
        raster.height(),
        raster.width(),
        carrier.seed_with(params.seed_derivation),
        params.pixel_count,
    )
}
