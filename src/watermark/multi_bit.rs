use bitvec::prelude::*;
use tracing::{debug, info};

use crate::bit_codec::{embed_bits, extract_bits, BitSequence};
use crate::carrier::Carrier;
use crate::config::MultiBitParams;
use crate::error::{Result, WatermarkError};
use crate::metrics::psnr;
use crate::payload::{IdentityPayload, IDENTITY_BITS};
use crate::raster::Raster;
use crate::redundancy::RepetitionCode;
use crate::selector::select_pixels;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiBitEmbedding {
    pub raster: Raster,
    /// Present only when `report_psnr` was requested.
    pub psnr: Option<f64>,
}

/// Embeds `message` with each bit repeated `redundancy` times.
///
/// Fails with [`WatermarkError::CapacityExceeded`] before touching the raster
/// when the repeated message does not fit.
pub fn embed_multibit(
    raster: &Raster,
    message: &BitSlice<u8, Lsb0>,
    carrier: &Carrier,
    params: &MultiBitParams,
) -> Result<MultiBitEmbedding> {
    params.validate()?;
    if let Some(expected) = params.message_length {
        if expected != message.len() {
            return Err(WatermarkError::InvalidParameter {
                name: "message_length",
                reason: format!("expected {} bits, message has {}", expected, message.len()),
            });
        }
    }
    raster.check_channels(&params.channels)?;

    let code = RepetitionCode::new(params.redundancy)?;
    let (_, pixels_needed) =
        required_pixels(raster, code.encoded_len(message.len()), params.channels.len())?;

    let encoded = code.encode(message);
    let pixels = select_pixels(
        raster.height(),
        raster.width(),
        carrier.seed_with(params.seed_derivation),
        pixels_needed,
    );
    let marked = embed_bits(raster, &pixels, &encoded, &params.channels)?;
    debug!(
        message_bits = message.len(),
        redundancy = code.redundancy(),
        pixels = pixels_needed,
        "multi-bit embed"
    );

    let distortion = if params.report_psnr {
        let value = psnr(raster, &marked)?;
        info!(psnr = value, "multi-bit embed distortion");
        Some(value)
    } else {
        None
    };

    Ok(MultiBitEmbedding {
        raster: marked,
        psnr: distortion,
    })
}

/// Recovers a `message_length`-bit message by majority vote.
pub fn extract_multibit(
    raster: &Raster,
    carrier: &Carrier,
    params: &MultiBitParams,
) -> Result<BitSequence> {
    params.validate()?;
    let message_len = params.message_length()?;
    raster.check_channels(&params.channels)?;

    let code = RepetitionCode::new(params.redundancy)?;
    let (total_bits, pixels_needed) =
        required_pixels(raster, code.encoded_len(message_len), params.channels.len())?;

    let pixels = select_pixels(
        raster.height(),
        raster.width(),
        carrier.seed_with(params.seed_derivation),
        pixels_needed,
    );
    let redundant = extract_bits(raster, &pixels, &params.channels, total_bits)?;
    debug!(
        message_bits = message_len,
        redundancy = code.redundancy(),
        "multi-bit extract"
    );

    Ok(code.decode(&redundant))
}

/// Marks `raster` with an owner/buyer pair as a 12-bit message.
pub fn embed_identity(
    raster: &Raster,
    identity: IdentityPayload,
    carrier: &Carrier,
    params: &MultiBitParams,
) -> Result<MultiBitEmbedding> {
    let message = identity.to_bits()?;
    embed_multibit(raster, &message, carrier, params)
}

/// Reads back an owner/buyer pair; `message_length` defaults to 12 bits.
pub fn extract_identity(
    raster: &Raster,
    carrier: &Carrier,
    params: &MultiBitParams,
) -> Result<IdentityPayload> {
    let params = MultiBitParams {
        message_length: Some(params.message_length.unwrap_or(IDENTITY_BITS)),
        ..params.clone()
    };
    let message = extract_multibit(raster, carrier, &params)?;
    IdentityPayload::from_bits(&message)
}

/// Returns the repeated bit count and the pixels needed to hold it.
///
/// A bit count that overflows `usize` is reported as `required: usize::MAX`.
fn required_pixels(
    raster: &Raster,
    total_bits: Option<usize>,
    channel_count: usize,
) -> Result<(usize, usize)> {
    let available = raster.pixel_count().saturating_mul(channel_count);
    let exceeded = |required| WatermarkError::CapacityExceeded {
        required,
        available,
    };

    let total_bits = total_bits.ok_or_else(|| exceeded(usize::MAX))?;
    let pixels_needed = total_bits
        .checked_add(channel_count - 1)
        .map(|bits| bits / channel_count)
        .ok_or_else(|| exceeded(total_bits))?;
    if pixels_needed > raster.pixel_count() {
        return Err(exceeded(total_bits));
    }
    Ok((total_bits, pixels_needed))
}
