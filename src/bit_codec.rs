//! Least-significant-bit embedding over selected (pixel, channel) pairs.
//!
//! Both directions walk the same order: every pixel of the set in turn, and
//! for each pixel every channel in the caller's channel list.

use bitvec::prelude::*;
use tracing::debug;

use crate::error::{Result, WatermarkError};
use crate::raster::{PixelPosition, Raster};

pub type BitSequence = BitVec<u8, Lsb0>;

/// Number of bits the given pixels and channels can hold.
pub fn capacity(pixels: &[PixelPosition], channels: &[usize]) -> usize {
    pixels.len() * channels.len()
}

/// Returns a copy of `raster` with `bits` written into the LSBs along the
/// traversal order. The input raster is left untouched.
pub fn embed_bits(
    raster: &Raster,
    pixels: &[PixelPosition],
    bits: &BitSlice<u8, Lsb0>,
    channels: &[usize],
) -> Result<Raster> {
    check_layout(raster, pixels, channels, bits.len())?;

    let mut marked = raster.clone();
    for ((position, channel), bit) in slots(pixels, channels).zip(bits.iter().by_vals()) {
        let sample = marked.sample(position, channel);
        marked.set_sample(position, channel, (sample & 0xFE) | bit as u8);
    }
    debug!(bits = bits.len(), pixels = pixels.len(), "embedded bits");

    Ok(marked)
}

/// Reads the first `total_bits` LSBs along the traversal order.
pub fn extract_bits(
    raster: &Raster,
    pixels: &[PixelPosition],
    channels: &[usize],
    total_bits: usize,
) -> Result<BitSequence> {
    check_layout(raster, pixels, channels, total_bits)?;

    let bits: BitSequence = slots(pixels, channels)
        .take(total_bits)
        .map(|(position, channel)| raster.sample(position, channel) & 1 == 1)
        .collect();
    debug!(bits = bits.len(), pixels = pixels.len(), "extracted bits");

    Ok(bits)
}

fn slots<'a>(
    pixels: &'a [PixelPosition],
    channels: &'a [usize],
) -> impl Iterator<Item = (PixelPosition, usize)> + 'a {
    pixels
        .iter()
        .flat_map(move |position| channels.iter().map(move |channel| (*position, *channel)))
}

fn check_layout(
    raster: &Raster,
    pixels: &[PixelPosition],
    channels: &[usize],
    required: usize,
) -> Result<()> {
    raster.check_channels(channels)?;

    let available = capacity(pixels, channels);
    if required > available {
        return Err(WatermarkError::CapacityExceeded {
            required,
            available,
        });
    }

    match pixels
        .iter()
        .find(|p| p.row >= raster.height() || p.col >= raster.width())
    {
        Some(p) => Err(WatermarkError::PositionOutOfBounds {
            row: p.row,
            col: p.col,
            height: raster.height(),
            width: raster.width(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::select_pixels;

    fn gradient(height: usize, width: usize) -> Raster {
        let samples = (0..height * width * 3).map(|i| (i * 7 % 256) as u8).collect();
        Raster::from_samples(height, width, 3, samples).unwrap()
    }

    #[test]
    fn only_selected_lsbs_change() {
        let raster = gradient(10, 10);
        let pixels = select_pixels(10, 10, 5, 12);
        let bits = bitvec![u8, Lsb0; 1, 0, 1, 1, 0, 0, 1, 0, 1, 1];
        let marked = embed_bits(&raster, &pixels, &bits, &[2, 0]).unwrap();

        let touched: Vec<(PixelPosition, usize)> = slots(&pixels, &[2, 0]).take(bits.len()).collect();
        for row in 0..10 {
            for col in 0..10 {
                let position = PixelPosition::new(row, col);
                for channel in 0..3 {
                    let before = raster.sample(position, channel);
                    let after = marked.sample(position, channel);
                    if touched.contains(&(position, channel)) {
                        assert_eq!(before & 0xFE, after & 0xFE);
                    } else {
                        assert_eq!(before, after);
                    }
                }
            }
        }
    }

    #[test]
    fn extraction_follows_embedding_order() {
        let raster = gradient(8, 8);
        let pixels = select_pixels(8, 8, 77, 6);
        let bits = bitvec![u8, Lsb0; 0, 1, 1, 0, 1, 0, 0, 1, 1, 1, 0, 1, 0];
        let marked = embed_bits(&raster, &pixels, &bits, &[0, 1, 2]).unwrap();

        let extracted = extract_bits(&marked, &pixels, &[0, 1, 2], bits.len()).unwrap();
        assert_eq!(extracted, bits);

        let prefix = extract_bits(&marked, &pixels, &[0, 1, 2], 4).unwrap();
        assert_eq!(prefix.as_bitslice(), &bits[..4]);
    }

    #[test]
    fn input_raster_is_not_modified() {
        let raster = Raster::filled(4, 4, 0);
        let pixels = select_pixels(4, 4, 1, 4);
        let bits = bitvec![u8, Lsb0; 1; 12];
        let marked = embed_bits(&raster, &pixels, &bits, &[0, 1, 2]).unwrap();

        assert!(raster.samples().iter().all(|s| *s == 0));
        assert_eq!(marked.samples().iter().filter(|s| **s == 1).count(), 12);
    }

    #[test]
    fn overfull_payload_is_rejected() {
        let raster = Raster::filled(4, 4, 0);
        let pixels = select_pixels(4, 4, 1, 2);
        let bits = bitvec![u8, Lsb0; 1; 7];

        let err = embed_bits(&raster, &pixels, &bits, &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::CapacityExceeded {
                required: 7,
                available: 6
            }
        ));
        assert!(extract_bits(&raster, &pixels, &[0], 3).is_err());
    }

    #[test]
    fn foreign_pixel_set_is_rejected() {
        let raster = Raster::filled(4, 4, 0);
        let pixels = vec![PixelPosition::new(4, 0)];
        assert!(matches!(
            extract_bits(&raster, &pixels, &[0], 1),
            Err(WatermarkError::PositionOutOfBounds { row: 4, .. })
        ));
    }
}
