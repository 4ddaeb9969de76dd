use rand::seq::index;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::debug;

use crate::raster::PixelPosition;

pub type PixelSet = Vec<PixelPosition>;

/// Draws `requested` distinct pixel positions from a `height x width` grid.
///
/// The request is capped at the number of pixels in the grid. The generator
/// lives only for this call, so equal arguments always give equal output.
pub fn select_pixels(height: usize, width: usize, seed: u64, requested: usize) -> PixelSet {
    let total = height * width;
    let count = requested.min(total);
    if count == 0 {
        return PixelSet::new();
    }

    let mut rng = Pcg64::seed_from_u64(seed);
    let indices = index::sample(&mut rng, total, count);
    debug!(seed, total, count, "selected pixels");

    indices
        .into_iter()
        .map(|i| PixelPosition::new(i / width, i % width))
        .collect()
}
