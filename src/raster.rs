use std::convert::TryFrom;

use image::{DynamicImage, RgbImage};

use crate::error::{Result, WatermarkError};

/// Every raster is normalized to three interleaved channels.
pub const RGB_CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPosition {
    pub row: usize,
    pub col: usize,
}

impl PixelPosition {
    pub fn new(row: usize, col: usize) -> Self {
        PixelPosition { row, col }
    }
}

/// Row-major `height x width x 3` buffer of 8-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    height: usize,
    width: usize,
    samples: Vec<u8>,
}

impl Raster {
    pub fn filled(height: usize, width: usize, value: u8) -> Self {
        Raster {
            height,
            width,
            samples: vec![value; height * width * RGB_CHANNELS],
        }
    }

    /// Wraps interleaved samples with `channels` values per pixel.
    ///
    /// Grayscale (1 channel) and grayscale-alpha (2 channels) input is
    /// broadcast to RGB, RGBA input loses its alpha channel.
    pub fn from_samples(
        height: usize,
        width: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self> {
        let expected = height * width * channels;
        if samples.len() != expected {
            return Err(WatermarkError::DimensionMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let samples = match channels {
            RGB_CHANNELS => samples,
            1 | 2 | 4 => samples
                .chunks_exact(channels)
                .flat_map(|pixel| {
                    if channels == 4 {
                        [pixel[0], pixel[1], pixel[2]]
                    } else {
                        [pixel[0]; RGB_CHANNELS]
                    }
                })
                .collect(),
            other => return Err(WatermarkError::UnsupportedChannelCount(other)),
        };

        Ok(Raster {
            height,
            width,
            samples,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        RGB_CHANNELS
    }

    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn sample(&self, position: PixelPosition, channel: usize) -> u8 {
        self.samples[self.index(position, channel)]
    }

    pub fn set_sample(&mut self, position: PixelPosition, channel: usize, value: u8) {
        let index = self.index(position, channel);
        self.samples[index] = value;
    }

    /// Rejects an empty channel list, any index past the last channel and
    /// repeated indices.
    pub fn check_channels(&self, channels: &[usize]) -> Result<()> {
        let invalid = |reason: &str| WatermarkError::InvalidParameter {
            name: "channels",
            reason: reason.to_string(),
        };
        if channels.is_empty() {
            return Err(invalid("at least one channel is required"));
        }
        if let Some(channel) = channels.iter().find(|channel| **channel >= RGB_CHANNELS) {
            return Err(WatermarkError::ChannelOutOfRange {
                channel: *channel,
                channels: RGB_CHANNELS,
            });
        }
        // a repeated channel would overwrite the bit it carried a moment ago
        let repeated = (1..channels.len()).any(|i| channels[..i].contains(&channels[i]));
        if repeated {
            return Err(invalid("duplicate channel index"));
        }
        Ok(())
    }

    pub fn into_rgb_image(self) -> Result<RgbImage> {
        let too_large = WatermarkError::RasterTooLarge {
            height: self.height,
            width: self.width,
        };
        let (width, height) = match (u32::try_from(self.width), u32::try_from(self.height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => return Err(too_large),
        };
        let actual = self.samples.len();
        let expected = self.width * self.height * RGB_CHANNELS;
        RgbImage::from_raw(width, height, self.samples)
            .ok_or(WatermarkError::DimensionMismatch { expected, actual })
    }

    fn index(&self, position: PixelPosition, channel: usize) -> usize {
        (position.row * self.width + position.col) * RGB_CHANNELS + channel
    }
}

impl From<RgbImage> for Raster {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Raster {
            height: height as usize,
            width: width as usize,
            samples: image.into_raw(),
        }
    }
}

impl From<&DynamicImage> for Raster {
    fn from(image: &DynamicImage) -> Self {
        Raster::from(image.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn grayscale_is_broadcast() {
        let raster = Raster::from_samples(1, 2, 1, vec![10, 200]).unwrap();
        assert_eq!(raster.samples(), &[10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn alpha_is_dropped() {
        let raster = Raster::from_samples(1, 2, 4, vec![1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        assert_eq!(raster.samples(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = Raster::from_samples(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::DimensionMismatch {
                expected: 12,
                actual: 11
            }
        ));
        assert!(matches!(
            Raster::from_samples(1, 1, 5, vec![0; 5]),
            Err(WatermarkError::UnsupportedChannelCount(5))
        ));
    }

    #[test]
    fn channel_indices_are_checked() {
        let raster = Raster::filled(2, 2, 0);
        assert!(raster.check_channels(&[2, 0]).is_ok());
        assert!(matches!(
            raster.check_channels(&[0, 3]),
            Err(WatermarkError::ChannelOutOfRange { channel: 3, .. })
        ));
        assert!(raster.check_channels(&[]).is_err());
    }

    #[test]
    fn repeated_channels_are_rejected() {
        let raster = Raster::filled(2, 2, 0);
        assert!(matches!(
            raster.check_channels(&[0, 0]),
            Err(WatermarkError::InvalidParameter { name: "channels", .. })
        ));
        assert!(matches!(
            raster.check_channels(&[1, 2, 1]),
            Err(WatermarkError::InvalidParameter { name: "channels", .. })
        ));
        assert!(raster.check_channels(&[0, 1, 2]).is_ok());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_width_is_not_truncated() {
        // width 2^32 would wrap to 0 as a u32 and pass as an empty image
        let raster = Raster::filled(0, 1 << 32, 0);
        assert!(matches!(
            raster.into_rgb_image(),
            Err(WatermarkError::RasterTooLarge {
                height: 0,
                width: 4_294_967_296
            })
        ));
        assert!(Raster::filled(0, 3, 0).into_rgb_image().is_ok());
    }

    #[test]
    fn converts_from_dynamic_image() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(2, 1, Luma([77]));
        let raster = Raster::from(&DynamicImage::ImageLuma8(gray));

        assert_eq!((raster.height(), raster.width()), (2, 3));
        assert_eq!(raster.sample(PixelPosition::new(1, 2), 1), 77);

        let rgb = raster.clone().into_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(2, 1).0, [77, 77, 77]);
        assert_eq!(Raster::from(rgb), raster);
    }
}
