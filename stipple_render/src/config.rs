// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster target configuration.

use color::Rgba8;

/// Opaque white.
pub const WHITE: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

/// Size and clear color of the frames a [`Rasterizer`](crate::Rasterizer)
/// produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Color every frame starts from.
    pub background: Rgba8,
}

impl RasterConfig {
    /// Default frame width.
    pub const DEFAULT_WIDTH: u32 = 128;
    /// Default frame height.
    pub const DEFAULT_HEIGHT: u32 = 128;

    /// A `width × height` target cleared to opaque white.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: WHITE,
        }
    }

    /// Returns this configuration with a different clear color.
    #[must_use]
    pub const fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_128_square_white() {
        let c = RasterConfig::default();
        assert_eq!((c.width, c.height), (128, 128));
        assert_eq!(c.background, WHITE);
    }

    #[test]
    fn with_background_keeps_size() {
        let black = Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        };
        let c = RasterConfig::new(4, 2).with_background(black);
        assert_eq!((c.width, c.height), (4, 2));
        assert_eq!(c.background, black);
    }
}
