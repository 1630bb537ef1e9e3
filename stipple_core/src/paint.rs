// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint sources and display/linear color conversion.

use color::{AlphaColor, LinearSrgb, Rgba8, Srgb};
use kurbo::Point;

/// Opaque black, the source in effect before any `SetPaintSource`.
pub const DEFAULT_COLOR: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

/// A two-stop linear gradient in local coordinates.
///
/// Colors are display-space (sRGB-encoded) with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    /// Local position of the first stop.
    pub start: Point,
    /// Color at and before the first stop.
    pub start_color: Rgba8,
    /// Local position of the second stop.
    pub end: Point,
    /// Color at and beyond the second stop.
    pub end_color: Rgba8,
}

impl LinearGradient {
    /// Creates a gradient from `start_color` at `start` to `end_color` at `end`.
    #[must_use]
    pub const fn new(start: Point, start_color: Rgba8, end: Point, end_color: Rgba8) -> Self {
        Self {
            start,
            start_color,
            end,
            end_color,
        }
    }
}

/// What a `Commit` paints with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintSource {
    /// A constant display-space color.
    Solid(Rgba8),
    /// A two-stop gradient sampled per pixel.
    Linear(LinearGradient),
}

impl Default for PaintSource {
    fn default() -> Self {
        Self::Solid(DEFAULT_COLOR)
    }
}

impl From<Rgba8> for PaintSource {
    fn from(c: Rgba8) -> Self {
        Self::Solid(c)
    }
}

impl From<LinearGradient> for PaintSource {
    fn from(g: LinearGradient) -> Self {
        Self::Linear(g)
    }
}

/// Converts a display-space color to linear sRGB.
#[must_use]
pub fn to_linear(c: Rgba8) -> AlphaColor<LinearSrgb> {
    AlphaColor::<Srgb>::from_rgba8(c.r, c.g, c.b, c.a).convert::<LinearSrgb>()
}

/// Converts a linear sRGB color to display space, rounding to nearest.
#[must_use]
pub fn to_display(c: AlphaColor<LinearSrgb>) -> Rgba8 {
    let [r, g, b, a] = c.convert::<Srgb>().components;
    Rgba8 {
        r: quantize(r),
        g: quantize(g),
        b: quantize(b),
        a: quantize(a),
    }
}

/// Maps a unit-range channel to 8 bits, rounding to nearest.
#[inline]
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to [0, 255.5) before the cast"
)]
pub fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_is_opaque_black() {
        assert_eq!(PaintSource::default(), PaintSource::Solid(DEFAULT_COLOR));
    }

    #[test]
    fn endpoints_survive_the_linear_round_trip() {
        for v in [0_u8, 1, 0x19, 0x80, 0xFE, 0xFF] {
            let c = Rgba8 {
                r: v,
                g: 255 - v,
                b: v / 2,
                a: 255,
            };
            assert_eq!(to_display(to_linear(c)), c, "channel value {v}");
        }
    }

    #[test]
    fn linear_midpoint_is_brighter_than_display_midpoint() {
        let black = to_linear(Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        });
        let white = to_linear(Rgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        });
        let avg = core::array::from_fn(|i| (black.components[i] + white.components[i]) / 2.0);
        let mid = to_display(AlphaColor::new(avg));
        // Linear 0.5 encodes to about 188 in sRGB, not 128.
        assert_eq!(mid.r, 188);
    }

    #[test]
    fn quantize_clamps_and_rounds() {
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(0.5), 128);
    }
}
