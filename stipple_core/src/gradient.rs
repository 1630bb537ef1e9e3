// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-stop linear gradient sampling.
//!
//! For a local point `X` the ramp parameter is the projection of `X − S1`
//! onto the axis `S2 − S1`, normalized by the squared axis length and clamped
//! to `[0, 1]`. Coincident stops give `t = 0` everywhere. Colors interpolate
//! in linear sRGB and are encoded back to display space afterwards.

use color::{AlphaColor, LinearSrgb, Rgba8};
use kurbo::{Point, Vec2};

use crate::paint::{LinearGradient, to_display, to_linear};

/// Precomputed sampler for one [`LinearGradient`].
#[derive(Clone, Copy, Debug)]
pub struct GradientSampler {
    origin: Point,
    /// Axis direction divided by its squared length; zero when degenerate.
    axis: Vec2,
    start: [f32; 4],
    end: [f32; 4],
}

impl GradientSampler {
    /// Prepares a sampler, converting both stop colors to linear space.
    #[must_use]
    pub fn new(gradient: &LinearGradient) -> Self {
        let axis = gradient.end - gradient.start;
        let len2 = axis.hypot2();
        let axis = if len2 > 0.0 { axis / len2 } else { Vec2::ZERO };
        Self {
            origin: gradient.start,
            axis,
            start: to_linear(gradient.start_color).components,
            end: to_linear(gradient.end_color).components,
        }
    }

    /// Ramp parameter for a local-space point, in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn param(&self, local: Point) -> f64 {
        (local - self.origin).dot(self.axis).clamp(0.0, 1.0)
    }

    /// Linear-space color at a local-space point.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "ramp parameter is in [0, 1]"
    )]
    pub fn sample_linear(&self, local: Point) -> AlphaColor<LinearSrgb> {
        let t = self.param(local) as f32;
        let mut out = [0.0; 4];
        for (o, (a, b)) in out.iter_mut().zip(self.start.iter().zip(&self.end)) {
            *o = a + (b - a) * t;
        }
        AlphaColor::new(out)
    }

    /// Display-space color at a local-space point.
    #[inline]
    #[must_use]
    pub fn sample(&self, local: Point) -> Rgba8 {
        to_display(self.sample_linear(local))
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;
    use kurbo::Affine;

    use super::*;

    const BLACK: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    const WHITE: Rgba8 = Rgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    fn ramp() -> LinearGradient {
        LinearGradient::new(Point::new(32.5, 4.0), BLACK, Point::new(95.5, 4.0), WHITE)
    }

    #[test]
    fn stops_map_to_their_colors() {
        let s = GradientSampler::new(&ramp());
        assert_eq!(s.sample(Point::new(32.5, 4.5)), BLACK);
        assert_eq!(s.sample(Point::new(95.5, 4.5)), WHITE);
    }

    #[test]
    fn param_is_clamped_beyond_stops() {
        let s = GradientSampler::new(&ramp());
        assert_eq!(s.param(Point::new(0.0, 0.0)), 0.0);
        assert_eq!(s.param(Point::new(200.0, 0.0)), 1.0);
        assert!((s.param(Point::new(64.0, 99.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn midpoint_is_the_linear_average() {
        let s = GradientSampler::new(&ramp());
        let mid = s.sample(Point::new(64.0, 4.5));
        assert_eq!(mid, Rgba8 { r: 188, g: 188, b: 188, a: 255 });
    }

    #[test]
    fn coincident_stops_use_first_color() {
        let p = Point::new(10.0, 10.0);
        let s = GradientSampler::new(&LinearGradient::new(p, BLACK, p, WHITE));
        assert_eq!(s.param(Point::new(50.0, 50.0)), 0.0);
        assert_eq!(s.sample(Point::new(-50.0, 3.0)), BLACK);
    }

    #[test]
    fn rotating_the_frame_keeps_samples_on_the_axis() {
        // Sampling through the inverse of an ambient rotation must give the
        // same ramp values at the rotated device positions.
        let g = ramp();
        let s = GradientSampler::new(&g);
        for angle in [0.0, FRAC_PI_4, FRAC_PI_2] {
            let ambient = Affine::rotate_about(angle, Point::new(64.0, 64.0));
            let inverse = ambient.inverse();
            for (local, expected) in [(32.5, 0.0), (48.25, 0.25), (64.0, 0.5), (95.5, 1.0)] {
                let device = ambient * Point::new(local, 4.0);
                let t = s.param(inverse * device);
                assert!((t - expected).abs() < 1e-9, "angle {angle}: t = {t}");
            }
        }
    }

    #[test]
    fn alpha_interpolates_linearly() {
        let clear = Rgba8 { r: 0, g: 0, b: 0, a: 0 };
        let g = LinearGradient::new(Point::ZERO, clear, Point::new(10.0, 0.0), BLACK);
        let s = GradientSampler::new(&g);
        assert_eq!(s.sample(Point::new(5.0, 0.0)).a, 128);
    }
}
