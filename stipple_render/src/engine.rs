// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage and source-over compositing of paint items.
//!
//! A pixel is covered by an item when its center `(x + 0.5, y + 0.5)` lies in
//! the item's clip region. Covered pixels receive the item's color blended
//! source-over in linear sRGB. Opaque solid colors are written as-is.

use color::{AlphaColor, LinearSrgb, Rgba8};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use stipple_core::gradient::GradientSampler;
use stipple_core::paint::{to_display, to_linear};
use stipple_core::{PaintItem, PaintPlan, PaintSource};

use crate::buffer::PixelBuffer;

/// Rasterizes [`PaintPlan`]s into [`PixelBuffer`]s.
#[derive(Clone)]
pub struct PaintEngine {
    /// sRGB byte to linear channel value.
    linear: [f32; 256],
}

impl core::fmt::Debug for PaintEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintEngine").finish_non_exhaustive()
    }
}

impl Default for PaintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintEngine {
    /// Creates an engine and fills its decode table.
    #[must_use]
    pub fn new() -> Self {
        let mut linear = [0.0; 256];
        for (v, slot) in (0..=255_u8).zip(linear.iter_mut()) {
            *slot = to_linear(Rgba8 {
                r: v,
                g: v,
                b: v,
                a: 255,
            })
            .components[0];
        }
        Self { linear }
    }

    /// Paints every item of `plan` into `buffer`, back to front.
    pub fn rasterize(&self, plan: &PaintPlan, buffer: &mut PixelBuffer) {
        for item in &plan.items {
            self.paint(item, buffer);
        }
    }

    /// Paints one item into `buffer`.
    pub fn paint(&self, item: &PaintItem, buffer: &mut PixelBuffer) {
        if item.clip.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = pixel_span(item.clip.bounds(), buffer) else {
            return;
        };
        match item.source {
            PaintSource::Solid(c) if c.a == 255 => {
                Self::cover(item, buffer, (x0, y0, x1, y1), |_, dst| *dst = c);
            }
            PaintSource::Solid(c) if c.a == 0 => {}
            PaintSource::Solid(c) => {
                let src = to_linear(c).components;
                Self::cover(item, buffer, (x0, y0, x1, y1), |_, dst| {
                    *dst = self.blend(src, *dst);
                });
            }
            PaintSource::Linear(g) => {
                let sampler = GradientSampler::new(&g);
                let inverse = item.transform.inverse();
                Self::cover(item, buffer, (x0, y0, x1, y1), |center, dst| {
                    let src = sampler.sample_linear(inverse * center);
                    *dst = self.blend(src.components, *dst);
                });
            }
        }
    }

    fn cover(
        item: &PaintItem,
        buffer: &mut PixelBuffer,
        (x0, y0, x1, y1): (u32, u32, u32, u32),
        mut write: impl FnMut(Point, &mut Rgba8),
    ) {
        for y in y0..y1 {
            let row = buffer.row_mut(y);
            for x in x0..x1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if item.clip.contains(center) {
                    write(center, &mut row[x as usize]);
                }
            }
        }
    }

    /// Source-over of straight-alpha linear `src` onto display-space `dst`.
    fn blend(&self, src: [f32; 4], dst: Rgba8) -> Rgba8 {
        let sa = src[3];
        if sa >= 1.0 {
            return to_display(AlphaColor::<LinearSrgb>::new(src));
        }
        if sa <= 0.0 {
            return dst;
        }
        let da = f32::from(dst.a) / 255.0;
        let keep = da * (1.0 - sa);
        let out_a = sa + keep;
        if out_a <= 0.0 {
            return Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            };
        }
        let d = [
            self.linear[usize::from(dst.r)],
            self.linear[usize::from(dst.g)],
            self.linear[usize::from(dst.b)],
        ];
        let mut out = [0.0, 0.0, 0.0, out_a];
        for ((o, s), d) in out.iter_mut().zip(&src).zip(&d) {
            *o = (s * sa + d * keep) / out_a;
        }
        to_display(AlphaColor::<LinearSrgb>::new(out))
    }
}

/// Pixel rows and columns whose centers can fall inside `bounds`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "values are clamped to the buffer size before the cast"
)]
fn pixel_span(bounds: Option<Rect>, buffer: &PixelBuffer) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (f64::from(buffer.width()), f64::from(buffer.height()));
    let b = bounds.unwrap_or(Rect::new(0.0, 0.0, w, h));
    let x0 = b.x0.floor().clamp(0.0, w) as u32;
    let y0 = b.y0.floor().clamp(0.0, h) as u32;
    let x1 = b.x1.ceil().clamp(0.0, w) as u32;
    let y1 = b.y1.ceil().clamp(0.0, h) as u32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

#[cfg(test)]
mod tests {
    use stipple_core::trace::Tracer;
    use stipple_core::{LinearGradient, Ops};

    use super::*;

    const WHITE: Rgba8 = Rgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    const BLACK: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    const RED: Rgba8 = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    fn render(record: impl FnOnce(&mut Ops) -> Result<(), stipple_core::Error>) -> PixelBuffer {
        let mut ops = Ops::new();
        let root = ops.record(record).unwrap();
        let plan = ops.play(root, &mut Tracer::none()).unwrap();
        let mut buf = PixelBuffer::new(16, 16, WHITE);
        PaintEngine::new().rasterize(&plan, &mut buf);
        buf
    }

    #[test]
    fn opaque_fill_is_exact_inside_clip() {
        let buf = render(|ops| ops.fill_shape(Rect::new(2.0, 2.0, 6.0, 6.0), RED));
        assert_eq!(buf.get(2, 2), Some(RED));
        assert_eq!(buf.get(5, 5), Some(RED));
        assert_eq!(buf.get(6, 6), Some(WHITE));
        assert_eq!(buf.get(1, 3), Some(WHITE));
    }

    #[test]
    fn unbounded_fill_covers_the_buffer() {
        let buf = render(|ops| ops.fill(BLACK));
        assert!(buf.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn later_paints_land_on_top() {
        let buf = render(|ops| {
            ops.fill(BLACK)?;
            ops.fill_shape(Rect::new(0.0, 0.0, 8.0, 8.0), RED)
        });
        assert_eq!(buf.get(3, 3), Some(RED));
        assert_eq!(buf.get(12, 12), Some(BLACK));
    }

    #[test]
    fn half_transparent_black_over_white_blends_in_linear_space() {
        let buf = render(|ops| {
            ops.fill(Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 128,
            })
        });
        // Half of linear white encodes to about 188.
        let p = buf.get(0, 0).unwrap();
        assert!((187..=189).contains(&p.r), "got {p:?}");
        assert_eq!(p.a, 255);
    }

    #[test]
    fn transparent_source_leaves_pixels_alone() {
        let buf = render(|ops| {
            ops.fill(Rgba8 {
                r: 255,
                g: 0,
                b: 0,
                a: 0,
            })
        });
        assert_eq!(buf.get(8, 8), Some(WHITE));
    }

    #[test]
    fn gradient_is_sampled_in_local_space() {
        let buf = render(|ops| {
            ops.offset((4.0, 0.0))?;
            ops.set_linear_gradient(LinearGradient::new(
                Point::new(0.5, 0.0),
                BLACK,
                Point::new(8.5, 0.0),
                WHITE,
            ))?;
            ops.paint()
        });
        // Device x = 4 is local 0.5, the first stop.
        assert_eq!(buf.get(4, 3), Some(BLACK));
        assert_eq!(buf.get(0, 3), Some(BLACK));
        // Device x = 12 is local 8.5, the second stop.
        assert_eq!(buf.get(12, 3), Some(WHITE));
        assert_eq!(buf.get(15, 3), Some(WHITE));
    }

    #[test]
    fn span_is_clamped_to_buffer() {
        let buf = PixelBuffer::new(16, 16, WHITE);
        assert_eq!(
            pixel_span(Some(Rect::new(-5.0, 2.2, 40.0, 3.8)), &buf),
            Some((0, 2, 16, 4))
        );
        assert_eq!(pixel_span(Some(Rect::new(0.0, -100.0, 40.0, -60.0)), &buf), None);
        assert_eq!(pixel_span(None, &buf), Some((0, 0, 16, 16)));
    }
}
