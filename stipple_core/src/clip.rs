// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip shapes and the intersected clip region.
//!
//! A [`ClipShape`] is defined in local coordinates. Applying it to a
//! [`ClipRegion`] records the shape together with the inverse of the transform
//! ambient at that moment; membership of a device point is then decided by
//! mapping the point back into each shape's local space. The region only ever
//! narrows, and its nodes are shared between every snapshot that saw them.

use alloc::sync::Arc;

use kurbo::{Affine, Point, Rect, RoundedRect, RoundedRectRadii, Shape};

use crate::path::Path;

/// A shape that restricts where paints land.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with independently rounded corners.
    RoundedRect(RoundedRect),
    /// The nonzero-filled interior of a closed outline.
    Outline(Path),
}

impl ClipShape {
    /// Rounded rectangle with per-corner radii.
    ///
    /// A zero radius keeps that corner square. Radii are clamped to half the
    /// shorter side of `bounds`.
    #[must_use]
    pub fn rounded_rect(bounds: Rect, nw: f64, ne: f64, sw: f64, se: f64) -> Self {
        Self::RoundedRect(RoundedRect::from_rect(
            bounds,
            RoundedRectRadii::new(nw, ne, se, sw),
        ))
    }

    /// Local-space membership test under the nonzero rule.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(p),
            Self::RoundedRect(rr) => rr.contains(p),
            Self::Outline(path) => path.contains(p),
        }
    }

    /// Local-space bounds.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(r) => r.abs(),
            Self::RoundedRect(rr) => rr.rect(),
            Self::Outline(path) => path.bounding_box(),
        }
    }
}

impl From<Rect> for ClipShape {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<RoundedRect> for ClipShape {
    fn from(rr: RoundedRect) -> Self {
        Self::RoundedRect(rr)
    }
}

impl From<Path> for ClipShape {
    fn from(path: Path) -> Self {
        Self::Outline(path)
    }
}

/// Whether `m` maps the plane onto itself.
pub(crate) fn is_invertible(m: Affine) -> bool {
    let det = m.determinant();
    det != 0.0 && det.is_finite()
}

#[derive(Debug)]
struct ClipNode {
    shape: ClipShape,
    /// Device to local.
    inverse: Affine,
    parent: Option<Arc<Self>>,
}

impl Drop for ClipNode {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse.
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            parent = match Arc::try_unwrap(node) {
                Ok(mut n) => n.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// The intersection of every clip applied so far.
///
/// The default region is unbounded. Cloning shares the underlying list.
#[derive(Clone, Debug, Default)]
pub struct ClipRegion {
    head: Option<Arc<ClipNode>>,
    /// Device-space bounds; `None` while unbounded.
    bounds: Option<Rect>,
    empty: bool,
    depth: usize,
}

impl ClipRegion {
    /// The region covering the whole plane.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns this region narrowed by `shape` placed under `transform`.
    ///
    /// A non-invertible transform collapses the region to empty.
    #[must_use]
    pub fn intersect(&self, shape: ClipShape, transform: Affine) -> Self {
        if self.empty {
            return self.clone();
        }
        if !is_invertible(transform) {
            return self.emptied();
        }
        let device = transform.transform_rect_bbox(shape.bounding_box());
        let bounds = match self.bounds {
            Some(b) => b.intersect(device),
            None => device,
        };
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return self.emptied();
        }
        Self {
            head: Some(Arc::new(ClipNode {
                shape,
                inverse: transform.inverse(),
                parent: self.head.clone(),
            })),
            bounds: Some(bounds),
            empty: false,
            depth: self.depth + 1,
        }
    }

    fn emptied(&self) -> Self {
        Self {
            head: self.head.clone(),
            bounds: Some(Rect::ZERO),
            empty: true,
            depth: self.depth,
        }
    }

    /// Returns `true` when no point can pass this region.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns `true` when no clip has been applied.
    #[inline]
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.bounds.is_none()
    }

    /// Conservative device-space bounds, or `None` if unbounded.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Number of shapes intersected into this region.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Device-space membership test.
    #[must_use]
    pub fn contains(&self, device: Point) -> bool {
        if self.empty {
            return false;
        }
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if !n.shape.contains(n.inverse * device) {
                return false;
            }
            node = n.parent.as_deref();
        }
        true
    }

    /// Returns `true` if both regions share the same innermost node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.empty == other.empty
            && match (&self.head, &other.head) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;
    use crate::path::PathBuilder;

    #[test]
    fn rounded_rect_corners_are_independent() {
        let shape = ClipShape::rounded_rect(Rect::new(0.0, 0.0, 40.0, 40.0), 20.0, 0.0, 0.0, 0.0);
        // North-west corner is cut away.
        assert!(!shape.contains(Point::new(1.0, 1.0)));
        // The other corners stay square.
        assert!(shape.contains(Point::new(39.0, 1.0)));
        assert!(shape.contains(Point::new(1.0, 39.0)));
        assert!(shape.contains(Point::new(39.0, 39.0)));
    }

    #[test]
    fn rounded_rect_radii_are_clamped() {
        let ClipShape::RoundedRect(rr) =
            ClipShape::rounded_rect(Rect::new(0.0, 0.0, 10.0, 40.0), 30.0, 30.0, 30.0, 30.0)
        else {
            panic!("expected a rounded rect");
        };
        assert_eq!(rr.radii().top_left, 5.0);
        assert_eq!(rr.radii().bottom_right, 5.0);
    }

    #[test]
    fn unbounded_contains_everything() {
        let region = ClipRegion::unbounded();
        assert!(region.is_unbounded());
        assert!(region.contains(Point::new(-1e6, 1e6)));
    }

    #[test]
    fn intersect_narrows_and_never_grows() {
        let a = ClipRegion::unbounded().intersect(
            ClipShape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0)),
            Affine::IDENTITY,
        );
        let b = a.intersect(
            ClipShape::Rect(Rect::new(25.0, 25.0, 100.0, 100.0)),
            Affine::IDENTITY,
        );
        assert_eq!(b.depth(), 2);
        assert_eq!(b.bounds(), Some(Rect::new(25.0, 25.0, 50.0, 50.0)));
        assert!(b.contains(Point::new(30.5, 30.5)));
        assert!(!b.contains(Point::new(10.5, 10.5)));
        assert!(!b.contains(Point::new(60.5, 60.5)));
        // The parent region is untouched.
        assert!(a.contains(Point::new(10.5, 10.5)));
    }

    #[test]
    fn shapes_are_tested_in_local_space() {
        let region = ClipRegion::unbounded().intersect(
            ClipShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Affine::translate(Vec2::new(0.0, 50.0)),
        );
        assert!(region.contains(Point::new(5.5, 55.5)));
        assert!(!region.contains(Point::new(5.5, 5.5)));
    }

    #[test]
    fn disjoint_clips_are_empty() {
        let region = ClipRegion::unbounded()
            .intersect(
                ClipShape::rounded_rect(Rect::new(50.0, 50.0, 100.0, 100.0), 0.0, 0.0, 0.0, 0.0),
                Affine::IDENTITY,
            )
            .intersect(
                ClipShape::Rect(Rect::new(0.0, 120.0, 100.0, 122.0)),
                Affine::IDENTITY,
            );
        assert!(region.is_empty());
        assert!(!region.contains(Point::new(60.5, 60.5)));
        assert!(!region.contains(Point::new(60.5, 120.5)));
    }

    #[test]
    fn singular_transform_empties_region() {
        let region = ClipRegion::unbounded().intersect(
            ClipShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Affine::scale_non_uniform(1.0, 0.0),
        );
        assert!(region.is_empty());
    }

    #[test]
    fn outline_clip_reuses_shared_path() {
        let mut b = PathBuilder::new();
        b.line_to(Vec2::new(10.0, 0.0))
            .line_to(Vec2::new(0.0, 10.0))
            .line_to(Vec2::new(-10.0, 0.0));
        let path = b.end();
        let first = ClipRegion::unbounded()
            .intersect(ClipShape::Outline(path.clone()), Affine::IDENTITY);
        let second = ClipRegion::unbounded().intersect(
            ClipShape::Outline(path),
            Affine::translate(Vec2::new(0.0, 50.0)),
        );
        assert!(first.contains(Point::new(5.5, 5.5)));
        assert!(!first.contains(Point::new(5.5, 55.5)));
        assert!(second.contains(Point::new(5.5, 55.5)));
        assert!(!second.contains(Point::new(5.5, 5.5)));
    }

    #[test]
    fn clones_share_nodes() {
        let a = ClipRegion::unbounded().intersect(
            ClipShape::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            Affine::IDENTITY,
        );
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        let c = a.intersect(
            ClipShape::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            Affine::IDENTITY,
        );
        assert!(!a.ptr_eq(&c));
    }
}
