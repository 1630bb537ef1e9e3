// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed polygonal outlines built from a cursor and relative segments.
//!
//! A [`PathBuilder`] keeps a pen position. [`move_to`](PathBuilder::move_to)
//! repositions the pen absolutely and starts a new sub-path;
//! [`line_to`](PathBuilder::line_to) draws a segment by a *relative*
//! displacement. [`end`](PathBuilder::end) closes every sub-path back to its
//! start and yields an immutable [`Path`].
//!
//! Paths are filled with the nonzero winding rule. A point is inside when the
//! signed number of times the outline winds around it is not zero, so a
//! self-intersecting star covers its center.

use alloc::sync::Arc;

use kurbo::{BezPath, Point, Rect, Shape, Vec2};

/// An immutable closed outline in local coordinates.
///
/// Cloning is a reference-count bump; the geometry is shared by every clone
/// and never carries a transform of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    geometry: Arc<BezPath>,
}

impl Path {
    /// Builds a closed polygon through the given absolute points.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        let mut builder = PathBuilder::new();
        if let Some((&first, rest)) = points.split_first() {
            builder.move_to(first);
            let mut prev = first;
            for &p in rest {
                builder.line_to(p - prev);
                prev = p;
            }
        }
        builder.end()
    }

    /// Returns the underlying Bézier path.
    #[inline]
    #[must_use]
    pub fn as_bez_path(&self) -> &BezPath {
        &self.geometry
    }

    /// Returns `true` when the outline has no drawn segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometry.segments().next().is_none()
    }

    /// Nonzero-rule membership test in local coordinates.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.geometry.winding(p) != 0
    }

    /// Axis-aligned bounds of the outline in local coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        if self.is_empty() {
            return Rect::ZERO;
        }
        self.geometry.bounding_box()
    }

    /// Returns `true` if both handles share the same geometry allocation.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }
}

/// Incremental builder for a [`Path`].
#[derive(Clone, Debug)]
pub struct PathBuilder {
    path: BezPath,
    cursor: Point,
    start: Point,
    in_subpath: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    /// Starts a path with the cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::begin_at(Point::ORIGIN)
    }

    /// Starts a path with the cursor at `cursor`.
    #[must_use]
    pub fn begin_at(cursor: Point) -> Self {
        Self {
            path: BezPath::new(),
            cursor,
            start: cursor,
            in_subpath: false,
        }
    }

    /// Current pen position.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Moves the pen to the absolute point `p` without drawing.
    ///
    /// Closes the current sub-path, if any.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.close_subpath();
        self.cursor = p;
        self.start = p;
        self
    }

    /// Draws a segment from the pen by `delta` and advances the pen.
    pub fn line_to(&mut self, delta: Vec2) -> &mut Self {
        if !self.in_subpath {
            self.path.move_to(self.cursor);
            self.start = self.cursor;
            self.in_subpath = true;
        }
        self.cursor += delta;
        self.path.line_to(self.cursor);
        self
    }

    /// Closes every sub-path and returns the finished outline.
    #[must_use]
    pub fn end(mut self) -> Path {
        self.close_subpath();
        Path {
            geometry: Arc::new(self.path),
        }
    }

    fn close_subpath(&mut self) {
        if self.in_subpath {
            self.path.close_path();
            self.in_subpath = false;
            self.cursor = self.start;
        }
    }
}
