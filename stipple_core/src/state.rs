// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ambient transform and clip, saved and restored as value snapshots.
//!
//! The stack never mutates a saved snapshot: [`StateStack::push`] clones the
//! current one and [`StateStack::pop`] replaces the current one with the most
//! recent saved copy. Clip regions share structure, so a push costs one
//! reference-count bump.
//!
//! # Composition order
//!
//! Transforms compose parent-then-child. Applying `m` while the ambient
//! transform is `a` makes the ambient transform `a * m`: child coordinates are
//! mapped by `m` first and by the parent afterwards.

use alloc::vec::Vec;

use kurbo::{Affine, Vec2};

use crate::clip::{ClipRegion, ClipShape};

/// An ambient (transform, clip) pair.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// Local-to-device transform.
    pub transform: Affine,
    /// Device-space visible region.
    pub clip: ClipRegion,
}

impl Snapshot {
    /// Identity transform, unbounded clip.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }
}

/// Save/restore stack of [`Snapshot`]s.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: Snapshot,
    saved: Vec<Snapshot>,
}

impl StateStack {
    /// Creates a stack whose current state is the identity snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack whose current state is `base`.
    #[must_use]
    pub fn with_base(base: Snapshot) -> Self {
        Self {
            current: base,
            saved: Vec::new(),
        }
    }

    /// The ambient snapshot.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Number of saved snapshots.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Saves a copy of the ambient snapshot.
    pub fn push(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restores the most recently saved snapshot.
    ///
    /// Returns the discarded ambient snapshot, or `None` (leaving the state
    /// untouched) when nothing was saved.
    pub fn pop(&mut self) -> Option<Snapshot> {
        let restored = self.saved.pop()?;
        Some(core::mem::replace(&mut self.current, restored))
    }

    /// Composes a translation onto the ambient transform.
    pub fn apply_offset(&mut self, v: Vec2) {
        self.apply_affine(Affine::translate(v));
    }

    /// Composes `m` onto the ambient transform: `current = current * m`.
    pub fn apply_affine(&mut self, m: Affine) {
        self.current.transform *= m;
    }

    /// Narrows the ambient clip by `shape` under the ambient transform.
    pub fn apply_clip(&mut self, shape: ClipShape) {
        self.current.clip = self.current.clip.intersect(shape, self.current.transform);
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use kurbo::{Point, Rect};

    use super::*;

    fn assert_near(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn pop_discards_changes_since_push() {
        let mut s = StateStack::new();
        s.apply_offset(Vec2::new(5.0, 0.0));
        s.push();
        s.apply_offset(Vec2::new(0.0, 7.0));
        s.apply_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(s.depth(), 1);
        assert!(s.pop().is_some());
        assert_eq!(s.current().transform, Affine::translate((5.0, 0.0)));
        assert!(s.current().clip.is_unbounded());
    }

    #[test]
    fn pop_without_push_is_reported() {
        let mut s = StateStack::new();
        s.apply_offset(Vec2::new(1.0, 1.0));
        assert!(s.pop().is_none());
        // The ambient state is left alone.
        assert_eq!(s.current().transform, Affine::translate((1.0, 1.0)));
    }

    #[test]
    fn child_transform_is_applied_before_parent() {
        // Offset by (50, 0), then rotate 90 degrees about the new origin.
        let mut s = StateStack::new();
        s.apply_offset(Vec2::new(50.0, 0.0));
        s.apply_affine(Affine::rotate(FRAC_PI_2));
        let mapped = s.current().transform * Point::new(10.0, 0.0);
        assert_near(mapped, Point::new(50.0, 10.0));
    }

    #[test]
    fn clip_is_placed_with_the_ambient_transform() {
        let mut s = StateStack::new();
        s.apply_offset(Vec2::new(0.0, 50.0));
        s.apply_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let clip = &s.current().clip;
        assert!(clip.contains(Point::new(5.5, 55.5)));
        assert!(!clip.contains(Point::new(5.5, 5.5)));
    }

    #[test]
    fn later_transforms_do_not_move_earlier_clips() {
        let mut s = StateStack::new();
        s.apply_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        s.apply_offset(Vec2::new(100.0, 100.0));
        assert!(s.current().clip.contains(Point::new(5.5, 5.5)));
    }

    #[test]
    fn with_base_starts_from_captured_state() {
        let base = Snapshot {
            transform: Affine::translate((3.0, 4.0)),
            clip: ClipRegion::unbounded(),
        };
        let s = StateStack::with_base(base);
        assert_eq!(s.depth(), 0);
        assert_eq!(s.current().transform, Affine::translate((3.0, 4.0)));
    }
}
