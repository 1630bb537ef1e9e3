// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint plan: the ordered paint contributions of one frame.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::clip::ClipRegion;
use crate::ops::MacroId;
use crate::paint::PaintSource;

/// A single resolved `Commit`.
///
/// Everything needed to rasterize the paint is captured by value, so items
/// can be consumed after the arena has moved on.
#[derive(Clone, Debug)]
pub struct PaintItem {
    /// Local-to-device transform ambient at the commit. Always invertible.
    pub transform: Affine,
    /// Visible region ambient at the commit. Never empty.
    pub clip: ClipRegion,
    /// What to paint.
    pub source: PaintSource,
    /// Whether the commit ran from the deferred queue.
    pub deferred: bool,
    /// Session holding the `Commit`.
    pub session: MacroId,
    /// Index of the `Commit` within its session.
    pub op_index: usize,
}

/// Paint items for one frame in back-to-front order.
///
/// Immediate items come first, in stream order, followed by deferred items
/// in the order their macros were deferred.
#[derive(Clone, Debug, Default)]
pub struct PaintPlan {
    /// Items in back-to-front order.
    pub items: Vec<PaintItem>,
    /// Commits dropped because of an empty clip or singular transform.
    pub skipped: usize,
}

impl PaintPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.skipped = 0;
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing will be painted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items that came from the deferred queue.
    #[must_use]
    pub fn deferred_count(&self) -> usize {
        self.items.iter().filter(|item| item.deferred).count()
    }
}
