// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The instruction set.

use kurbo::Affine;

use super::id::MacroId;
use crate::clip::ClipShape;
use crate::paint::PaintSource;

/// One recorded drawing instruction.
///
/// Ops are immutable once appended to a session.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Compose a transform onto the ambient transform.
    Transform(Affine),
    /// Narrow the ambient clip.
    Clip(ClipShape),
    /// Replace the current paint source.
    SetPaintSource(PaintSource),
    /// Paint the current source into the ambient clip.
    Commit,
    /// Save the ambient transform and clip.
    PushState,
    /// Restore the most recently saved transform and clip.
    PopState,
    /// Expand another session's ops inline.
    MacroRef(MacroId),
    /// Queue another session for expansion after all immediate ops.
    Defer(MacroId),
}

impl Op {
    /// Short lowercase name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transform(_) => "transform",
            Self::Clip(_) => "clip",
            Self::SetPaintSource(_) => "source",
            Self::Commit => "commit",
            Self::PushState => "push",
            Self::PopState => "pop",
            Self::MacroRef(_) => "call",
            Self::Defer(_) => "defer",
        }
    }

    /// The session this op references, if any.
    #[must_use]
    pub const fn target(&self) -> Option<MacroId> {
        match self {
            Self::MacroRef(id) | Self::Defer(id) => Some(*id),
            _ => None,
        }
    }
}
