// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording-session and macro identity types.

use core::fmt;

/// A handle to a recording session in an [`Ops`](super::Ops) arena.
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a session is released and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacroId {
    /// Slot index into the arena's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the arena's generation for this slot.
    pub(crate) generation: u32,
}

impl MacroId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for MacroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacroId({}@gen{})", self.idx, self.generation)
    }
}

impl fmt::Display for MacroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.idx, self.generation)
    }
}

/// A frozen, immutable recording.
///
/// Only [`Ops::freeze`](super::Ops::freeze) produces a `Macro`, so holding one
/// proves the session was closed at the time. The handle is `Copy`; invoking
/// it any number of times never mutates the recorded ops.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Macro(pub(crate) MacroId);

impl Macro {
    /// Returns the session identity of this macro.
    #[inline]
    #[must_use]
    pub const fn id(self) -> MacroId {
        self.0
    }
}

impl From<Macro> for MacroId {
    #[inline]
    fn from(m: Macro) -> Self {
        m.0
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Macro({}@gen{})", self.0.idx, self.0.generation)
    }
}
