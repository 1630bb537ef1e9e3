// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fatal recording and playback errors.
//!
//! Every variant describes a malformed op stream. None of them are retried:
//! the pass that hit the error is aborted and the error is handed back to the
//! caller. Conditions that merely produce no output (an empty clip, a
//! degenerate gradient) are not errors.

use core::fmt;

use crate::ops::MacroId;

/// Location of an op inside a recording session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpSite {
    /// Session holding the op.
    pub session: MacroId,
    /// Zero-based index of the op within that session.
    pub op_index: usize,
}

impl fmt::Display for OpSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.session, self.op_index)
    }
}

/// Which side of a push/pop pair is missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImbalanceKind {
    /// A `PopState` with no matching `PushState` in the same session.
    PopWithoutPush,
    /// The session was frozen while `open` pushes were still unpopped.
    UnpoppedAtFreeze {
        /// Number of unmatched `PushState`s.
        open: u32,
    },
}

impl fmt::Display for ImbalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopWithoutPush => f.write_str("pop without matching push"),
            Self::UnpoppedAtFreeze { open } => write!(f, "{open} push(es) left open at freeze"),
        }
    }
}

/// Renders an optional [`OpSite`] as a message suffix.
struct At(Option<OpSite>);

fn suffix(at: &Option<OpSite>) -> At {
    At(*at)
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(site) => write!(f, " (referenced at {site})"),
            None => Ok(()),
        }
    }
}

/// A fatal error in an op stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Unbalanced `PushState`/`PopState` nesting.
    #[error("state imbalance in session {session} at op {op_index}: {kind}")]
    StateImbalance {
        /// Session holding the offending op.
        session: MacroId,
        /// Index of the op (the session length for freeze-time failures).
        op_index: usize,
        /// Which side of the pair is missing.
        kind: ImbalanceKind,
    },
    /// A session was used as a macro before being frozen, or frozen twice.
    #[error("session {id} is not a finalized macro{}", suffix(.at))]
    MacroNotFinalized {
        /// The session in question.
        id: MacroId,
        /// The `MacroRef`/`Defer` op that reached it, if any.
        at: Option<OpSite>,
    },
    /// A macro was reached again while it was already being expanded.
    #[error("macro {id} references itself at expansion depth {depth}{}", suffix(.at))]
    MacroCycle {
        /// The macro that closed the cycle.
        id: MacroId,
        /// Number of macros on the invocation path when the cycle was found.
        depth: usize,
        /// The op that re-entered the macro.
        at: Option<OpSite>,
    },
    /// The handle does not name a live session in this arena.
    #[error("unknown or released session {id}{}", suffix(.at))]
    UnknownMacro {
        /// The stale or foreign handle.
        id: MacroId,
        /// The op that referenced it, if any.
        at: Option<OpSite>,
    },
    /// An op was appended while no recording session was open.
    #[error("no recording session is open")]
    NoActiveRecording,
    /// A session was frozen while a session nested inside it was still open.
    #[error("session {id} cannot be frozen before the innermost open session {innermost}")]
    RecordingOrder {
        /// The session the caller tried to freeze.
        id: MacroId,
        /// The innermost open session, which must be frozen first.
        innermost: MacroId,
    },
}
