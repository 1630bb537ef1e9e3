// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Op recording and the macro arena.
//!
//! A *session* is an append-only list of [`Op`]s. Each session has:
//!
//! - An identity ([`MacroId`]), a generational handle that becomes stale when
//!   the session is released.
//! - A recording state: open while ops are being appended, frozen once
//!   [`freeze`](Ops::freeze) has turned it into a [`Macro`].
//! - A push depth, so unbalanced `PushState`/`PopState` nesting is caught
//!   while recording instead of during playback.
//!
//! Sessions nest. [`begin`](Ops::begin) opens a session inside the current
//! one, and every op appended afterwards lands in the innermost open session
//! until that session is frozen. Recording a macro in the middle of a frame
//! therefore leaves the frame's own op list untouched.
//!
//! Sessions begun after a [`ScopeMark`] can be freed together with
//! [`Ops::release_scope`]; [`Ops::retain`] exempts a macro from that.
//!
//! Sessions are stored in struct-of-arrays layout with index-based handles.
//! Playback ([`Ops::play`]) borrows the arena immutably, so a frozen macro can
//! be expanded any number of times, from any number of independent passes.

mod id;
mod op;
mod store;

pub use id::{Macro, MacroId};
pub use op::Op;
pub use store::{Ops, ScopeMark};
