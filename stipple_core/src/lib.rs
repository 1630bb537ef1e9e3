// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Op recording, macros, and ambient state for immediate-mode 2D drawing.
//!
//! `stipple_core` turns a flat, append-only stream of drawing instructions
//! into an ordered list of paint contributions. It is `no_std` compatible
//! (with `alloc`) and stores every recording session in one arena addressed
//! by generational handles, so recorded macros can be invoked many times and
//! across frames without being copied.
//!
//! # Architecture
//!
//! Data flows one way, from producer to rasterizer:
//!
//! ```text
//!   PathBuilder ──► Path ──► ClipShape
//!                               │
//!   Producer ──► Ops::begin/append/freeze ──► Macro
//!                               │
//!                               ▼
//!   Ops::play(root) ── StateStack ──► PaintPlan ──► rasterizer
//! ```
//!
//! **[`ops`]**: The recording arena. Sessions nest; the innermost open
//! session receives appended [`Op`]s until it is frozen into a [`Macro`].
//!
//! **[`state`]**: Snapshot stack of (transform, clip) pairs. `PushState`
//! clones the current snapshot, `PopState` restores it.
//!
//! **[`path`]** / **[`clip`]**: Closed polygonal outlines and the clip
//! shapes that intersect into a [`ClipRegion`].
//!
//! **[`paint`]** / **[`gradient`]**: Paint sources and the linear-light
//! gradient sampler.
//!
//! **[`playback`]**: Expands a frozen root macro, resolving macro calls and
//! deferred macros into a back-to-front [`PaintPlan`].
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! playback instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Conventions
//!
//! - Transforms compose parent-then-child: applying `m` to an ambient
//!   transform `a` yields `a * m`, so child geometry is mapped by `m` first.
//! - Clip shapes use the nonzero winding rule.
//! - Colors are 8-bit sRGB with straight alpha; interpolation and blending
//!   happen in linear sRGB.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod clip;
pub mod error;
pub mod gradient;
pub mod ops;
pub mod paint;
pub mod path;
pub mod plan;
pub mod playback;
pub mod state;
pub mod trace;

pub use clip::{ClipRegion, ClipShape};
pub use error::{Error, ImbalanceKind};
pub use ops::{Macro, MacroId, Op, Ops, ScopeMark};
pub use paint::{LinearGradient, PaintSource};
pub use path::{Path, PathBuilder};
pub use plan::{PaintItem, PaintPlan};
pub use state::{Snapshot, StateStack};

pub use color::Rgba8;
pub use kurbo;
