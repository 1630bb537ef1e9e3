// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, Chrome trace export, op dumps and PNG output
//! for stipple diagnostics.
//!
//! This crate provides [`TraceSink`](stipple_core::trace::TraceSink)
//! implementations and buffer/op-stream inspection helpers for development
//! and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: timestamped in-memory event capture.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recording.
//! - [`dump::dump_ops`]: text listing of every live session in an arena.
//! - [`png`]: PNG encoding of [`PixelBuffer`](stipple_render::PixelBuffer)s.

pub mod chrome;
pub mod dump;
pub mod png;
pub mod pretty;
pub mod recorder;
