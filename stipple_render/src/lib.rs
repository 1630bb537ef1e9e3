// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU rasterization and frame sequencing for stipple.
//!
//! This crate sits between [`stipple_core`]'s playback and whatever displays
//! the result. It provides:
//!
//! - [`PixelBuffer`]: a display-space RGBA grid
//! - [`PaintEngine`]: pixel-center coverage and linear-light source-over
//! - [`Rasterizer`]: the record, freeze, play, release, rasterize frame loop
//! - [`FrameSink`]: the consumer contract for finished frames
//! - [`RasterConfig`]: target size and background
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Forwards to `stipple_core/trace`.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod buffer;
mod config;
mod engine;
mod rasterizer;
mod sink;

pub use buffer::PixelBuffer;
pub use config::{RasterConfig, WHITE};
pub use engine::PaintEngine;
pub use rasterizer::Rasterizer;
pub use sink::{FrameInfo, FrameSink};
