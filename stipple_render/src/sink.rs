// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer contract for finished frames.
//!
//! Stipple stops at the pixel buffer. Whatever displays or uploads a frame
//! (a window surface, a GPU texture, a PNG writer, a test harness) implements
//! [`FrameSink`] and is handed each buffer read-only through
//! [`Rasterizer::present`](crate::Rasterizer::present).
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! let mut raster = Rasterizer::new(RasterConfig::default());
//! let button = raster.ops_mut().record(|ops| {
//!     ops.fill_shape(Rect::new(0.0, 0.0, 40.0, 20.0), GREY)
//! })?;
//! loop {
//!     raster.frame(|ops| {
//!         ops.save(|ops| {
//!             ops.offset((x, y))?;
//!             ops.invoke(button)
//!         })
//!     })?;
//!     raster.present(&mut sink);
//! }
//! ```

use crate::buffer::PixelBuffer;

/// Summary of a finished frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    /// Monotonic frame counter, starting at zero.
    pub frame_index: u64,
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Paint items rasterized.
    pub painted: usize,
    /// Commits skipped because of an empty clip or singular transform.
    pub skipped: usize,
}

/// Receives finished frames.
pub trait FrameSink {
    /// Consumes one frame. The buffer stays owned by the rasterizer.
    fn present(&mut self, frame: &FrameInfo, buffer: &PixelBuffer);
}
