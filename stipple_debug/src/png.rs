// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG output for pixel buffers.

use std::io::Cursor;
use std::path::Path;

use image::{ImageError, ImageFormat, RgbaImage};
use stipple_render::PixelBuffer;

/// Converts a buffer into an [`RgbaImage`].
#[must_use]
pub fn to_image(buffer: &PixelBuffer) -> RgbaImage {
    // `from_raw` only rejects a length mismatch.
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgba_bytes())
        .unwrap_or_else(|| RgbaImage::new(buffer.width(), buffer.height()))
}

/// Encodes a buffer as PNG bytes.
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let mut out = Cursor::new(Vec::new());
    to_image(buffer).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Writes a buffer to `path` as PNG.
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), ImageError> {
    to_image(buffer).save_with_format(path, ImageFormat::Png)
}
