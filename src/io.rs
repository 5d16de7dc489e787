// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::io::Reader as ImageReader;
use image::{save_buffer, ColorType, ImageFormat};
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Decodes an image file into RGB8, dropping alpha if present.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let im = ImageReader::new(BufReader::new(File::open(path)?))
        .with_guessed_format()?
        .decode()?
        .into_rgb8();

    debug!(path = %path.display(), width = im.width(), height = im.height(), "loaded image");
    PixelBuffer::from_raw(im.width() as usize, im.height() as usize, im.into_raw())
}

/// Writes `buffer` as RGB8, format chosen from the file extension.
pub fn save_rgb(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<()> {
    let path = path.as_ref();
    if is_lossy(path) {
        warn!(
            path = %path.display(),
            "lossy output format, decrypting this file will not restore the original exactly"
        );
    }

    let (width, height) = dimensions(buffer.width(), buffer.height())?;
    save_buffer(
        path,
        buffer.view().as_slice().expect("Should be standard-layout"),
        width,
        height,
        ColorType::Rgb8,
    )?;

    debug!(path = %path.display(), width, height, "saved image");
    Ok(())
}

fn dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
        .into()),
    }
}

/// Whether saving to `path` would re-encode pixels lossily.
pub fn is_lossy(path: &Path) -> bool {
    matches!(ImageFormat::from_path(path), Ok(ImageFormat::Jpeg))
}
