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

use ndarray::prelude::*;

use crate::error::{Error, Result};

/// Bytes per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Row-major RGB pixel grid, shaped `(height, width, 3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
}

impl PixelBuffer {
    /// Wraps a flat RGB byte buffer.
    ///
    /// Fails with [Error::DimensionMismatch] if `data` is not exactly
    /// `width * height * 3` bytes, or if the image is empty.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS));
        let actual = data.len();
        let mismatch = || Error::DimensionMismatch {
            width,
            height,
            expected: expected.unwrap_or(usize::MAX),
            actual,
        };

        match expected {
            Some(n) if n != 0 && n == actual => (),
            _ => return Err(mismatch()),
        }

        let pixels = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|_| mismatch())?;
        Ok(Self { pixels })
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixels.slice(s![y, x, ..]);
        Some([p[0], p[1], p[2]])
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.pixels.view_mut()
    }

    /// Flat row-major RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels.into_raw_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_matching_buffer() {
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::from_raw(4, 2, data.clone()).unwrap();

        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.pixel_count(), 8);
        assert_eq!(buf.get(0, 0), Some([0, 1, 2]));
        assert_eq!(buf.get(1, 1), Some([15, 16, 17]));
        assert_eq!(buf.get(4, 0), None);
        assert_eq!(buf.into_raw(), data);
    }

    #[test]
    fn rejects_wrong_length() {
        let r = PixelBuffer::from_raw(2, 2, vec![0; 11]);
        assert!(matches!(
            r,
            Err(Error::DimensionMismatch {
                expected: 12,
                actual: 11,
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            PixelBuffer::from_raw(0, 5, vec![]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(0, 0, vec![]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        assert!(matches!(
            PixelBuffer::from_raw(usize::MAX, 2, vec![0; 6]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
