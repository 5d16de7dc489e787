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

use ndarray::parallel::prelude::*;
use ndarray::prelude::*;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::Result;

/// Gradient test image: red grows down, green grows right, blue along the diagonal.
pub fn gradient(width: usize, height: usize) -> Result<PixelBuffer> {
    let mut arr = Array3::<u8>::zeros((height, width, CHANNELS));
    par_azip!((index (y, x, c), v in &mut arr) {
        let level = match c {
            0 => y * 255 / height,
            1 => x * 255 / width,
            _ => (x + y) * 255 / (width + height),
        };
        *v = level as u8;
    });

    PixelBuffer::from_raw(width, height, arr.into_raw_vec())
}
