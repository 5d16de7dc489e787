// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use ndarray::prelude::*;
use rayon::prelude::*;

use crate::permutation::{invert, PermutationGenerator};
use crate::transform::Mode;

/// Swaps pixel pairs picked by the seeded generator.
///
/// `round(percentage * pixels)` distinct positions are drawn and paired
/// in draw order. Pairs are disjoint, so running it again with the same
/// seed undoes it.
pub(crate) fn random_swap(mut arr: ArrayViewMut3<'_, u8>, percentage: f64, seed: u64) {
    let (height, width, channels) = arr.dim();
    let total = height * width;
    let count = (percentage * total as f64).round() as usize;

    let positions = PermutationGenerator::new(seed).next_indices(count, total);

    for pair in positions.chunks_exact(2) {
        let (y1, x1) = (pair[0] / width, pair[0] % width);
        let (y2, x2) = (pair[1] / width, pair[1] % width);
        for c in 0..channels {
            arr.swap([y1, x1, c], [y2, x2, c]);
        }
    }
}

/// Shuffles pixels inside each `block_size` square block.
///
/// Blocks are laid out row-major from the top-left corner; blocks on the
/// right and bottom edges are clipped to the image. Every block gets its
/// own permutation, drawn in block order before any pixel moves, so the
/// parallel pass never changes which block gets which permutation.
/// Decrypt applies the inverse permutations.
pub(crate) fn block_swap(mut arr: ArrayViewMut3<'_, u8>, block_size: usize, seed: u64, mode: Mode) {
    let (height, width, _) = arr.dim();
    let blocks_x = width.div_ceil(block_size);
    let blocks_y = height.div_ceil(block_size);

    let mut random = PermutationGenerator::new(seed);
    let mut perms = Vec::with_capacity(blocks_x * blocks_y);
    for by in 0..blocks_y {
        let bh = block_size.min(height - by * block_size);
        for bx in 0..blocks_x {
            let bw = block_size.min(width - bx * block_size);
            let perm = random.permutation(bh * bw);
            perms.push(match mode {
                Mode::Encrypt => perm,
                Mode::Decrypt => invert(&perm),
            });
        }
    }
    debug_assert_eq!(perms.len(), blocks_x * blocks_y);

    let bands: Vec<_> = arr.axis_chunks_iter_mut(Axis(0), block_size).collect();
    bands
        .into_par_iter()
        .zip(perms.par_chunks(blocks_x))
        .for_each(|(mut band, perms)| {
            for (bx, perm) in perms.iter().enumerate() {
                let x = bx * block_size;
                let mut block = band.slice_mut(s![.., x..(x + block_size).min(width), ..]);

                let src: Vec<[u8; 3]> = block
                    .lanes(Axis(2))
                    .into_iter()
                    .map(|p| [p[0], p[1], p[2]])
                    .collect();

                for (mut dst, &i) in block.lanes_mut(Axis(2)).into_iter().zip(perm) {
                    for (d, s) in dst.iter_mut().zip(src[i]) {
                        *d = s;
                    }
                }
            }
        });
}
