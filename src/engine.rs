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
use ndarray::Zip;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::shuffle;
use crate::transform::{ArithmeticOp, Direction, Mode, Transform};

/// Multiplicative inverse of an odd byte modulo 256.
fn inverse_mod_256(v: u8) -> u8 {
    debug_assert_eq!(v & 1, 1);

    // Newton iteration, each step doubles the number of correct low bits.
    let mut inv = v;
    for _ in 0..3 {
        inv = inv.wrapping_mul(2u8.wrapping_sub(v.wrapping_mul(inv)));
    }
    inv
}

fn arithmetic(b: u8, op: ArithmeticOp, value: u8) -> u8 {
    match op {
        ArithmeticOp::Add => b.wrapping_add(value),
        ArithmeticOp::Subtract => b.wrapping_sub(value),
        ArithmeticOp::Multiply => b.wrapping_mul(value),
        ArithmeticOp::Divide => b.wrapping_mul(inverse_mod_256(value)),
    }
}

fn rotate(b: u8, amount: u32, direction: Direction) -> u8 {
    match direction {
        Direction::Left => b.rotate_left(amount),
        Direction::Right => b.rotate_right(amount),
    }
}

fn map_bytes(arr: &mut ArrayViewMut3<'_, u8>, f: impl Fn(u8) -> u8 + Sync + Send) {
    arr.par_map_inplace(|b| *b = f(*b));
}

/// Rotates channel order left by `shift`: `R,G,B` becomes `G,B,R` for 1.
fn channel_shift(arr: &mut ArrayViewMut3<'_, u8>, shift: usize) {
    if shift % 3 == 0 {
        return;
    }
    Zip::from(arr.lanes_mut(Axis(2))).par_for_each(|mut px| {
        let p = [px[0], px[1], px[2]];
        for (c, v) in px.iter_mut().enumerate() {
            *v = p[(c + shift) % 3];
        }
    });
}

/// Swaps horizontally adjacent pixel pairs in every row.
///
/// A trailing odd pixel stays in place.
fn adjacent_swap(arr: &mut ArrayViewMut3<'_, u8>) {
    arr.axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            for mut pair in row.exact_chunks_mut((2, 3)) {
                for c in 0..3 {
                    pair.swap([0, c], [1, c]);
                }
            }
        });
}

/// Applies `transform` to `buffer` in place.
///
/// The descriptor is validated first; on error the buffer is untouched.
pub fn apply(buffer: &mut PixelBuffer, transform: &Transform, mode: Mode) -> Result<()> {
    transform.validate()?;

    debug!(
        method = %transform.method(),
        ?mode,
        width = buffer.width(),
        height = buffer.height(),
        "applying transform"
    );

    let mut arr = buffer.view_mut();
    match *transform {
        Transform::Xor { key } => map_bytes(&mut arr, move |b| b ^ key),
        Transform::Arithmetic { op, value } => {
            let op = match mode {
                Mode::Encrypt => op,
                Mode::Decrypt => op.inverse(),
            };
            map_bytes(&mut arr, move |b| arithmetic(b, op, value));
        }
        Transform::BitShift { amount, direction } => {
            let direction = match mode {
                Mode::Encrypt => direction,
                Mode::Decrypt => direction.reverse(),
            };
            map_bytes(&mut arr, move |b| rotate(b, amount, direction));
        }
        Transform::AdjacentSwap => adjacent_swap(&mut arr),
        Transform::RandomSwap { percentage, seed } => {
            shuffle::random_swap(arr, percentage, seed)
        }
        Transform::BlockSwap { block_size, seed } => {
            shuffle::block_swap(arr, block_size, seed, mode)
        }
        Transform::ChannelShift { shift } => {
            let shift = match mode {
                Mode::Encrypt => shift as usize,
                Mode::Decrypt => (3 - shift as usize) % 3,
            };
            channel_shift(&mut arr, shift);
        }
    }

    Ok(())
}

/// Applies `transform` to a flat `width * height * 3` RGB buffer.
pub fn apply_raw(
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    transform: &Transform,
    mode: Mode,
) -> Result<Vec<u8>> {
    transform.validate()?;
    let mut buffer = PixelBuffer::from_raw(width, height, pixels)?;
    apply(&mut buffer, transform, mode)?;
    Ok(buffer.into_raw())
}

pub fn encrypt(buffer: &mut PixelBuffer, transform: &Transform) -> Result<()> {
    apply(buffer, transform, Mode::Encrypt)
}

pub fn decrypt(buffer: &mut PixelBuffer, transform: &Transform) -> Result<()> {
    apply(buffer, transform, Mode::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn buffer(width: usize, height: usize) -> PixelBuffer {
        let data = (0..width * height * 3)
            .map(|i| (i * 37 + 11) as u8)
            .collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn inverse_mod_256_is_exact() {
        for v in (1..=255u8).step_by(2) {
            assert_eq!(v.wrapping_mul(inverse_mod_256(v)), 1, "v = {v}");
        }
    }

    #[test]
    fn rotation_inverts_for_every_byte() {
        for v in 0..=255u8 {
            for n in 0..8 {
                let r = rotate(v, n, Direction::Left);
                assert_eq!(rotate(r, n, Direction::Right), v);
            }
        }
    }

    #[test]
    fn xor_twice_with_encrypt_is_identity() {
        let orig = buffer(5, 4);
        let t = Transform::xor(200).unwrap();
        let mut buf = orig.clone();
        encrypt(&mut buf, &t).unwrap();
        assert_ne!(buf, orig);
        encrypt(&mut buf, &t).unwrap();
        assert_eq!(buf, orig);
    }

    #[test]
    fn add_wraps_instead_of_clamping() {
        let t = Transform::arithmetic(ArithmeticOp::Add, 50).unwrap();
        let out = apply_raw(1, 1, vec![250, 0, 205], &t, Mode::Encrypt).unwrap();
        assert_eq!(out, vec![44, 50, 255]);
        let back = apply_raw(1, 1, out, &t, Mode::Decrypt).unwrap();
        assert_eq!(back, vec![250, 0, 205]);
    }

    #[test]
    fn multiply_and_divide_invert_each_other() {
        for op in [ArithmeticOp::Multiply, ArithmeticOp::Divide] {
            let t = Transform::arithmetic(op, 77).unwrap();
            let data: Vec<u8> = (0..=255).collect::<Vec<_>>().repeat(3);
            let enc = apply_raw(16, 16, data.clone(), &t, Mode::Encrypt).unwrap();
            assert_ne!(enc, data);
            let dec = apply_raw(16, 16, enc, &t, Mode::Decrypt).unwrap();
            assert_eq!(dec, data);
        }
    }

    #[test]
    fn bit_shift_is_circular() {
        let t = Transform::bit_shift(3, Direction::Left).unwrap();
        let out = apply_raw(1, 1, vec![0b1110_0001, 0xff, 0], &t, Mode::Encrypt).unwrap();
        assert_eq!(out, vec![0b0000_1111, 0xff, 0]);
    }

    #[test]
    fn adjacent_swap_pairs_and_odd_tail() {
        let t = Transform::adjacent_swap();
        let data: Vec<u8> = (0..9).collect();
        let out = apply_raw(3, 1, data, &t, Mode::Encrypt).unwrap();
        assert_eq!(out, vec![3, 4, 5, 0, 1, 2, 6, 7, 8]);
    }

    #[test]
    fn single_pixel_adjacent_swap_is_noop() {
        let t = Transform::adjacent_swap();
        let out = apply_raw(1, 1, vec![1, 2, 3], &t, Mode::Encrypt).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn channel_shift_rotates_left() {
        let t1 = Transform::channel_shift(1).unwrap();
        let t2 = Transform::channel_shift(2).unwrap();
        assert_eq!(
            apply_raw(1, 1, vec![10, 20, 30], &t1, Mode::Encrypt).unwrap(),
            vec![20, 30, 10]
        );
        assert_eq!(
            apply_raw(1, 1, vec![10, 20, 30], &t2, Mode::Encrypt).unwrap(),
            vec![30, 10, 20]
        );
    }

    #[test]
    fn channel_shift_three_times_is_identity() {
        let orig = buffer(4, 3);
        let t = Transform::channel_shift(1).unwrap();
        let mut buf = orig.clone();
        for _ in 0..3 {
            encrypt(&mut buf, &t).unwrap();
        }
        assert_eq!(buf, orig);
    }

    #[test]
    fn channel_shift_decrypt_matches_shift_two() {
        let orig = buffer(4, 3);
        let mut a = orig.clone();
        let mut b = orig.clone();
        decrypt(&mut a, &Transform::channel_shift(1).unwrap()).unwrap();
        encrypt(&mut b, &Transform::channel_shift(2).unwrap()).unwrap();
        assert_eq!(a, b);

        encrypt(&mut a, &Transform::channel_shift(1).unwrap()).unwrap();
        assert_eq!(a, orig);
    }

    #[test]
    fn invalid_descriptor_leaves_buffer_untouched() {
        let orig = buffer(3, 3);
        let mut buf = orig.clone();
        let bad = Transform::Arithmetic {
            op: ArithmeticOp::Divide,
            value: 0,
        };
        assert!(matches!(
            apply(&mut buf, &bad, Mode::Encrypt),
            Err(Error::InvalidParameter { .. })
        ));
        assert_eq!(buf, orig);

        let bad = Transform::Arithmetic {
            op: ArithmeticOp::Multiply,
            value: 8,
        };
        assert!(matches!(
            apply(&mut buf, &bad, Mode::Encrypt),
            Err(Error::InvalidParameter { .. })
        ));
        assert_eq!(buf, orig);
    }

    #[test]
    fn apply_raw_checks_dimensions() {
        let t = Transform::xor(1).unwrap();
        assert!(matches!(
            apply_raw(2, 2, vec![0; 13], &t, Mode::Encrypt),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            apply_raw(0, 0, vec![], &t, Mode::Encrypt),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
