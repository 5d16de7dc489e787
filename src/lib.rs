//! Library to reversibly remix image pixels.
//!
//! Every transform is keyed by its parameters, and replaying it in
//! [Mode::Decrypt] with the same parameters restores the original
//! buffer byte for byte:
//!
//! * `xor`, `adjacent_swap` and `random_swap` are their own inverse.
//! * `arithmetic`, `bit_shift` and `channel_shift` run the inverse
//!   operation on decrypt (add/subtract, multiply/divide modulo 256,
//!   rotate the other way, rotate channels back).
//! * `block_swap` regenerates the same per-block permutations and
//!   applies their inverse.
//!
//! Parameters that cannot be inverted (even multipliers, division by
//! zero) are rejected up front. This is pixel obfuscation, not
//! encryption in any cryptographic sense.

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
//

mod buffer;
mod engine;
mod error;
pub mod io;
mod permutation;
pub mod sample;
mod shuffle;
mod transform;

#[doc(inline)]
pub use crate::buffer::{PixelBuffer, CHANNELS};
#[doc(inline)]
pub use crate::engine::{apply, apply_raw, decrypt, encrypt};
#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::permutation::{invert, PermutationGenerator};
#[doc(inline)]
pub use crate::transform::{ArithmeticOp, Direction, Method, Mode, Params, Transform};
