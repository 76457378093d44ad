//! Library to undo a seeded tile shuffle on images.
//!
//! The scrambler cuts an image into a 4×4 grid of tiles (each side
//! rounded down to a multiple of 8 pixels) and reorders the tiles by a
//! permutation derived from a 32-bit seed. Given the same seed,
//! [descramble_image] puts every tile back.
//!
//! * [generate_permutation] derives the tile order from the seed.
//! * [descramble_array] / [scramble_array] move tiles of any
//!   [ndarray] whose first 2 axes are rows and columns.
//! * [batch] fetches, descrambles and saves a list of pages in parallel.

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

pub mod batch;
pub mod config;
mod permutation;
mod shuffle;
pub mod source;
mod xorshift;

#[doc(inline)]
pub use crate::permutation::{generate_permutation, invert};
#[doc(inline)]
pub use crate::shuffle::{
    descramble_array, descramble_image, scramble_array, scramble_image, transform_array,
    transform_image, DescrambleError, Direction, TileGeometry, BLOCK_ALIGN, DIVISIONS, GRID_SIZE,
};
#[doc(inline)]
pub use crate::xorshift::XorShift32;
