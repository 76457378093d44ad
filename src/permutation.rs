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

use crate::xorshift::XorShift32;

/// Derives a permutation of `0..n` from `seed`.
///
/// Every slot draws one key from a fresh [XorShift32] stream, then the
/// slots are ordered by key. Equal keys fall back to slot order, so the
/// result is identical everywhere the same stream is used.
///
/// `output[i]` is the slot that ended up at sorted position `i`.
pub fn generate_permutation(seed: u32, n: usize) -> Vec<usize> {
    let mut rng = XorShift32::new(seed);
    let mut keyed: Vec<(u32, usize)> = (0..n).map(|i| (rng.next(), i)).collect();
    keyed.sort_by_key(|&(key, index)| (key, index));
    keyed.into_iter().map(|(_, index)| index).collect()
}

/// Inverse of a permutation: `invert(p)[p[i]] == i`.
///
/// Panics if `perm` is not a permutation of `0..perm.len()`.
pub fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![usize::MAX; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        assert_eq!(inverse[p], usize::MAX, "Duplicate index {p} in permutation");
        inverse[p] = i;
    }
    inverse
}
