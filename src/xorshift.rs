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

use rand::{Error, RngCore, SeedableRng};

/// 32-bit xorshift generator (shifts 13, 17, 5).
///
/// Not suitable for anything security related. It is only here because
/// the scrambling producer derives its tile order from this exact stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a generator. A zero seed is replaced by 1, since the
    /// all-zero state is a fixed point of the transform.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Advances the state and returns it.
    #[inline]
    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next());
        let hi = u64::from(self.next());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stream_from_one() {
        let mut rng = XorShift32::new(1);
        let got: Vec<u32> = (0..4).map(|_| rng.next()).collect();
        assert_eq!(got, [270369, 67634689, 2647435461, 307599695]);
    }

    #[test]
    fn zero_seed_is_coerced() {
        assert_eq!(XorShift32::new(0), XorShift32::new(1));
        assert_eq!(XorShift32::from_seed([0; 4]), XorShift32::new(1));
    }

    #[test]
    fn rng_core_matches_raw_stream() {
        let mut a = XorShift32::new(42);
        let mut b = XorShift32::new(42);
        let lo = b.next();
        let hi = b.next();
        assert_eq!(a.next_u64(), (u64::from(hi) << 32) | u64::from(lo));

        let mut bytes = [0u8; 6];
        a.fill_bytes(&mut bytes);
        let w0 = b.next().to_le_bytes();
        let w1 = b.next().to_le_bytes();
        assert_eq!(bytes[..4], w0);
        assert_eq!(bytes[4..], w1[..2]);
    }
}
