//! Deterministic shuffling keyed by an opaque text seed.
//!
//! The seed is hashed with xmur3 over its UTF-16 code units and the hash drives
//! a mulberry32 generator, so a given seed and input order always produce the
//! same permutation, in this process or any other.

use rand::{seq::SliceRandom, Rng};

///First output of the xmur3 string hash.
pub fn xmur3(seed: &str) -> u32 {
    let units = seed.encode_utf16().collect::<Vec<_>>();
    let mut hash = 1_779_033_703u32 ^ units.len() as u32;

    for unit in units {
        hash = (hash ^ unit as u32).wrapping_mul(3_432_918_353);
        hash = hash.rotate_left(13);
    }

    hash = (hash ^ (hash >> 16)).wrapping_mul(2_246_822_507);
    hash = (hash ^ (hash >> 13)).wrapping_mul(3_266_489_909);
    hash ^ (hash >> 16)
}

pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_text(seed: &str) -> Self {
        Self::new(xmur3(seed))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    ///Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

pub trait PermuteSeeded {
    type Item;

    fn permute_seeded(&self, seed: &str) -> Vec<Self::Item>;
}

impl<T: Clone> PermuteSeeded for [T] {
    type Item = T;

    ///Fisher–Yates from the last index down to 1. The input is left untouched.
    fn permute_seeded(&self, seed: &str) -> Vec<T> {
        let mut values = self.to_vec();
        if values.len() < 2 {
            return values;
        }

        let mut rng = Mulberry32::from_text(seed);
        for i in (1..values.len()).rev() {
            let j = (rng.next_f64() * (i + 1) as f64) as usize;
            values.swap(i, j);
        }
        values
    }
}

pub fn permute<T: Clone>(sequence: &[T], seed: &str) -> Vec<T> {
    sequence.permute_seeded(seed)
}

///Shuffles with whatever entropy `rng` carries, for decks that should not be reproducible.
pub fn shuffled<T>(mut values: Vec<T>, rng: &mut impl Rng) -> Vec<T> {
    values.shuffle(rng);
    values
}
