//! Phrase pool selector cursors.
//!
//! One cursor per phrase pool, owned by one engine instance for its
//! entire lifetime. A draw advances the cursor by a random step and
//! wraps modulo the pool size; the step is capped below the pool size
//! so the same slot can never be drawn twice in a row for pools with
//! more than one entry.

use rand::Rng;
use rand::rngs::StdRng;

/// Running indices into the prepend and append phrase pools.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SelectorState {
    prepend: usize,
    append: usize,
}

impl SelectorState {
    /// Advances the prepend cursor and returns the drawn index.
    pub fn next_prepend(&mut self, rng: &mut StdRng, pool_len: usize) -> usize {
        Self::step(&mut self.prepend, rng, pool_len)
    }

    /// Advances the append cursor and returns the drawn index.
    pub fn next_append(&mut self, rng: &mut StdRng, pool_len: usize) -> usize {
        Self::step(&mut self.append, rng, pool_len)
    }

    fn step(cursor: &mut usize, rng: &mut StdRng, pool_len: usize) -> usize {
        if pool_len > 1 {
            let max_step = usize::min(4, pool_len - 1);
            *cursor += rng.random_range(1..=max_step);
            while *cursor >= pool_len {
                *cursor -= pool_len;
            }
        } else {
            *cursor = 0;
        }
        *cursor
    }
}
