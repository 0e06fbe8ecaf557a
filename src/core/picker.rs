//! Winner selection sources for the lottery pass.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the index of the lottery winner among `candidates` entries.
/// Implementations must return an index strictly below `candidates`.
pub trait WinnerPicker: Send {
    fn pick(&mut self, candidates: usize) -> usize;
}

/// Default source backed by the thread-local generator.
#[derive(Debug, Default)]
pub struct RandomPicker;

impl WinnerPicker for RandomPicker {
    fn pick(&mut self, candidates: usize) -> usize {
        if candidates <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..candidates)
    }
}

/// Deterministic source for tests and replays.
#[derive(Debug)]
pub struct SeededPicker(StdRng);

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl WinnerPicker for SeededPicker {
    fn pick(&mut self, candidates: usize) -> usize {
        if candidates <= 1 {
            return 0;
        }
        self.0.gen_range(0..candidates)
    }
}
