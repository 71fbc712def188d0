use crate::linalg::StateVector;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// shots per rayon task when sampling
const SHOTS_PER_CHUNK: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Zero,
    One,
}

impl Outcome {
    pub fn bit(self) -> u8 {
        match self {
            Outcome::Zero => 0,
            Outcome::One => 1,
        }
    }

    /// The basis vector the state collapses to.
    pub fn basis_state(self) -> StateVector {
        match self {
            Outcome::Zero => StateVector::zero(),
            Outcome::One => StateVector::one(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

/// Outcome frequencies over repeated measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub zeros: u64,
    pub ones: u64,
}

impl Counts {
    pub fn shots(&self) -> u64 {
        self.zeros + self.ones
    }

    pub fn frequency_zero(&self) -> f64 {
        if self.shots() == 0 {
            0.0
        } else {
            self.zeros as f64 / self.shots() as f64
        }
    }

    pub fn frequency_one(&self) -> f64 {
        if self.shots() == 0 {
            0.0
        } else {
            self.ones as f64 / self.shots() as f64
        }
    }

    fn merge(self, other: Counts) -> Counts {
        Counts {
            zeros: self.zeros + other.zeros,
            ones: self.ones + other.ones,
        }
    }
}

// outcome 0 iff the uniform draw lands below P(0)
fn draw<R: Rng + ?Sized>(p_zero: f64, rng: &mut R) -> Outcome {
    let r: f64 = rng.gen();
    if r < p_zero {
        Outcome::Zero
    } else {
        Outcome::One
    }
}

/// Samples one measurement of `state` in the computational basis and returns the
/// outcome together with the collapsed state.
pub fn measure<R: Rng + ?Sized>(state: &StateVector, rng: &mut R) -> (Outcome, StateVector) {
    let [p_zero, _] = state.probabilities();
    let outcome = draw(p_zero, rng);
    info!("measured {} (P(0) = {:.6})", outcome, p_zero);
    (outcome, outcome.basis_state())
}

/// Measures `shots` independent copies of `state`.
///
/// Work is split into fixed-size chunks; chunk `k` draws from a ChaCha8 stream seeded
/// with `seed` and stream number `k`, so the counts depend only on the seed.
pub fn sample_counts(state: &StateVector, shots: u64, seed: u64) -> Counts {
    let [p_zero, _] = state.probabilities();
    let chunks = shots.div_ceil(SHOTS_PER_CHUNK);

    (0..chunks)
        .into_par_iter()
        .map(|k| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(k);
            let n = SHOTS_PER_CHUNK.min(shots - k * SHOTS_PER_CHUNK);
            let mut counts = Counts::default();
            for _ in 0..n {
                match draw(p_zero, &mut rng) {
                    Outcome::Zero => counts.zeros += 1,
                    Outcome::One => counts.ones += 1,
                }
            }
            counts
        })
        .reduce(Counts::default, Counts::merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn plus() -> StateVector {
        StateVector::new(
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(FRAC_1_SQRT_2, 0.0),
        )
    }

    #[test]
    fn test_basis_zero_always_measures_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (outcome, collapsed) = measure(&StateVector::zero(), &mut rng);
            assert_eq!(outcome, Outcome::Zero);
            assert_eq!(collapsed, StateVector::zero());
        }
    }

    #[test]
    fn test_basis_one_always_measures_one() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(measure(&StateVector::one(), &mut rng).0, Outcome::One);
        }
    }

    #[test]
    fn test_equal_superposition_is_fair() {
        let mut rng = StdRng::seed_from_u64(42);
        let zeros = (0..10_000)
            .filter(|_| measure(&plus(), &mut rng).0 == Outcome::Zero)
            .count();
        let freq = zeros as f64 / 10_000.0;
        assert!((freq - 0.5).abs() < 0.05, "frequency of 0 was {}", freq);
    }

    #[test]
    fn test_collapse_matches_outcome() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let (outcome, collapsed) = measure(&plus(), &mut rng);
            assert_eq!(collapsed, outcome.basis_state());
        }
    }

    #[test]
    fn test_sample_counts_reproducible_and_complete() {
        let a = sample_counts(&plus(), 10_001, 99);
        let b = sample_counts(&plus(), 10_001, 99);
        assert_eq!(a, b);
        assert_eq!(a.shots(), 10_001);
        assert!((a.frequency_zero() - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_sample_counts_zero_shots() {
        let c = sample_counts(&plus(), 0, 1);
        assert_eq!(c, Counts::default());
        assert_eq!(c.frequency_zero(), 0.0);
        assert_eq!(c.frequency_one(), 0.0);
    }

    #[test]
    fn test_frequencies_sum_to_one_with_shots() {
        let c = Counts { zeros: 3, ones: 1 };
        assert_eq!(c.frequency_zero(), 0.75);
        assert_eq!(c.frequency_one(), 0.25);
    }
}
