//! Random source backed by the thread-local RNG.

use rand::Rng;

use crate::domain::ports::RandomSource;

/// Production [`RandomSource`] drawing from `rand::thread_rng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn index(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound.max(1))
    }

    fn bits(&self) -> u128 {
        rand::thread_rng().r#gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(36)]
    fn indices_stay_below_bound(#[case] bound: usize) {
        let random = ThreadRandomSource;
        for _ in 0..256 {
            assert!(random.index(bound) < bound);
        }
    }

    #[rstest]
    fn zero_bound_is_treated_as_one() {
        assert_eq!(ThreadRandomSource.index(0), 0);
    }
}
