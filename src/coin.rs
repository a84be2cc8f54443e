//! The promotion coin.
//!
//! After a key is spliced into the base level, it is replicated upward one
//! level at a time, each step gated on an independent fair coin flip. The
//! climb halts at the first failed flip or at the topmost level, so the
//! chance of a tower reaching level `$n$` is `$2^{-n}$` (truncated at the
//! fixed depth).
//!
//! The coin is a capability handed to the list at construction rather than a
//! hidden global: tests substitute a scripted implementation to force
//! deterministic tower shapes.

use rand::prelude::*;

// ////////////////////////////////////////////////////////////////////////////
// Coin Flip
// ////////////////////////////////////////////////////////////////////////////

/// The source of randomness driving tower promotion.
///
/// Implementations need not be fair; the expected `$O(\log n)$` search bound
/// only holds when heads comes up with probability around one half.
pub trait CoinFlip {
    /// Flip the coin, returning `true` if the node should also be inserted one
    /// level higher.
    #[must_use]
    fn flip(&mut self) -> bool;
}

/// A fair coin backed by a small, fast PRNG.
#[derive(Debug)]
pub struct FairCoin {
    rng: SmallRng,
}

impl FairCoin {
    /// Create a fair coin seeded from the thread-local generator.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        FairCoin {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a fair coin from an explicit seed, for reproducible tower
    /// shapes.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::{CoinFlip, FairCoin};
    ///
    /// let mut a = FairCoin::seeded(7);
    /// let mut b = FairCoin::seeded(7);
    /// for _ in 0..64 {
    ///     assert_eq!(a.flip(), b.flip());
    /// }
    /// ```
    #[must_use]
    #[inline]
    pub fn seeded(seed: u64) -> Self {
        FairCoin {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for FairCoin {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CoinFlip for FairCoin {
    #[inline]
    fn flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;

    use super::{CoinFlip, FairCoin};

    #[test]
    fn both_outcomes_occur() -> Result<()> {
        let mut coin = FairCoin::new();
        let mut heads = false;
        let mut tails = false;
        for _ in 0..10_000 {
            if coin.flip() {
                heads = true;
            } else {
                tails = true;
            }
            if heads && tails {
                return Ok(());
            }
        }
        bail!("coin produced only one outcome in 10000 flips");
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = FairCoin::seeded(42);
        let mut b = FairCoin::seeded(42);
        let left: Vec<bool> = (0..256).map(|_| a.flip()).collect();
        let right: Vec<bool> = (0..256).map(|_| b.flip()).collect();
        assert_eq!(left, right);
    }
}
