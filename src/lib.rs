//! A skip list stores an ordered set of keys across a fixed number of
//! levels, so that elements can be efficiently accessed, inserted and
//! removed, in `O(log(n))` on average.
//!
//! Conceptually, the structure resembles something like:
//!
//! ```text
//! Level 2: <-inf> ----------------------------> [25] ----------> <+inf>
//! Level 1: <-inf> ----------> [10] -----------> [25] ----------> <+inf>
//! Level 0: <-inf> --> [5] --> [10] --> [20] --> [25] --> [30] -> <+inf>
//! ```
//!
//! Level 0 holds every key between a pair of permanent `-inf`/`+inf`
//! sentinels; each level above holds a probabilistic subset of the level
//! below, so a search starting at the sparse top level can skip long runs of
//! the base level before committing to linear work.
//!
//! The nodes of a key stacked across levels form its *tower*, linked
//! vertically. A tower's height is decided at insertion by a sequence of coin
//! flips: each success replicates the key one level higher, the first failure
//! stops the climb, and the fixed depth caps it. The coin is an injectable
//! capability ([`CoinFlip`]), so tests can pin down the shape of the
//! structure; by default a freshly seeded fair coin ([`FairCoin`]) is used.
//!
//! All nodes live in an arena owned by the list: links are arena indices
//! rather than pointers, and dropping the list releases every node in one
//! step.

mod coin;
mod key;
mod node;
mod skiplist;

pub use coin::{CoinFlip, FairCoin};
pub use key::Key;
pub use skiplist::{DepthError, Iter, SkipTower};
