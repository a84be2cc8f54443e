//! A fixed-depth skip list with sentinel-bounded levels.

use std::fmt;

use thiserror::Error;

use crate::{
    coin::{CoinFlip, FairCoin},
    key::Key,
    node::{Arena, NodeId},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipTower
// ////////////////////////////////////////////////////////////////////////////

/// Errors that can occur when constructing a [`SkipTower`].
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DepthError {
    /// The depth must be at least 1.
    #[error("depth must be at least 1.")]
    ZeroDepth,
}

/// An ordered set of `i32` keys stored as a hierarchy of doubly-linked levels.
///
/// Level 0 holds every key; each level above holds a random subset of the
/// level below, decided by a per-level coin flip at insertion time. Searches
/// start at the sparse top level and drop down whenever they cannot advance
/// without overshooting, skipping long runs of the base level. Expected
/// search cost is `$O(\log n)$` for a fair coin; the worst case remains
/// `$O(n)$` since nothing enforces balance.
///
/// Every level is bounded by two permanent sentinel nodes holding
/// [`Key::NegInf`] and [`Key::PosInf`], so scans never run off the end of a
/// level and never compare against a missing neighbour.
///
/// The number of levels is fixed at construction and caps how high any key's
/// tower can reach.
///
/// # Examples
///
/// ```
/// use skiptower::SkipTower;
///
/// let mut list = SkipTower::with_depth(3)?;
/// assert!(list.insert(5));
/// assert!(list.insert(10));
/// assert!(!list.insert(5)); // duplicate
/// assert!(list.contains(10));
/// assert!(list.remove(10));
/// assert!(!list.contains(10));
/// # Ok::<(), skiptower::DepthError>(())
/// ```
pub struct SkipTower {
    depth: usize,
    /// Front sentinel of each level, index 0 being the base level.
    front: Vec<NodeId>,
    /// Rear sentinel of each level.
    rear: Vec<NodeId>,
    arena: Arena,
    /// Number of distinct keys, i.e. nodes on level 0 excluding sentinels.
    len: usize,
    coin: Box<dyn CoinFlip>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl SkipTower {
    /// Create a list of depth 1: a single doubly-linked level with no skip
    /// structure above it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let list = SkipTower::new();
    /// assert!(list.is_empty());
    /// assert_eq!(list.depth(), 1);
    /// ```
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::build(1, Box::new(FairCoin::new()))
    }

    /// Create a list with `depth` levels and a freshly seeded fair coin.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::ZeroDepth`] if `depth` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let list = SkipTower::with_depth(3)?;
    /// assert_eq!(list.depth(), 3);
    /// # Ok::<(), skiptower::DepthError>(())
    /// ```
    #[inline]
    pub fn with_depth(depth: usize) -> Result<Self, DepthError> {
        Self::with_coin(depth, FairCoin::new())
    }

    /// Create a list with `depth` levels and the given promotion coin.
    ///
    /// Substituting the coin pins down tower shapes, which are otherwise
    /// random: a seeded [`FairCoin`] makes a run reproducible, and a scripted
    /// implementation of [`CoinFlip`] can force any shape a test needs.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::ZeroDepth`] if `depth` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::{FairCoin, SkipTower};
    ///
    /// let mut list = SkipTower::with_coin(4, FairCoin::seeded(7))?;
    /// list.extend([3, 1, 2]);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// # Ok::<(), skiptower::DepthError>(())
    /// ```
    #[inline]
    pub fn with_coin<C>(depth: usize, coin: C) -> Result<Self, DepthError>
    where
        C: 'static + CoinFlip,
    {
        if depth == 0 {
            return Err(DepthError::ZeroDepth);
        }
        Ok(Self::build(depth, Box::new(coin)))
    }

    /// Allocate the sentinel pairs for `depth` levels, link each pair
    /// horizontally, then tie the fronts and rears together vertically.
    ///
    /// `depth` must be at least 1; the public constructors guarantee it.
    fn build(depth: usize, coin: Box<dyn CoinFlip>) -> Self {
        let mut arena = Arena::new();
        let mut front = Vec::with_capacity(depth);
        let mut rear = Vec::with_capacity(depth);

        for _ in 0..depth {
            let f = arena.alloc(Key::NegInf);
            let r = arena.alloc(Key::PosInf);
            arena[f].next = Some(r);
            arena[r].prev = Some(f);
            front.push(f);
            rear.push(r);
        }
        for level in 1..depth {
            arena[front[level - 1]].up = Some(front[level]);
            arena[front[level]].down = Some(front[level - 1]);
            arena[rear[level - 1]].up = Some(rear[level]);
            arena[rear[level]].down = Some(rear[level - 1]);
        }

        SkipTower {
            depth,
            front,
            rear,
            arena,
            len: 0,
            coin,
        }
    }

    /// Returns the number of levels, fixed at construction.
    #[must_use]
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of keys in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::new();
    /// list.extend(0..10);
    /// assert_eq!(list.len(), 10);
    /// ```
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::new();
    /// assert!(list.is_empty());
    /// list.insert(1);
    /// assert!(!list.is_empty());
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a key, returning `true` if it was newly admitted.
    ///
    /// A duplicate key returns `false` and leaves the list untouched. After
    /// the key is spliced into the base level, it is promoted one level at a
    /// time while the coin flip succeeds, halting for good at the first
    /// failure or at the top level.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::new();
    /// assert!(list.insert(10));
    /// assert!(!list.insert(10));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i32) -> bool {
        let key = Key::Value(key);
        let next = self.seek(self.front[0], key);
        if self.arena[next].key == key {
            return false;
        }
        let node = self.arena.alloc(key);
        self.splice_before(node, next);
        self.len += 1;

        // Sequential climb: each success duplicates the key one level up, and
        // the first failure halts promotion for this insertion entirely.
        let mut level = 0;
        let mut lower = node;
        while level + 1 < self.depth && self.coin.flip() {
            let upper = self.arena.alloc(key);
            self.arena[lower].up = Some(upper);
            self.arena[upper].down = Some(lower);

            // Walk back along the lower level to the nearest tower reaching
            // the next level. The front sentinel always does.
            let mut back = lower;
            let above = loop {
                back = self.arena[back]
                    .prev
                    .expect("level scan passed the front sentinel");
                if let Some(up) = self.arena[back].up {
                    break up;
                }
            };
            let next = self.seek(above, key);
            self.splice_before(upper, next);

            lower = upper;
            level += 1;
        }
        true
    }

    /// Remove a key, returning `true` if it was present.
    ///
    /// The whole tower is removed: every level is scanned and any node
    /// holding the key is spliced out horizontally. Levels the tower never
    /// reached simply find nothing, which is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::new();
    /// list.insert(10);
    /// assert!(list.remove(10));
    /// assert!(!list.remove(10));
    /// ```
    pub fn remove(&mut self, key: i32) -> bool {
        if !self.contains(key) {
            return false;
        }
        let key = Key::Value(key);
        for level in 0..self.depth {
            let mut current = self.front[level];
            while let Some(next) = self.arena[current].next {
                if self.arena[next].key == key {
                    self.unlink(next);
                    self.arena.free(next);
                } else {
                    current = next;
                }
            }
        }
        self.len -= 1;
        true
    }

    /// Returns `true` if the key is present. Never mutates.
    ///
    /// Starts at the top level's front sentinel, runs right while the next
    /// key is still less than the target, and drops down a level each time
    /// advancing would overshoot. Reports not-found once no level remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::with_depth(3)?;
    /// list.extend([10, 30, 5, 25]);
    /// assert!(list.contains(10));
    /// assert!(!list.contains(71));
    /// # Ok::<(), skiptower::DepthError>(())
    /// ```
    #[must_use]
    pub fn contains(&self, key: i32) -> bool {
        let key = Key::Value(key);
        let mut current = self.front[self.depth - 1];
        loop {
            while let Some(next) = self.arena[current].next {
                if self.arena[next].key < key {
                    current = next;
                } else {
                    break;
                }
            }
            if self.arena[current]
                .next
                .is_some_and(|next| self.arena[next].key == key)
            {
                return true;
            }
            match self.arena[current].down {
                Some(down) => current = down,
                None => return false,
            }
        }
    }

    /// An iterator over the keys in ascending order.
    ///
    /// Walks the base level from front sentinel to rear sentinel; the
    /// sentinels themselves are not yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptower::SkipTower;
    ///
    /// let mut list = SkipTower::new();
    /// list.extend([30, 10, 20]);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
    /// ```
    #[must_use]
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            node: self.arena[self.front[0]].next,
        }
    }

    /// First node strictly after `from` on its level whose key is not less
    /// than `key`. The rear sentinel bounds every scan, so for any admissible
    /// `key` this always finds a node.
    fn seek(&self, from: NodeId, key: Key) -> NodeId {
        let mut current = from;
        while let Some(next) = self.arena[current].next {
            if self.arena[next].key < key {
                current = next;
            } else {
                return next;
            }
        }
        unreachable!("level scan ran past the rear sentinel")
    }

    /// Splice `node` immediately before `next`, which must already be linked
    /// into a level and must not be a front sentinel.
    fn splice_before(&mut self, node: NodeId, next: NodeId) {
        let prev = self.arena[next]
            .prev
            .expect("cannot splice before a front sentinel");
        debug_assert!(self.arena[prev].key < self.arena[node].key);
        debug_assert!(self.arena[node].key < self.arena[next].key);

        self.arena[prev].next = Some(node);
        self.arena[node].prev = Some(prev);
        self.arena[node].next = Some(next);
        self.arena[next].prev = Some(node);
    }

    /// Splice a node out of its level. Purely horizontal; the node's own
    /// links are left as-is since its slot is about to be freed.
    fn unlink(&mut self, node: NodeId) {
        let prev = self.arena[node].prev.expect("sentinels are never unlinked");
        let next = self.arena[node].next.expect("sentinels are never unlinked");
        self.arena[prev].next = Some(next);
        self.arena[next].prev = Some(prev);
    }
}

// ///////////////////////////////////////////////
// Trait implementations
// ///////////////////////////////////////////////

impl Default for SkipTower {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<i32> for SkipTower {
    /// Insert each key in turn, silently skipping duplicates.
    #[inline]
    fn extend<I: IntoIterator<Item = i32>>(&mut self, iter: I) {
        for key in iter {
            let _admitted = self.insert(key);
        }
    }
}

/// Renders one line per level, sparsest first, each listing the level's keys
/// from the front sentinel to the rear sentinel:
///
/// ```text
/// Level: 1 -- -2147483648, 10, 2147483647,
/// Level: 0 -- -2147483648, 5, 10, 2147483647,
/// ```
///
/// Every key, sentinels included, is followed by a comma and a space, and
/// every level line by a line break. This exposes internal structure for
/// diagnostics and test assertions; it is not part of the ordering contract.
impl fmt::Debug for SkipTower {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SkipTower")
            .field("depth", &self.depth)
            .field("front", &self.front)
            .field("rear", &self.rear)
            .field("arena", &self.arena)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SkipTower {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for level in (0..self.depth).rev() {
            write!(f, "Level: {level} -- ")?;
            let mut node = Some(self.front[level]);
            while let Some(id) = node {
                write!(f, "{}, ", self.arena[id].key)?;
                node = self.arena[id].next;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// An iterator over a [`SkipTower`]'s keys in ascending order.
///
/// Created by [`SkipTower::iter`].
pub struct Iter<'a> {
    list: &'a SkipTower,
    node: Option<NodeId>,
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let id = self.node?;
        match self.list.arena[id].key {
            Key::Value(key) => {
                self.node = self.list.arena[id].next;
                Some(key)
            }
            // The rear sentinel ends the walk.
            Key::NegInf | Key::PosInf => None,
        }
    }
}

impl<'a> IntoIterator for &'a SkipTower {
    type Item = i32;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Internal checks
// ///////////////////////////////////////////////

#[cfg(test)]
impl SkipTower {
    /// Walk the whole structure and assert every invariant: sentinel bounds,
    /// strict per-level ordering, back-link symmetry, tower contiguity, and
    /// vertical sentinel links.
    fn check(&self) {
        for level in 0..self.depth {
            let front = self.front[level];
            assert_eq!(self.arena[front].key, Key::NegInf);
            assert_eq!(self.arena[front].prev, None);

            let mut id = front;
            while let Some(next) = self.arena[id].next {
                assert!(
                    self.arena[id].key < self.arena[next].key,
                    "level {level} is not strictly ordered"
                );
                assert_eq!(self.arena[next].prev, Some(id));

                if level > 0 && !self.arena[next].key.is_sentinel() {
                    let down = self.arena[next]
                        .down
                        .expect("tower node above level 0 has no down link");
                    assert_eq!(self.arena[down].key, self.arena[next].key);
                    assert_eq!(self.arena[down].up, Some(next));
                }
                id = next;
            }
            assert_eq!(id, self.rear[level]);
            assert_eq!(self.arena[id].key, Key::PosInf);

            if level + 1 < self.depth {
                assert_eq!(self.arena[front].up, Some(self.front[level + 1]));
                assert_eq!(self.arena[self.front[level + 1]].down, Some(front));
                assert_eq!(self.arena[self.rear[level]].up, Some(self.rear[level + 1]));
                assert_eq!(
                    self.arena[self.rear[level + 1]].down,
                    Some(self.rear[level])
                );
            }
        }
    }

    /// The keys present at `level`, front to rear, sentinels excluded.
    fn keys_at(&self, level: usize) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut node = self.arena[self.front[level]].next;
        while let Some(id) = node {
            if let Key::Value(key) = self.arena[id].key {
                keys.push(key);
            }
            node = self.arena[id].next;
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{DepthError, SkipTower};
    use crate::coin::{CoinFlip, FairCoin};

    /// Replays a fixed flip sequence, then fails every further flip.
    struct ScriptedCoin {
        flips: std::vec::IntoIter<bool>,
    }

    impl ScriptedCoin {
        fn new(flips: impl Into<Vec<bool>>) -> Self {
            ScriptedCoin {
                flips: flips.into().into_iter(),
            }
        }
    }

    impl CoinFlip for ScriptedCoin {
        fn flip(&mut self) -> bool {
            self.flips.next().unwrap_or(false)
        }
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert_eq!(SkipTower::with_depth(0).err(), Some(DepthError::ZeroDepth));
        assert_eq!(
            SkipTower::with_depth(0).unwrap_err().to_string(),
            "depth must be at least 1."
        );
    }

    #[test]
    fn default_depth_is_one() {
        assert_eq!(SkipTower::new().depth(), 1);
        assert_eq!(SkipTower::default().depth(), 1);
    }

    #[test]
    fn empty_depth_one_render() {
        let list = SkipTower::new();
        assert_eq!(list.to_string(), "Level: 0 -- -2147483648, 2147483647, \n");
    }

    #[test]
    fn depth_one_render_after_inserts() {
        let mut list = SkipTower::new();
        list.extend([10, 30, 5, 25]);
        assert_eq!(
            list.to_string(),
            "Level: 0 -- -2147483648, 5, 10, 25, 30, 2147483647, \n"
        );
        list.check();
    }

    #[test]
    fn empty_depth_three_render() -> Result<()> {
        let list = SkipTower::with_depth(3)?;
        assert_eq!(
            list.to_string(),
            "Level: 2 -- -2147483648, 2147483647, \n\
             Level: 1 -- -2147483648, 2147483647, \n\
             Level: 0 -- -2147483648, 2147483647, \n"
        );
        Ok(())
    }

    #[test]
    fn contains_after_inserts() -> Result<()> {
        let mut list = SkipTower::with_depth(3)?;
        list.extend([10, 30, 5, 25]);
        assert!(list.contains(10));
        assert!(list.contains(30));
        assert!(!list.contains(71));
        list.check();
        Ok(())
    }

    #[test]
    fn remove_tears_down_the_whole_tower() -> Result<()> {
        let mut list = SkipTower::with_depth(3)?;
        list.extend([15, 30, 5, 10, 25, 20]);
        assert!(list.remove(15));
        assert!(list.remove(25));
        assert!(!list.contains(15));
        assert!(!list.contains(25));
        assert!(list.contains(30));
        assert_eq!(list.keys_at(0), vec![5, 10, 20, 30]);
        assert_eq!(list.len(), 4);
        list.check();
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut list = SkipTower::new();
        assert!(list.insert(7));
        assert!(list.insert(3));
        assert!(!list.insert(7));
        assert_eq!(list.len(), 2);
        assert!(list.contains(3));
        assert!(list.contains(7));
        assert_eq!(list.keys_at(0), vec![3, 7]);
    }

    #[test]
    fn remove_absent_leaves_rendering_untouched() -> Result<()> {
        let mut list = SkipTower::with_depth(2)?;
        list.extend([1, 2, 3]);
        let before = list.to_string();
        assert!(!list.remove(9));
        assert_eq!(list.to_string(), before);
        Ok(())
    }

    #[rstest]
    #[case(0)]
    #[case(-40)]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    fn round_trip(#[case] key: i32) -> Result<()> {
        let mut list = SkipTower::with_depth(4)?;
        assert!(list.insert(key));
        assert!(list.contains(key));
        assert!(list.remove(key));
        assert!(!list.contains(key));
        list.check();
        Ok(())
    }

    #[test]
    fn scripted_promotion_builds_a_full_tower() -> Result<()> {
        // Two successful flips carry 10 to the top of a depth-3 list; the
        // exhausted script leaves 20 on the base level only.
        let mut list = SkipTower::with_coin(3, ScriptedCoin::new([true, true]))?;
        assert!(list.insert(10));
        assert!(list.insert(20));
        assert_eq!(
            list.to_string(),
            "Level: 2 -- -2147483648, 10, 2147483647, \n\
             Level: 1 -- -2147483648, 10, 2147483647, \n\
             Level: 0 -- -2147483648, 10, 20, 2147483647, \n"
        );
        list.check();
        Ok(())
    }

    #[test]
    fn promotion_stops_at_first_failed_flip() -> Result<()> {
        // true, false: 30 reaches level 1 and no further, even though the
        // script would allow a later success.
        let mut list = SkipTower::with_coin(4, ScriptedCoin::new([true, false, true]))?;
        assert!(list.insert(30));
        assert_eq!(list.keys_at(0), vec![30]);
        assert_eq!(list.keys_at(1), vec![30]);
        assert_eq!(list.keys_at(2), vec![]);
        assert_eq!(list.keys_at(3), vec![]);
        list.check();
        Ok(())
    }

    #[test]
    fn promotion_is_capped_by_depth() -> Result<()> {
        // The script never fails, so promotion must halt at the top level.
        let mut list = SkipTower::with_coin(3, ScriptedCoin::new(vec![true; 64]))?;
        assert!(list.insert(5));
        assert_eq!(list.keys_at(2), vec![5]);
        list.check();
        Ok(())
    }

    #[test]
    fn towers_are_contiguous_under_churn() -> Result<()> {
        let mut list = SkipTower::with_coin(5, FairCoin::seeded(1))?;
        for key in 0..200 {
            assert!(list.insert(key * 3));
        }
        for key in 0..100 {
            assert!(list.remove(key * 6));
        }
        list.check();
        assert_eq!(list.len(), 100);
        Ok(())
    }

    #[test]
    fn matches_btreeset_oracle() -> Result<()> {
        use std::collections::BTreeSet;

        use rand::{Rng, SeedableRng, rngs::SmallRng};

        let mut list = SkipTower::with_coin(8, FairCoin::seeded(99))?;
        let mut oracle = BTreeSet::new();
        let mut rng = SmallRng::seed_from_u64(2);

        for _ in 0..2_000 {
            let key = rng.random_range(-50_i32..50);
            if rng.random_bool(0.4) {
                assert_eq!(list.remove(key), oracle.remove(&key));
            } else {
                assert_eq!(list.insert(key), oracle.insert(key));
            }
        }
        list.check();
        assert_eq!(list.len(), oracle.len());
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            oracle.iter().copied().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn iteration_is_sorted_and_deduplicated() {
        let mut list = SkipTower::new();
        list.extend([9, 1, 4, 1, 9]);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 4, 9]);
        assert_eq!((&list).into_iter().count(), 3);
        assert!(SkipTower::new().iter().next().is_none());
    }
}
