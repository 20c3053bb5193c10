//! Weighted multiset of block identities: the unit of poll results.

use snowfall_types::BlockId;
use std::collections::BTreeMap;
use std::fmt;

/// A bag of votes: each block identity carries the total weight voting for it.
///
/// Backed by an ordered map so iteration, [`Bag::mode`] and every derived bag
/// are identical on every node that observes the same tally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bag {
    counts: BTreeMap<BlockId, u64>,
    total: u64,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single vote for `id`.
    pub fn add(&mut self, id: BlockId) {
        self.add_count(id, 1);
    }

    /// Add `count` votes for `id`. Zero counts are ignored.
    pub fn add_count(&mut self, id: BlockId, count: u64) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(id).or_insert(0);
        *entry = entry.saturating_add(count);
        self.total = self.total.saturating_add(count);
    }

    /// Weight recorded for `id`.
    pub fn count(&self, id: &BlockId) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Total weight across every identity.
    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct identities, in ascending order.
    pub fn list(&self) -> impl Iterator<Item = &BlockId> {
        self.counts.keys()
    }

    /// `(identity, weight)` pairs, in ascending identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&BlockId, u64)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }

    /// The identity with the most weight. Ties go to the smallest identity.
    pub fn mode(&self) -> Option<(BlockId, u64)> {
        let mut best: Option<(BlockId, u64)> = None;
        for (id, count) in self.iter() {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((*id, count)),
            }
        }
        best
    }

    /// Partition by the value of bit `bit`: index 0 holds identities with the
    /// bit clear, index 1 those with it set.
    pub fn split(&self, bit: usize) -> [Bag; 2] {
        let mut halves = [Bag::new(), Bag::new()];
        for (id, count) in self.iter() {
            halves[id.bit(bit)].add_count(*id, count);
        }
        halves
    }

    /// Keep only identities that agree with `id` on every bit in `[start, end)`.
    pub fn filter(&self, start: usize, end: usize, id: &BlockId) -> Bag {
        let mut kept = Bag::new();
        for (candidate, count) in self.iter() {
            if candidate.equal_subset(start, end, id) {
                kept.add_count(*candidate, count);
            }
        }
        kept
    }
}

impl FromIterator<(BlockId, u64)> for Bag {
    fn from_iter<I: IntoIterator<Item = (BlockId, u64)>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for (id, count) in iter {
            bag.add_count(id, count);
        }
        bag
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bag(size = {}) {{", self.total)?;
        for (i, (id, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {:?}: {}", id, count)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(first: u8) -> BlockId {
        let mut bytes = [0u8; 32];
        bytes[0] = first;
        BlockId::new(bytes)
    }

    #[test]
    fn counts_accumulate() {
        let mut bag = Bag::new();
        bag.add(id(1));
        bag.add_count(id(1), 4);
        bag.add_count(id(2), 3);
        assert_eq!(bag.count(&id(1)), 5);
        assert_eq!(bag.count(&id(2)), 3);
        assert_eq!(bag.count(&id(3)), 0);
        assert_eq!(bag.len(), 8);
        assert_eq!(bag.list().count(), 2);
    }

    #[test]
    fn huge_weights_saturate() {
        let half = u64::MAX / 2 + 1;
        let mut bag = Bag::new();
        bag.add_count(id(1), half);
        bag.add_count(id(1), half);
        bag.add_count(id(2), half);
        assert_eq!(bag.count(&id(1)), u64::MAX);
        assert_eq!(bag.count(&id(2)), half);
        assert_eq!(bag.len(), u64::MAX);
    }

    #[test]
    fn zero_count_is_ignored() {
        let mut bag = Bag::new();
        bag.add_count(id(1), 0);
        assert!(bag.is_empty());
        assert_eq!(bag.list().count(), 0);
    }

    #[test]
    fn mode_prefers_highest_count() {
        let bag: Bag = [(id(1), 3), (id(2), 7), (id(3), 5)].into_iter().collect();
        assert_eq!(bag.mode(), Some((id(2), 7)));
    }

    #[test]
    fn mode_breaks_ties_toward_smallest_id() {
        let bag: Bag = [(id(9), 10), (id(4), 10)].into_iter().collect();
        assert_eq!(bag.mode(), Some((id(4), 10)));
        assert_eq!(Bag::new().mode(), None);
    }

    #[test]
    fn split_partitions_on_bit() {
        let bag: Bag = [(id(0b0000_0000), 2), (id(0b1000_0000), 5), (id(0b0100_0000), 1)]
            .into_iter()
            .collect();
        let [zeros, ones] = bag.split(0);
        assert_eq!(zeros.len(), 3);
        assert_eq!(ones.len(), 5);
        assert_eq!(ones.count(&id(0b1000_0000)), 5);
    }

    #[test]
    fn filter_keeps_matching_prefix() {
        let bag: Bag = [(id(0b1100_0000), 2), (id(0b1000_0000), 5), (id(0b0100_0000), 1)]
            .into_iter()
            .collect();
        let kept = bag.filter(0, 1, &id(0b1000_0000));
        assert_eq!(kept.len(), 7);
        let kept = bag.filter(0, 2, &id(0b1000_0000));
        assert_eq!(kept.len(), 5);
        let kept = bag.filter(1, 2, &id(0b0100_0000));
        assert_eq!(kept.len(), 3);
    }
}
