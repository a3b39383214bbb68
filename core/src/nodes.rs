//! Node weight storage.
//!
//! The graph keeps one edge partition per node; the node storage only owns
//! the weights and enforces the node capacity.

use std::fmt;

use crate::config::StorageKind;
use crate::error::{GraphError, Resource, Result};
use crate::fixed::FixedVec;
use crate::index::IndexType;

pub trait NodeStorage: Clone + fmt::Debug + Default {
    type Weight;

    const KIND: StorageKind;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nodes that fit without reallocating.
    fn capacity(&self) -> usize;

    fn reserve(&mut self, _additional: usize) {}

    fn weight(&self, i: usize) -> Option<&Self::Weight>;

    fn weight_mut(&mut self, i: usize) -> Option<&mut Self::Weight>;

    /// Fails if one more node would exceed the capacity.
    fn check_room(&self, method: &'static str) -> Result<()>;

    /// Callers run `check_room` first; a full storage drops the weight.
    fn push(&mut self, weight: Self::Weight);

    fn insert(&mut self, pos: usize, weight: Self::Weight);

    fn remove(&mut self, pos: usize) -> Option<Self::Weight>;

    fn swap(&mut self, i: usize, j: usize);

    fn clear(&mut self);

    fn iter(&self) -> impl DoubleEndedIterator<Item = &Self::Weight>;
}

/// Growable node storage.
#[derive(Clone, PartialEq, Eq)]
pub struct DynamicNodes<W> {
    weights: Vec<W>,
}

impl<W> Default for DynamicNodes<W> {
    fn default() -> Self {
        Self { weights: Vec::new() }
    }
}

impl<W: fmt::Debug> fmt::Debug for DynamicNodes<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.weights).finish()
    }
}

impl<W: Clone + fmt::Debug> NodeStorage for DynamicNodes<W> {
    type Weight = W;

    const KIND: StorageKind = StorageKind::Dynamic;

    fn len(&self) -> usize {
        self.weights.len()
    }

    fn capacity(&self) -> usize {
        self.weights.capacity()
    }

    fn reserve(&mut self, additional: usize) {
        self.weights.reserve(additional);
    }

    fn weight(&self, i: usize) -> Option<&W> {
        self.weights.get(i)
    }

    fn weight_mut(&mut self, i: usize) -> Option<&mut W> {
        self.weights.get_mut(i)
    }

    fn check_room(&self, _method: &'static str) -> Result<()> {
        Ok(())
    }

    fn push(&mut self, weight: W) {
        self.weights.push(weight);
    }

    fn insert(&mut self, pos: usize, weight: W) {
        self.weights.insert(pos, weight);
    }

    fn remove(&mut self, pos: usize) -> Option<W> {
        (pos < self.weights.len()).then(|| self.weights.remove(pos))
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.weights.swap(i, j);
    }

    fn clear(&mut self) {
        self.weights.clear();
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &W> {
        self.weights.iter()
    }
}

/// At most `N` nodes, no allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticNodes<W, const N: usize, Ix: IndexType = usize> {
    weights: FixedVec<W, N, Ix>,
}

impl<W, const N: usize, Ix: IndexType> Default for StaticNodes<W, N, Ix> {
    fn default() -> Self {
        Self {
            weights: FixedVec::new(),
        }
    }
}

impl<W: fmt::Debug, const N: usize, Ix: IndexType> fmt::Debug for StaticNodes<W, N, Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.weights, f)
    }
}

impl<W: Clone + fmt::Debug, const N: usize, Ix: IndexType> NodeStorage for StaticNodes<W, N, Ix> {
    type Weight = W;

    const KIND: StorageKind = StorageKind::Static { capacity: N };

    fn len(&self) -> usize {
        self.weights.len()
    }

    fn capacity(&self) -> usize {
        N
    }

    fn weight(&self, i: usize) -> Option<&W> {
        self.weights.get(i)
    }

    fn weight_mut(&mut self, i: usize) -> Option<&mut W> {
        self.weights.get_mut(i)
    }

    fn check_room(&self, method: &'static str) -> Result<()> {
        if self.weights.is_full() {
            return Err(GraphError::CapacityExceeded {
                method,
                resource: Resource::Nodes,
                capacity: N,
            });
        }
        Ok(())
    }

    fn push(&mut self, weight: W) {
        // Room was checked by the caller.
        let _ = self.weights.push(weight);
    }

    fn insert(&mut self, pos: usize, weight: W) {
        let _ = self.weights.insert(pos, weight);
    }

    fn remove(&mut self, pos: usize) -> Option<W> {
        self.weights.remove(pos)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.weights.swap(i, j);
    }

    fn clear(&mut self) {
        self.weights.clear();
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &W> {
        self.weights.iter()
    }
}

/// Weightless nodes: only the count is stored.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Unweighted {
    count: usize,
    unit: (),
}

impl fmt::Debug for Unweighted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unweighted({})", self.count)
    }
}

impl NodeStorage for Unweighted {
    type Weight = ();

    const KIND: StorageKind = StorageKind::Dynamic;

    fn len(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn weight(&self, i: usize) -> Option<&()> {
        (i < self.count).then_some(&self.unit)
    }

    fn weight_mut(&mut self, i: usize) -> Option<&mut ()> {
        (i < self.count).then_some(&mut self.unit)
    }

    fn check_room(&self, _method: &'static str) -> Result<()> {
        Ok(())
    }

    fn push(&mut self, _weight: ()) {
        self.count += 1;
    }

    fn insert(&mut self, _pos: usize, _weight: ()) {
        self.count += 1;
    }

    fn remove(&mut self, pos: usize) -> Option<()> {
        (pos < self.count).then(|| self.count -= 1)
    }

    fn swap(&mut self, _i: usize, _j: usize) {}

    fn clear(&mut self) {
        self.count = 0;
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &()> {
        (0..self.count).map(move |_| &self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_insert_and_remove() {
        let mut nodes = DynamicNodes::default();
        nodes.push('a');
        nodes.push('c');
        nodes.insert(1, 'b');
        assert_eq!(nodes.iter().copied().collect::<String>(), "abc");
        assert_eq!(nodes.remove(0), Some('a'));
        assert_eq!(nodes.remove(9), None);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_static_capacity() {
        let mut nodes: StaticNodes<u8, 2, u8> = StaticNodes::default();
        nodes.check_room("add_node").unwrap();
        nodes.push(1);
        nodes.push(2);
        let err = nodes.check_room("add_node").unwrap_err();
        assert_eq!(
            err,
            GraphError::CapacityExceeded {
                method: "add_node",
                resource: Resource::Nodes,
                capacity: 2,
            }
        );
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_static_swap() {
        let mut nodes: StaticNodes<u8, 4> = StaticNodes::default();
        nodes.push(1);
        nodes.push(2);
        nodes.swap(0, 1);
        assert_eq!(nodes.weight(0), Some(&2));
        *nodes.weight_mut(1).unwrap() = 7;
        assert_eq!(nodes.iter().copied().collect::<Vec<_>>(), vec![2, 7]);
    }

    #[test]
    fn test_unweighted_counts() {
        let mut nodes = Unweighted::default();
        nodes.push(());
        nodes.insert(0, ());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes.iter().count(), 2);
        assert_eq!(nodes.weight(1), Some(&()));
        assert_eq!(nodes.weight(2), None);
        assert_eq!(nodes.remove(1), Some(()));
        assert_eq!(nodes.remove(1), None);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_capacity() {
        let mut nodes: DynamicNodes<u8> = DynamicNodes::default();
        nodes.reserve(10);
        assert!(nodes.capacity() >= 10);
        let mut fixed: StaticNodes<u8, 3, u8> = StaticNodes::default();
        fixed.reserve(10);
        assert_eq!(fixed.capacity(), 3);
        assert_eq!(Unweighted::default().capacity(), usize::MAX);
    }

    #[test]
    fn test_kind() {
        assert_eq!(DynamicNodes::<u8>::KIND, StorageKind::Dynamic);
        assert_eq!(
            StaticNodes::<u8, 5>::KIND,
            StorageKind::Static { capacity: 5 }
        );
    }
}
