//! Array-backed vector with a compile-time capacity.
//!
//! Backs every static storage. Never allocates: live elements occupy the
//! first `len` slots, every slot past `len` is `None`.

use std::fmt;
use std::iter::Flatten;
use std::slice;

use crate::index::IndexType;

#[derive(Clone, PartialEq, Eq)]
pub struct FixedVec<T, const N: usize, Ix: IndexType = usize> {
    slots: [Option<T>; N],
    len: Ix,
}

pub type Iter<'a, T> = Flatten<slice::Iter<'a, Option<T>>>;
pub type IterMut<'a, T> = Flatten<slice::IterMut<'a, Option<T>>>;

impl<T, const N: usize, Ix: IndexType> FixedVec<T, N, Ix> {
    const CAPACITY_FITS: () = assert!(
        N <= Ix::MAX_INDEX,
        "static capacity does not fit the chosen index type"
    );

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS;
        Self {
            slots: std::array::from_fn(|_| None),
            len: Ix::from_index(0),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len.index()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.live().get(i).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.live_mut().get_mut(i).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.live().iter().flatten()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.live_mut().iter_mut().flatten()
    }

    /// Append; hands the value back if the vector is full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let len = self.len();
        if len == N {
            return Err(value);
        }
        self.slots[len] = Some(value);
        self.set_len(len + 1);
        Ok(())
    }

    /// Insert at `pos <= len`, shifting later elements right.
    pub fn insert(&mut self, pos: usize, value: T) -> Result<(), T> {
        let len = self.len();
        if len == N || pos > len {
            return Err(value);
        }
        self.slots[len] = Some(value);
        self.slots[pos..=len].rotate_right(1);
        self.set_len(len + 1);
        Ok(())
    }

    /// Order-preserving removal.
    pub fn remove(&mut self, pos: usize) -> Option<T> {
        let len = self.len();
        if pos >= len {
            return None;
        }
        let value = self.slots[pos].take();
        self.slots[pos..len].rotate_left(1);
        self.set_len(len - 1);
        value
    }

    /// Removes `pos` by moving the last element into its slot.
    pub fn swap_remove(&mut self, pos: usize) -> Option<T> {
        let len = self.len();
        if pos >= len {
            return None;
        }
        self.slots.swap(pos, len - 1);
        self.set_len(len - 1);
        self.slots[len - 1].take()
    }

    /// Drops `start..end`, shifting the tail down.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let end = end.min(len);
        if start >= end {
            return;
        }
        for slot in &mut self.slots[start..end] {
            *slot = None;
        }
        self.slots[start..len].rotate_left(end - start);
        self.set_len(len - (end - start));
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.live_mut().swap(i, j);
    }

    pub fn clear(&mut self) {
        for slot in self.live_mut() {
            *slot = None;
        }
        self.set_len(0);
    }

    /// The live region as raw slots, for block rotations.
    pub(crate) fn live_mut(&mut self) -> &mut [Option<T>] {
        let len = self.len();
        &mut self.slots[..len]
    }

    pub(crate) fn live(&self) -> &[Option<T>] {
        &self.slots[..self.len()]
    }

    fn set_len(&mut self, len: usize) {
        self.len = Ix::from_index(len);
    }
}

impl<T, const N: usize, Ix: IndexType> Default for FixedVec<T, N, Ix> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, const N: usize, Ix: IndexType> fmt::Debug for FixedVec<T, N, Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<const N: usize>(v: &FixedVec<u32, N, u8>) -> Vec<u32> {
        v.iter().copied().collect()
    }

    #[test]
    fn test_push_until_full() {
        let mut v: FixedVec<u32, 3, u8> = FixedVec::new();
        assert!(v.push(1).is_ok());
        assert!(v.push(2).is_ok());
        assert!(v.push(3).is_ok());
        assert_eq!(v.push(4), Err(4));
        assert_eq!(collect(&v), vec![1, 2, 3]);
        assert!(v.is_full());
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut v: FixedVec<u32, 4, u8> = FixedVec::new();
        v.push(1).unwrap();
        v.push(3).unwrap();
        v.insert(1, 2).unwrap();
        v.insert(0, 0).unwrap();
        assert_eq!(collect(&v), vec![0, 1, 2, 3]);
        assert_eq!(v.insert(0, 9), Err(9));
    }

    #[test]
    fn test_insert_past_end_rejected() {
        let mut v: FixedVec<u32, 4, u8> = FixedVec::new();
        assert_eq!(v.insert(1, 5), Err(5));
        assert!(v.is_empty());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut v: FixedVec<u32, 4, u8> = FixedVec::new();
        for x in 0..4 {
            v.push(x).unwrap();
        }
        assert_eq!(v.remove(1), Some(1));
        assert_eq!(collect(&v), vec![0, 2, 3]);
        assert_eq!(v.remove(5), None);
    }

    #[test]
    fn test_swap_remove_moves_last() {
        let mut v: FixedVec<u32, 4, u8> = FixedVec::new();
        for x in 0..4 {
            v.push(x).unwrap();
        }
        assert_eq!(v.swap_remove(0), Some(0));
        assert_eq!(collect(&v), vec![3, 1, 2]);
        assert_eq!(v.swap_remove(2), Some(2));
        assert_eq!(collect(&v), vec![3, 1]);
    }

    #[test]
    fn test_remove_range() {
        let mut v: FixedVec<u32, 6, u8> = FixedVec::new();
        for x in 0..6 {
            v.push(x).unwrap();
        }
        v.remove_range(1, 4);
        assert_eq!(collect(&v), vec![0, 4, 5]);
        assert!(v.push(6).is_ok());
        assert_eq!(collect(&v), vec![0, 4, 5, 6]);
    }

    #[test]
    fn test_iter_rev_and_clear() {
        let mut v: FixedVec<u32, 3, u8> = FixedVec::new();
        v.push(1).unwrap();
        v.push(2).unwrap();
        assert_eq!(v.iter().rev().copied().collect::<Vec<_>>(), vec![2, 1]);
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.get(0), None);
    }

    #[test]
    fn test_equality_ignores_history() {
        let mut a: FixedVec<u32, 3, u8> = FixedVec::new();
        let mut b: FixedVec<u32, 3, u8> = FixedVec::new();
        a.push(1).unwrap();
        a.push(2).unwrap();
        a.swap_remove(1);
        b.push(1).unwrap();
        assert_eq!(a, b);
    }
}
