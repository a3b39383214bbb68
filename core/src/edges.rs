//! Edge record storage, partitioned by host node.
//!
//! Every node owns one partition. Records inside a partition keep insertion
//! order until an erase, which swaps the last record of the partition into
//! the vacated slot. Storages know nothing about what a record means: keeping
//! complementary indices valid after a swap is the graph's job.
//!
//! Four layouts:
//!
//! - [`Contiguous`]: one flat vector plus a table of partition ends.
//! - [`Bucketed`]: one vector per node.
//! - [`StaticContiguous`] and [`StaticBucketed`]: the same shapes over
//!   fixed-capacity arrays.

use std::fmt;
use std::marker::PhantomData;
use std::slice;

use crate::config::{EdgeStorageKind, LayoutKind, StorageKind};
use crate::error::{GraphError, Resource, Result};
use crate::fixed::{self, FixedVec};
use crate::index::IndexType;

pub trait EdgeStorage<E>: Clone + fmt::Debug + Default {
    type Iter<'a>: DoubleEndedIterator<Item = &'a E> + Clone
    where
        Self: 'a,
        E: 'a;

    fn num_partitions(&self) -> usize;

    /// Total number of records across all partitions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn partition_len(&self, p: usize) -> usize;

    /// Records hosted by `p`, in order. Empty for an unknown partition.
    fn partition(&self, p: usize) -> Self::Iter<'_>;

    fn get(&self, p: usize, i: usize) -> Option<&E>;

    fn get_mut(&mut self, p: usize, i: usize) -> Option<&mut E>;

    /// Fails if one more partition would exceed the capacity.
    fn check_partition_room(&self, method: &'static str) -> Result<()>;

    /// Fails unless one record can be pushed for every entry of `partitions`.
    fn check_edge_room(&self, method: &'static str, partitions: &[usize]) -> Result<()>;

    fn add_partition(&mut self);

    fn insert_partition(&mut self, pos: usize);

    /// Drops partition `pos` together with its records.
    fn remove_partition(&mut self, pos: usize);

    fn swap_partitions(&mut self, a: usize, b: usize);

    /// Appends to `p` and returns the record's index inside it.
    fn push_to_partition(&mut self, p: usize, record: E) -> usize;

    /// Inserts at `i <= partition_len(p)`, shifting later records of `p` up.
    fn insert_into_partition(&mut self, p: usize, i: usize, record: E);

    fn swap_remove_from_partition(&mut self, p: usize, i: usize) -> Option<E>;

    fn swap_in_partition(&mut self, p: usize, i: usize, j: usize);

    fn for_each_mut(&mut self, f: impl FnMut(&mut E));

    fn clear(&mut self);

    /// Records `p` can hold without reallocating.
    fn partition_capacity(&self, p: usize) -> usize;

    fn reserve(&mut self, _additional: usize) {}

    fn reserve_partition(&mut self, _p: usize, _additional: usize) {}

    fn shrink_to_fit(&mut self) {}
}

/// Type-level choice of edge storage.
pub trait EdgeLayout {
    const KIND: EdgeStorageKind;

    type Storage<E: Clone + fmt::Debug>: EdgeStorage<E>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Contiguous;

#[derive(Debug, Clone, Copy, Default)]
pub struct Bucketed;

/// At most `P` partitions and `N` records in total.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContiguous<const P: usize, const N: usize, Ix = usize>(PhantomData<Ix>);

/// At most `P` partitions of at most `M` records each.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBucketed<const P: usize, const M: usize, Ix = usize>(PhantomData<Ix>);

impl EdgeLayout for Contiguous {
    const KIND: EdgeStorageKind = EdgeStorageKind {
        layout: LayoutKind::Contiguous,
        partitions: StorageKind::Dynamic,
        records: StorageKind::Dynamic,
    };

    type Storage<E: Clone + fmt::Debug> = ContiguousEdges<E>;
}

impl EdgeLayout for Bucketed {
    const KIND: EdgeStorageKind = EdgeStorageKind {
        layout: LayoutKind::Bucketed,
        partitions: StorageKind::Dynamic,
        records: StorageKind::Dynamic,
    };

    type Storage<E: Clone + fmt::Debug> = BucketedEdges<E>;
}

impl<const P: usize, const N: usize, Ix: IndexType> EdgeLayout for StaticContiguous<P, N, Ix> {
    const KIND: EdgeStorageKind = EdgeStorageKind {
        layout: LayoutKind::Contiguous,
        partitions: StorageKind::Static { capacity: P },
        records: StorageKind::Static { capacity: N },
    };

    type Storage<E: Clone + fmt::Debug> = StaticContiguousEdges<E, P, N, Ix>;
}

impl<const P: usize, const M: usize, Ix: IndexType> EdgeLayout for StaticBucketed<P, M, Ix> {
    const KIND: EdgeStorageKind = EdgeStorageKind {
        layout: LayoutKind::Bucketed,
        partitions: StorageKind::Static { capacity: P },
        records: StorageKind::Static { capacity: M },
    };

    type Storage<E: Clone + fmt::Debug> = StaticBucketedEdges<E, P, M, Ix>;
}

fn edge_capacity(method: &'static str, capacity: usize) -> GraphError {
    GraphError::CapacityExceeded {
        method,
        resource: Resource::Edges,
        capacity,
    }
}

fn partition_capacity(method: &'static str, capacity: usize) -> GraphError {
    GraphError::CapacityExceeded {
        method,
        resource: Resource::EdgePartitions,
        capacity,
    }
}

// ---------------------------------------------------------------------------
// Contiguous
// ---------------------------------------------------------------------------

/// All records in one vector; `ends[p]` is one past the last record of `p`.
#[derive(Debug, Clone)]
pub struct ContiguousEdges<E> {
    records: Vec<E>,
    ends: Vec<usize>,
}

impl<E> Default for ContiguousEdges<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            ends: Vec::new(),
        }
    }
}

impl<E> ContiguousEdges<E> {
    fn start(&self, p: usize) -> usize {
        if p == 0 {
            0
        } else {
            self.ends[p - 1]
        }
    }

    fn range(&self, p: usize) -> (usize, usize) {
        if p >= self.ends.len() {
            return (0, 0);
        }
        (self.start(p), self.ends[p])
    }
}

impl<E: Clone + fmt::Debug> EdgeStorage<E> for ContiguousEdges<E> {
    type Iter<'a> = slice::Iter<'a, E>
    where
        Self: 'a,
        E: 'a;

    fn num_partitions(&self) -> usize {
        self.ends.len()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn partition_len(&self, p: usize) -> usize {
        let (start, end) = self.range(p);
        end - start
    }

    fn partition(&self, p: usize) -> slice::Iter<'_, E> {
        let (start, end) = self.range(p);
        self.records[start..end].iter()
    }

    fn get(&self, p: usize, i: usize) -> Option<&E> {
        let (start, end) = self.range(p);
        self.records[start..end].get(i)
    }

    fn get_mut(&mut self, p: usize, i: usize) -> Option<&mut E> {
        let (start, end) = self.range(p);
        self.records[start..end].get_mut(i)
    }

    fn check_partition_room(&self, _method: &'static str) -> Result<()> {
        Ok(())
    }

    fn check_edge_room(&self, _method: &'static str, _partitions: &[usize]) -> Result<()> {
        Ok(())
    }

    fn add_partition(&mut self) {
        self.ends.push(self.records.len());
    }

    fn insert_partition(&mut self, pos: usize) {
        let at = if pos < self.ends.len() {
            self.start(pos)
        } else {
            self.records.len()
        };
        self.ends.insert(pos, at);
    }

    fn remove_partition(&mut self, pos: usize) {
        if pos >= self.ends.len() {
            return;
        }
        let (start, end) = self.range(pos);
        self.records.drain(start..end);
        self.ends.remove(pos);
        for e in &mut self.ends[pos..] {
            *e -= end - start;
        }
    }

    fn swap_partitions(&mut self, a: usize, b: usize) {
        let (a, b) = (a.min(b), a.max(b));
        if a == b || b >= self.ends.len() {
            return;
        }
        let (sa, ea) = self.range(a);
        let (sb, eb) = self.range(b);
        let (la, lb) = (ea - sa, eb - sb);
        // [A][mid][B] -> [mid][B][A] -> [B][mid][A]
        let block = &mut self.records[sa..eb];
        block.rotate_left(la);
        block[..(sb - ea) + lb].rotate_right(lb);
        for e in &mut self.ends[a..b] {
            *e = *e + lb - la;
        }
    }

    fn push_to_partition(&mut self, p: usize, record: E) -> usize {
        let (start, end) = self.range(p);
        self.records.insert(end, record);
        for e in &mut self.ends[p..] {
            *e += 1;
        }
        end - start
    }

    fn insert_into_partition(&mut self, p: usize, i: usize, record: E) {
        let (start, end) = self.range(p);
        if p >= self.ends.len() || start + i > end {
            return;
        }
        self.records.insert(start + i, record);
        for e in &mut self.ends[p..] {
            *e += 1;
        }
    }

    fn swap_remove_from_partition(&mut self, p: usize, i: usize) -> Option<E> {
        let (start, end) = self.range(p);
        if start + i >= end {
            return None;
        }
        self.records.swap(start + i, end - 1);
        let record = self.records.remove(end - 1);
        for e in &mut self.ends[p..] {
            *e -= 1;
        }
        Some(record)
    }

    fn swap_in_partition(&mut self, p: usize, i: usize, j: usize) {
        let (start, end) = self.range(p);
        self.records[start..end].swap(i, j);
    }

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.records.iter_mut().for_each(f);
    }

    fn clear(&mut self) {
        self.records.clear();
        self.ends.clear();
    }

    fn partition_capacity(&self, p: usize) -> usize {
        self.records.capacity() - self.records.len() + self.partition_len(p)
    }

    fn reserve(&mut self, additional: usize) {
        self.records.reserve(additional);
    }

    /// Room is shared by all partitions, so this reserves in the flat vector.
    fn reserve_partition(&mut self, _p: usize, additional: usize) {
        self.records.reserve(additional);
    }

    fn shrink_to_fit(&mut self) {
        self.records.shrink_to_fit();
        self.ends.shrink_to_fit();
    }
}

// ---------------------------------------------------------------------------
// Bucketed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BucketedEdges<E> {
    buckets: Vec<Vec<E>>,
}

impl<E> Default for BucketedEdges<E> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<E: Clone + fmt::Debug> EdgeStorage<E> for BucketedEdges<E> {
    type Iter<'a> = slice::Iter<'a, E>
    where
        Self: 'a,
        E: 'a;

    fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    fn partition_len(&self, p: usize) -> usize {
        self.buckets.get(p).map_or(0, Vec::len)
    }

    fn partition(&self, p: usize) -> slice::Iter<'_, E> {
        self.buckets.get(p).map(Vec::as_slice).unwrap_or(&[]).iter()
    }

    fn get(&self, p: usize, i: usize) -> Option<&E> {
        self.buckets.get(p)?.get(i)
    }

    fn get_mut(&mut self, p: usize, i: usize) -> Option<&mut E> {
        self.buckets.get_mut(p)?.get_mut(i)
    }

    fn check_partition_room(&self, _method: &'static str) -> Result<()> {
        Ok(())
    }

    fn check_edge_room(&self, _method: &'static str, _partitions: &[usize]) -> Result<()> {
        Ok(())
    }

    fn add_partition(&mut self) {
        self.buckets.push(Vec::new());
    }

    fn insert_partition(&mut self, pos: usize) {
        self.buckets.insert(pos, Vec::new());
    }

    fn remove_partition(&mut self, pos: usize) {
        if pos < self.buckets.len() {
            self.buckets.remove(pos);
        }
    }

    fn swap_partitions(&mut self, a: usize, b: usize) {
        self.buckets.swap(a, b);
    }

    fn push_to_partition(&mut self, p: usize, record: E) -> usize {
        let bucket = &mut self.buckets[p];
        bucket.push(record);
        bucket.len() - 1
    }

    fn insert_into_partition(&mut self, p: usize, i: usize, record: E) {
        if let Some(bucket) = self.buckets.get_mut(p).filter(|b| i <= b.len()) {
            bucket.insert(i, record);
        }
    }

    fn swap_remove_from_partition(&mut self, p: usize, i: usize) -> Option<E> {
        let bucket = self.buckets.get_mut(p)?;
        (i < bucket.len()).then(|| bucket.swap_remove(i))
    }

    fn swap_in_partition(&mut self, p: usize, i: usize, j: usize) {
        self.buckets[p].swap(i, j);
    }

    fn for_each_mut(&mut self, mut f: impl FnMut(&mut E)) {
        for record in self.buckets.iter_mut().flatten() {
            f(record);
        }
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }

    fn partition_capacity(&self, p: usize) -> usize {
        self.buckets.get(p).map_or(0, Vec::capacity)
    }

    /// Spreads the room evenly over the existing partitions.
    fn reserve(&mut self, additional: usize) {
        let count = self.buckets.len();
        if count == 0 {
            return;
        }
        let share = additional.div_ceil(count);
        for bucket in &mut self.buckets {
            bucket.reserve(share);
        }
    }

    fn reserve_partition(&mut self, p: usize, additional: usize) {
        if let Some(bucket) = self.buckets.get_mut(p) {
            bucket.reserve(additional);
        }
    }

    fn shrink_to_fit(&mut self) {
        for bucket in &mut self.buckets {
            bucket.shrink_to_fit();
        }
        self.buckets.shrink_to_fit();
    }
}

// ---------------------------------------------------------------------------
// Static contiguous
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct StaticContiguousEdges<E, const P: usize, const N: usize, Ix: IndexType = usize> {
    records: FixedVec<E, N, Ix>,
    ends: FixedVec<Ix, P, Ix>,
}

impl<E, const P: usize, const N: usize, Ix: IndexType> Default
    for StaticContiguousEdges<E, P, N, Ix>
{
    fn default() -> Self {
        Self {
            records: FixedVec::new(),
            ends: FixedVec::new(),
        }
    }
}

impl<E: fmt::Debug, const P: usize, const N: usize, Ix: IndexType> fmt::Debug
    for StaticContiguousEdges<E, P, N, Ix>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticContiguousEdges")
            .field("records", &self.records)
            .field("ends", &self.ends)
            .finish()
    }
}

impl<E, const P: usize, const N: usize, Ix: IndexType> StaticContiguousEdges<E, P, N, Ix> {
    fn end(&self, p: usize) -> usize {
        self.ends.get(p).map_or(0, |e| e.index())
    }

    fn range(&self, p: usize) -> (usize, usize) {
        if p >= self.ends.len() {
            return (0, 0);
        }
        let start = if p == 0 { 0 } else { self.end(p - 1) };
        (start, self.end(p))
    }

    fn shift_ends(&mut self, from: usize, to: usize, f: impl Fn(usize) -> usize) {
        for p in from..to {
            if let Some(e) = self.ends.get_mut(p) {
                *e = Ix::from_index(f(e.index()));
            }
        }
    }
}

impl<E: Clone + fmt::Debug, const P: usize, const N: usize, Ix: IndexType> EdgeStorage<E>
    for StaticContiguousEdges<E, P, N, Ix>
{
    type Iter<'a> = fixed::Iter<'a, E>
    where
        Self: 'a,
        E: 'a;

    fn num_partitions(&self) -> usize {
        self.ends.len()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn partition_len(&self, p: usize) -> usize {
        let (start, end) = self.range(p);
        end - start
    }

    fn partition(&self, p: usize) -> fixed::Iter<'_, E> {
        let (start, end) = self.range(p);
        self.records.live()[start..end].iter().flatten()
    }

    fn get(&self, p: usize, i: usize) -> Option<&E> {
        let (start, end) = self.range(p);
        (start + i < end).then(|| self.records.get(start + i)).flatten()
    }

    fn get_mut(&mut self, p: usize, i: usize) -> Option<&mut E> {
        let (start, end) = self.range(p);
        if start + i >= end {
            return None;
        }
        self.records.get_mut(start + i)
    }

    fn check_partition_room(&self, method: &'static str) -> Result<()> {
        if self.ends.is_full() {
            return Err(partition_capacity(method, P));
        }
        Ok(())
    }

    fn check_edge_room(&self, method: &'static str, partitions: &[usize]) -> Result<()> {
        if self.records.len() + partitions.len() > N {
            return Err(edge_capacity(method, N));
        }
        Ok(())
    }

    fn add_partition(&mut self) {
        let _ = self.ends.push(Ix::from_index(self.records.len()));
    }

    fn insert_partition(&mut self, pos: usize) {
        let at = if pos < self.ends.len() {
            self.range(pos).0
        } else {
            self.records.len()
        };
        let _ = self.ends.insert(pos, Ix::from_index(at));
    }

    fn remove_partition(&mut self, pos: usize) {
        if pos >= self.ends.len() {
            return;
        }
        let (start, end) = self.range(pos);
        self.records.remove_range(start, end);
        self.ends.remove(pos);
        let count = self.ends.len();
        self.shift_ends(pos, count, |e| e - (end - start));
    }

    fn swap_partitions(&mut self, a: usize, b: usize) {
        let (a, b) = (a.min(b), a.max(b));
        if a == b || b >= self.ends.len() {
            return;
        }
        let (sa, ea) = self.range(a);
        let (sb, eb) = self.range(b);
        let (la, lb) = (ea - sa, eb - sb);
        let block = &mut self.records.live_mut()[sa..eb];
        block.rotate_left(la);
        block[..(sb - ea) + lb].rotate_right(lb);
        self.shift_ends(a, b, |e| e + lb - la);
    }

    fn push_to_partition(&mut self, p: usize, record: E) -> usize {
        let (start, end) = self.range(p);
        let _ = self.records.insert(end, record);
        let count = self.ends.len();
        self.shift_ends(p, count, |e| e + 1);
        end - start
    }

    fn insert_into_partition(&mut self, p: usize, i: usize, record: E) {
        let (start, end) = self.range(p);
        if p >= self.ends.len() || start + i > end {
            return;
        }
        if self.records.insert(start + i, record).is_ok() {
            let count = self.ends.len();
            self.shift_ends(p, count, |e| e + 1);
        }
    }

    fn swap_remove_from_partition(&mut self, p: usize, i: usize) -> Option<E> {
        let (start, end) = self.range(p);
        if start + i >= end {
            return None;
        }
        self.records.swap(start + i, end - 1);
        let record = self.records.remove(end - 1);
        let count = self.ends.len();
        self.shift_ends(p, count, |e| e - 1);
        record
    }

    fn swap_in_partition(&mut self, p: usize, i: usize, j: usize) {
        let (start, _) = self.range(p);
        self.records.swap(start + i, start + j);
    }

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.records.iter_mut().for_each(f);
    }

    fn clear(&mut self) {
        self.records.clear();
        self.ends.clear();
    }

    fn partition_capacity(&self, p: usize) -> usize {
        N - self.records.len() + self.partition_len(p)
    }
}

// ---------------------------------------------------------------------------
// Static bucketed
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct StaticBucketedEdges<E, const P: usize, const M: usize, Ix: IndexType = usize> {
    buckets: FixedVec<FixedVec<E, M, Ix>, P, Ix>,
}

impl<E, const P: usize, const M: usize, Ix: IndexType> Default
    for StaticBucketedEdges<E, P, M, Ix>
{
    fn default() -> Self {
        Self {
            buckets: FixedVec::new(),
        }
    }
}

impl<E: fmt::Debug, const P: usize, const M: usize, Ix: IndexType> fmt::Debug
    for StaticBucketedEdges<E, P, M, Ix>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.buckets, f)
    }
}

impl<E: Clone + fmt::Debug, const P: usize, const M: usize, Ix: IndexType> EdgeStorage<E>
    for StaticBucketedEdges<E, P, M, Ix>
{
    type Iter<'a> = fixed::Iter<'a, E>
    where
        Self: 'a,
        E: 'a;

    fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(FixedVec::len).sum()
    }

    fn partition_len(&self, p: usize) -> usize {
        self.buckets.get(p).map_or(0, FixedVec::len)
    }

    fn partition(&self, p: usize) -> fixed::Iter<'_, E> {
        match self.buckets.get(p) {
            Some(bucket) => bucket.iter(),
            None => (&[] as &[Option<E>]).iter().flatten(),
        }
    }

    fn get(&self, p: usize, i: usize) -> Option<&E> {
        self.buckets.get(p)?.get(i)
    }

    fn get_mut(&mut self, p: usize, i: usize) -> Option<&mut E> {
        self.buckets.get_mut(p)?.get_mut(i)
    }

    fn check_partition_room(&self, method: &'static str) -> Result<()> {
        if self.buckets.is_full() {
            return Err(partition_capacity(method, P));
        }
        Ok(())
    }

    fn check_edge_room(&self, method: &'static str, partitions: &[usize]) -> Result<()> {
        for &p in partitions {
            let wanted = partitions.iter().filter(|&&q| q == p).count();
            if self.partition_len(p) + wanted > M {
                return Err(edge_capacity(method, M));
            }
        }
        Ok(())
    }

    fn add_partition(&mut self) {
        let _ = self.buckets.push(FixedVec::new());
    }

    fn insert_partition(&mut self, pos: usize) {
        let _ = self.buckets.insert(pos, FixedVec::new());
    }

    fn remove_partition(&mut self, pos: usize) {
        self.buckets.remove(pos);
    }

    fn swap_partitions(&mut self, a: usize, b: usize) {
        self.buckets.swap(a, b);
    }

    fn push_to_partition(&mut self, p: usize, record: E) -> usize {
        match self.buckets.get_mut(p) {
            Some(bucket) => {
                let _ = bucket.push(record);
                bucket.len() - 1
            }
            None => 0,
        }
    }

    fn insert_into_partition(&mut self, p: usize, i: usize, record: E) {
        if let Some(bucket) = self.buckets.get_mut(p) {
            let _ = bucket.insert(i, record);
        }
    }

    fn swap_remove_from_partition(&mut self, p: usize, i: usize) -> Option<E> {
        self.buckets.get_mut(p)?.swap_remove(i)
    }

    fn swap_in_partition(&mut self, p: usize, i: usize, j: usize) {
        if let Some(bucket) = self.buckets.get_mut(p) {
            bucket.swap(i, j);
        }
    }

    fn for_each_mut(&mut self, mut f: impl FnMut(&mut E)) {
        for bucket in self.buckets.iter_mut() {
            bucket.iter_mut().for_each(&mut f);
        }
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }

    fn partition_capacity(&self, _p: usize) -> usize {
        M
    }
}
