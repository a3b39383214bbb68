use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use log::{debug, trace};

use crate::config::{Configuration, FlavourKind, SharingKind};
use crate::edges::{Bucketed, EdgeLayout, EdgeStorage, StaticContiguous};
use crate::error::{invariant_violation, GraphError, Result};
use crate::nodes::{DynamicNodes, NodeStorage, StaticNodes};
use crate::record::{Directed, DirectedEmbedded, EdgeRecord, Flavour, Undirected, UndirectedEmbedded};
use crate::traversal::{Link, Network};
use crate::weight::{Independent, WeightPolicy};

/// The edge record stored for flavour `F` under weight policy `WP`.
pub type RecordOf<F, WP> = <F as Flavour>::Record<<WP as WeightPolicy>::Handle>;

type StorageOf<F, EL, WP> = <EL as EdgeLayout>::Storage<RecordOf<F, WP>>;

/// Graph with dynamic nodes and independent weights.
pub type DirectedGraph<NW = (), EW = (), EL = Bucketed> =
    Graph<Directed, DynamicNodes<NW>, EL, Independent<EW>>;

pub type UndirectedGraph<NW = (), EW = (), EL = Bucketed> =
    Graph<Undirected, DynamicNodes<NW>, EL, Independent<EW>>;

pub type DirectedEmbeddedGraph<NW = (), EW = (), EL = Bucketed> =
    Graph<DirectedEmbedded, DynamicNodes<NW>, EL, Independent<EW>>;

pub type UndirectedEmbeddedGraph<NW = (), EW = (), EL = Bucketed> =
    Graph<UndirectedEmbedded, DynamicNodes<NW>, EL, Independent<EW>>;

/// Allocation-free graph: at most `NODES` nodes and `EDGES` edge records.
pub type StaticGraph<F, NW, EW, const NODES: usize, const EDGES: usize, Ix = usize> = Graph<
    F,
    StaticNodes<NW, NODES, Ix>,
    StaticContiguous<NODES, EDGES, Ix>,
    Independent<EW>,
>;

/// Nodes plus per-node edge partitions.
///
/// Node indices are dense: erasing a node shifts every higher index down by
/// one. Edge indices are positions inside the host node's partition; erasing
/// an edge moves the partition's last record into the vacated slot.
///
/// Except for [`Directed`], every edge is stored as two records, one in each
/// endpoint's partition, and the graph keeps the pair consistent: targets
/// point at each other, weights compare equal, and embedded records hold each
/// other's index.
pub struct Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    nodes: NS,
    edges: StorageOf<F, EL, WP>,
    marker: PhantomData<(F, EL, WP)>,
}

impl<F, NS, EL, WP> Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    pub fn new() -> Self {
        Self {
            nodes: NS::default(),
            edges: Default::default(),
            marker: PhantomData,
        }
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges. A self-loop counts once.
    pub fn size(&self) -> usize {
        let records = self.edges.len();
        if F::DIRECTED && !F::EMBEDDED {
            records
        } else {
            records / 2
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order() == 0
    }

    pub fn configuration(&self) -> Configuration {
        Configuration {
            flavour: F::KIND,
            node_storage: NS::KIND,
            edge_storage: EL::KIND,
            weight_sharing: WP::KIND,
        }
    }

    // -- nodes ---------------------------------------------------------------

    /// Append a node, returning its index.
    pub fn add_node(&mut self, weight: NS::Weight) -> Result<usize> {
        self.nodes.check_room("add_node")?;
        self.edges.check_partition_room("add_node")?;
        self.nodes.push(weight);
        self.edges.add_partition();
        let index = self.order() - 1;
        trace!("add_node: {}", index);
        Ok(index)
    }

    /// Insert a node at `pos`; every node at or above `pos` moves up by one.
    pub fn insert_node(&mut self, pos: usize, weight: NS::Weight) -> Result<usize> {
        if pos > self.order() {
            return Err(GraphError::NodeIndexOutOfRange {
                method: "insert_node",
                index: pos,
                order: self.order(),
            });
        }
        self.nodes.check_room("insert_node")?;
        self.edges.check_partition_room("insert_node")?;
        self.nodes.insert(pos, weight);
        self.edges.insert_partition(pos);
        self.edges
            .for_each_mut(|r| r.remap_nodes(|n| if n >= pos { n + 1 } else { n }));
        trace!("insert_node: {}", pos);
        Ok(pos)
    }

    /// Remove a node and every edge incident to it. Higher indices shift down.
    pub fn erase_node(&mut self, node: usize) -> Result<NS::Weight> {
        self.check_node("erase_node", node)?;
        Ok(self.erase_node_unchecked("erase_node", node))
    }

    pub(crate) fn erase_node_unchecked(&mut self, method: &'static str, node: usize) -> NS::Weight {
        let before = self.size();
        if F::DIRECTED && !F::EMBEDDED {
            // Incoming edges live in other partitions; scan downwards so a
            // swapped-in record has already been inspected.
            for p in (0..self.order()).filter(|&p| p != node) {
                for i in (0..self.edges.partition_len(p)).rev() {
                    if self.edges.get(p, i).is_some_and(|r| r.target() == node) {
                        self.edges.swap_remove_from_partition(p, i);
                    }
                }
            }
        } else {
            while let Some(last) = self.edges.partition_len(node).checked_sub(1) {
                self.erase_edge_unchecked(method, node, last);
            }
        }
        self.edges.remove_partition(node);
        let weight = match self.nodes.remove(node) {
            Some(weight) => weight,
            None => invariant_violation(method, format_args!("node {node} has no weight")),
        };
        self.edges
            .for_each_mut(|r| r.remap_nodes(|n| if n > node { n - 1 } else { n }));
        debug!(
            "{}: removed node {} and {} edge(s), order now {}",
            method,
            node,
            before - self.size(),
            self.order()
        );
        weight
    }

    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_node("swap_nodes", i)?;
        self.check_node("swap_nodes", j)?;
        if i == j {
            return Ok(());
        }
        self.nodes.swap(i, j);
        self.edges.swap_partitions(i, j);
        self.edges.for_each_mut(|r| {
            r.remap_nodes(|n| match n {
                n if n == i => j,
                n if n == j => i,
                n => n,
            })
        });
        trace!("swap_nodes: {} <-> {}", i, j);
        Ok(())
    }

    pub fn node_weight(&self, node: usize) -> Result<&NS::Weight> {
        self.check_node("node_weight", node)?;
        self.nodes
            .weight(node)
            .ok_or_else(|| self.node_out_of_range("node_weight", node))
    }

    pub fn node_weight_mut(&mut self, node: usize) -> Result<&mut NS::Weight> {
        let order = self.order();
        self.nodes
            .weight_mut(node)
            .ok_or(GraphError::NodeIndexOutOfRange {
                method: "node_weight_mut",
                index: node,
                order,
            })
    }

    /// Replace a node weight, returning the old one.
    pub fn set_node_weight(&mut self, node: usize, weight: NS::Weight) -> Result<NS::Weight> {
        self.check_node("set_node_weight", node)?;
        let order = self.order();
        match self.nodes.weight_mut(node) {
            Some(slot) => Ok(std::mem::replace(slot, weight)),
            None => Err(GraphError::NodeIndexOutOfRange {
                method: "set_node_weight",
                index: node,
                order,
            }),
        }
    }

    pub fn node_weights(&self) -> impl DoubleEndedIterator<Item = &NS::Weight> + '_ {
        self.nodes.iter()
    }

    // -- edges ---------------------------------------------------------------

    /// Add an edge, returning its index in `from`'s partition.
    ///
    /// For two-record flavours the partner goes to the end of `to`'s
    /// partition; a self-loop puts both records in `from`, adjacent.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: WP::Weight) -> Result<usize> {
        self.check_node("add_edge", from)?;
        self.check_node("add_edge", to)?;
        if F::DIRECTED && !F::EMBEDDED {
            self.edges.check_edge_room("add_edge", &[from])?;
        } else {
            self.edges.check_edge_room("add_edge", &[from, to])?;
        }

        let i = self.edges.partition_len(from);
        let j = if from == to {
            i + 1
        } else {
            self.edges.partition_len(to)
        };
        let handle = WP::make(weight);

        if F::DIRECTED && !F::EMBEDDED {
            self.edges
                .push_to_partition(from, Self::record(from, to, 0, false, handle));
        } else {
            let partner = WP::reciprocal(&handle);
            self.edges
                .push_to_partition(from, Self::record(from, to, j, false, handle));
            let reciprocal = if F::DIRECTED {
                Self::record(from, to, i, true, partner)
            } else {
                Self::record(to, from, i, false, partner)
            };
            self.edges.push_to_partition(to, reciprocal);
        }
        trace!("add_edge: {} -> {} at {}", from, to, i);
        Ok(i)
    }

    /// Remove an edge together with its partner record.
    pub fn erase_edge(&mut self, node: usize, edge: usize) -> Result<()> {
        self.check_edge("erase_edge", node, edge)?;
        self.erase_edge_unchecked("erase_edge", node, edge);
        trace!("erase_edge: {} [{}]", node, edge);
        Ok(())
    }

    /// Swap two records of one partition.
    pub fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        self.check_edge("swap_edges", node, i)?;
        self.check_edge("swap_edges", node, j)?;
        if i == j {
            return Ok(());
        }
        if !F::EMBEDDED {
            self.edges.swap_in_partition(node, i, j);
            return Ok(());
        }
        let through_swap = |loc: (usize, usize)| match loc {
            (p, k) if p == node && k == i => (p, j),
            (p, k) if p == node && k == j => (p, i),
            loc => loc,
        };
        let first = through_swap(self.embedded_partner("swap_edges", node, i));
        let second = through_swap(self.embedded_partner("swap_edges", node, j));
        self.edges.swap_in_partition(node, i, j);
        // The record that was at `i` now sits at `j`, and the other way round.
        self.set_complement(first, j);
        self.set_complement(second, i);
        Ok(())
    }

    /// Add an edge at chosen positions: the record hosted by `from` goes to
    /// `pos_from`, its partner in `to` goes to `pos_to`. Later records of
    /// each partition move up by one. Returns the final index of the `from`
    /// record.
    ///
    /// For a self-loop the first record is inserted at `pos_from`, then the
    /// partner at `pos_to` of the grown partition; when `pos_to <= pos_from`
    /// that pushes the first record up by one. [`Directed`] graphs store a
    /// single record and ignore `pos_to`.
    pub fn insert_edge(
        &mut self,
        from: usize,
        pos_from: usize,
        to: usize,
        pos_to: usize,
        weight: WP::Weight,
    ) -> Result<usize> {
        const METHOD: &str = "insert_edge";
        self.check_node(METHOD, from)?;
        self.check_node(METHOD, to)?;
        self.check_slot(METHOD, from, pos_from, 0)?;
        let single = F::DIRECTED && !F::EMBEDDED;
        if single {
            self.edges.check_edge_room(METHOD, &[from])?;
        } else {
            self.check_slot(METHOD, to, pos_to, usize::from(from == to))?;
            self.edges.check_edge_room(METHOD, &[from, to])?;
        }

        let handle = WP::make(weight);
        if single {
            self.edges
                .insert_into_partition(from, pos_from, Self::record(from, to, 0, false, handle));
            trace!("insert_edge: {} [{}] -> {}", from, pos_from, to);
            return Ok(pos_from);
        }

        let first = if from == to && pos_to <= pos_from {
            pos_from + 1
        } else {
            pos_from
        };
        let partner = WP::reciprocal(&handle);
        self.insert_shifting(from, pos_from, Self::record(from, to, pos_to, false, handle), None);
        let reciprocal = if F::DIRECTED {
            Self::record(from, to, first, true, partner)
        } else {
            Self::record(to, from, first, false, partner)
        };
        // The first record already points at `pos_to`.
        let skip = (from == to).then_some(pos_from);
        self.insert_shifting(to, pos_to, reciprocal, skip);
        trace!("insert_edge: {} [{}] -> {} [{}]", from, first, to, pos_to);
        Ok(first)
    }

    /// Stable sort of `range` within `node`'s partition. Partners of the
    /// moved records are repointed, so cross-references stay valid.
    pub fn sort_edges(
        &mut self,
        node: usize,
        range: Range<usize>,
        mut compare: impl FnMut(&RecordOf<F, WP>, &RecordOf<F, WP>) -> Ordering,
    ) -> Result<()> {
        const METHOD: &str = "sort_edges";
        self.check_node(METHOD, node)?;
        let len = self.edges.partition_len(node);
        let Range { start, end } = range;
        if start > end || end > len {
            return Err(GraphError::EdgeIndexOutOfRange {
                method: METHOD,
                node,
                index: start.max(end),
                len,
            });
        }

        // order[k]: old index of the record that ends up at start + k.
        let mut order: Vec<usize> = (start..end).collect();
        {
            let records: Vec<&RecordOf<F, WP>> = self.edges.partition(node).collect();
            order.sort_by(|&a, &b| compare(records[a], records[b]));
        }
        let partners: Vec<Option<(usize, usize)>> = if F::EMBEDDED {
            order
                .iter()
                .map(|&old| self.edges.get(node, old).and_then(Self::stored_partner))
                .collect()
        } else {
            Vec::new()
        };

        // held[k]: old index currently at start + k; slot[o]: where old
        // index start + o currently sits.
        let mut held: Vec<usize> = (start..end).collect();
        let mut slot: Vec<usize> = (0..end - start).collect();
        for (k, &old) in order.iter().enumerate() {
            let wanted = old - start;
            let current = slot[wanted];
            if current != k {
                self.edges.swap_in_partition(node, start + k, start + current);
                let displaced = held[k] - start;
                held.swap(k, current);
                slot[wanted] = k;
                slot[displaced] = current;
            }
        }

        for (k, partner) in partners.into_iter().enumerate() {
            let Some((q, j)) = partner else {
                continue;
            };
            let j = if q == node && (start..end).contains(&j) {
                start + slot[j - start]
            } else {
                j
            };
            self.set_complement((q, j), start + k);
        }
        trace!("sort_edges: {} [{}..{}]", node, start, end);
        Ok(())
    }

    pub fn edges(
        &self,
        node: usize,
    ) -> Result<impl DoubleEndedIterator<Item = &RecordOf<F, WP>> + Clone + '_> {
        self.check_node("edges", node)?;
        Ok(self.edges.partition(node))
    }

    pub fn edge(&self, node: usize, edge: usize) -> Result<&RecordOf<F, WP>> {
        self.check_edge("edge", node, edge)?;
        self.edges
            .get(node, edge)
            .ok_or_else(|| self.edge_out_of_range("edge", node, edge))
    }

    pub fn num_edges(&self, node: usize) -> Result<usize> {
        self.check_node("num_edges", node)?;
        Ok(self.edges.partition_len(node))
    }

    /// Read an edge weight through `f`.
    pub fn edge_weight<R>(
        &self,
        node: usize,
        edge: usize,
        f: impl FnOnce(&WP::Weight) -> R,
    ) -> Result<R> {
        self.check_edge("edge_weight", node, edge)?;
        match self.edges.get(node, edge) {
            Some(record) => Ok(WP::read(record.weight(), f)),
            None => Err(self.edge_out_of_range("edge_weight", node, edge)),
        }
    }

    /// Mutate an edge weight through `f`.
    ///
    /// Shared weights mutate the single instance; independent weights are
    /// copied to the partner record afterwards so the pair stays equal.
    pub fn mutate_edge_weight<R>(
        &mut self,
        node: usize,
        edge: usize,
        f: impl FnOnce(&mut WP::Weight) -> R,
    ) -> Result<R> {
        self.mutate_weight("mutate_edge_weight", node, edge, f)
    }

    pub fn set_edge_weight(&mut self, node: usize, edge: usize, weight: WP::Weight) -> Result<()> {
        self.mutate_weight("set_edge_weight", node, edge, |w| *w = weight)
    }

    fn mutate_weight<R>(
        &mut self,
        method: &'static str,
        node: usize,
        edge: usize,
        f: impl FnOnce(&mut WP::Weight) -> R,
    ) -> Result<R> {
        self.check_edge(method, node, edge)?;
        let partner = if WP::KIND == SharingKind::Independent {
            self.partner(method, node, edge)
        } else {
            None
        };
        let Some(record) = self.edges.get_mut(node, edge) else {
            return Err(self.edge_out_of_range(method, node, edge));
        };
        let out = WP::write(record.weight_mut(), f);
        let updated = WP::reciprocal(record.weight());
        if let Some((q, j)) = partner {
            if let Some(other) = self.edges.get_mut(q, j) {
                *other.weight_mut() = updated;
            }
        }
        Ok(out)
    }

    // -- whole graph ---------------------------------------------------------

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Reserve room for `additional` edge records. Contiguous layouts grow
    /// the flat vector; bucketed layouts spread the room evenly over the
    /// existing partitions. Static layouts ignore it.
    pub fn reserve_edges(&mut self, additional: usize) {
        self.edges.reserve(additional);
    }

    /// Reserve room for `additional` more records hosted by `node`.
    pub fn reserve_partition(&mut self, node: usize, additional: usize) -> Result<()> {
        self.check_node("reserve_partition", node)?;
        self.edges.reserve_partition(node, additional);
        Ok(())
    }

    /// Records `node` can host without reallocating.
    pub fn edges_capacity(&self, node: usize) -> Result<usize> {
        self.check_node("edges_capacity", node)?;
        Ok(self.edges.partition_capacity(node))
    }

    pub fn node_capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn reserve_nodes(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.edges.shrink_to_fit();
    }

    /// Copy that shares no weight instance with `self`.
    ///
    /// `Clone` copies shared weights shallowly. Here every shared instance is
    /// duplicated once, so the two records of an edge still share the copy.
    pub fn deep_clone(&self) -> Self {
        let mut copy = self.clone();
        let mut fresh: HashMap<usize, WP::Handle> = HashMap::new();
        copy.edges.for_each_mut(|r| {
            let handle = r.weight_mut();
            if let Some(id) = WP::identity(handle) {
                let replacement =
                    WP::reciprocal(fresh.entry(id).or_insert_with(|| WP::deep_clone(handle)));
                *handle = replacement;
            }
        });
        debug!("deep_clone: {} weight instance(s) duplicated", fresh.len());
        copy
    }

    /// Panics if any edge record disagrees with its partner.
    pub fn check_invariants(&self) {
        const METHOD: &str = "check_invariants";
        let order = self.order();
        if self.edges.num_partitions() != order {
            invariant_violation(
                METHOD,
                format_args!("{} partitions for {} nodes", self.edges.num_partitions(), order),
            );
        }
        for p in 0..order {
            for (i, record) in self.edges.partition(p).enumerate() {
                let q = record.neighbour();
                if q >= order {
                    invariant_violation(
                        METHOD,
                        format_args!("edge {i} of node {p} points at missing node {q}"),
                    );
                }
                if F::DIRECTED && !F::EMBEDDED {
                    continue;
                }
                let Some((q, j)) = self.partner(METHOD, p, i) else {
                    continue;
                };
                let Some(partner) = self.edges.get(q, j) else {
                    invariant_violation(
                        METHOD,
                        format_args!("edge {i} of node {p} names missing partner {j} in node {q}"),
                    );
                };
                let consistent = partner.neighbour() == p
                    && WP::same_instance(partner.weight(), record.weight())
                    && partner.is_inverted() == (F::DIRECTED && !record.is_inverted())
                    && partner.complementary_index().map_or(true, |c| c == i);
                if !consistent {
                    invariant_violation(
                        METHOD,
                        format_args!("edge {i} of node {p} and its partner {j} in node {q} disagree"),
                    );
                }
            }
        }
    }

    // -- internals -----------------------------------------------------------

    fn record(
        source: usize,
        target: usize,
        complement: usize,
        inverted: bool,
        handle: WP::Handle,
    ) -> RecordOf<F, WP> {
        <RecordOf<F, WP> as EdgeRecord<WP::Handle>>::link(source, target, complement, inverted, handle)
    }

    fn check_node(&self, method: &'static str, node: usize) -> Result<()> {
        if node >= self.order() {
            return Err(self.node_out_of_range(method, node));
        }
        Ok(())
    }

    fn check_edge(&self, method: &'static str, node: usize, edge: usize) -> Result<()> {
        self.check_node(method, node)?;
        if edge >= self.edges.partition_len(node) {
            return Err(self.edge_out_of_range(method, node, edge));
        }
        Ok(())
    }

    /// `pos` may be at most `extra` past the end of `node`'s partition.
    fn check_slot(
        &self,
        method: &'static str,
        node: usize,
        pos: usize,
        extra: usize,
    ) -> Result<()> {
        let len = self.edges.partition_len(node);
        if pos > len + extra {
            return Err(GraphError::EdgeIndexOutOfRange {
                method,
                node,
                index: pos,
                len,
            });
        }
        Ok(())
    }

    fn node_out_of_range(&self, method: &'static str, node: usize) -> GraphError {
        GraphError::NodeIndexOutOfRange {
            method,
            index: node,
            order: self.order(),
        }
    }

    fn edge_out_of_range(&self, method: &'static str, node: usize, edge: usize) -> GraphError {
        GraphError::EdgeIndexOutOfRange {
            method,
            node,
            index: edge,
            len: self.edges.partition_len(node),
        }
    }

    /// Location of the partner record, `None` for single-record flavours.
    fn partner(&self, method: &str, p: usize, i: usize) -> Option<(usize, usize)> {
        if F::DIRECTED && !F::EMBEDDED {
            return None;
        }
        let record = self.edges.get(p, i)?;
        let q = record.neighbour();
        if let Some(j) = record.complementary_index() {
            return Some((q, j));
        }
        let found = self.edges.partition(q).enumerate().position(|(j, r)| {
            (q, j) != (p, i) && r.target() == p && WP::same_instance(r.weight(), record.weight())
        });
        match found {
            Some(j) => Some((q, j)),
            None => invariant_violation(
                method,
                format_args!("edge {i} of node {p} has no reciprocal in node {q}"),
            ),
        }
    }

    fn embedded_partner(&self, method: &str, p: usize, i: usize) -> (usize, usize) {
        match self.partner(method, p, i) {
            Some(loc) => loc,
            None => invariant_violation(method, format_args!("edge {i} of node {p} missing")),
        }
    }

    /// Partner location as recorded in an embedded record.
    fn stored_partner(record: &RecordOf<F, WP>) -> Option<(usize, usize)> {
        Some((record.neighbour(), record.complementary_index()?))
    }

    /// Insert into `p` at `pos`, then repoint the partner of every record
    /// pushed up by one. `skip` is the pre-insertion index of a record whose
    /// complement is already final.
    fn insert_shifting(
        &mut self,
        p: usize,
        pos: usize,
        record: RecordOf<F, WP>,
        skip: Option<usize>,
    ) {
        let moved: Vec<(usize, (usize, usize))> = if F::EMBEDDED {
            self.edges
                .partition(p)
                .enumerate()
                .skip(pos)
                .filter(|&(k, _)| Some(k) != skip)
                .filter_map(|(k, r)| Some((k, Self::stored_partner(r)?)))
                .collect()
        } else {
            Vec::new()
        };
        self.edges.insert_into_partition(p, pos, record);
        for (k, (q, j)) in moved {
            let j = if q == p && j >= pos { j + 1 } else { j };
            self.set_complement((q, j), k + 1);
        }
    }

    fn set_complement(&mut self, (q, j): (usize, usize), index: usize) {
        if let Some(record) = self.edges.get_mut(q, j) {
            record.set_complementary_index(index);
        }
    }

    fn erase_edge_unchecked(&mut self, method: &str, p: usize, i: usize) {
        match self.partner(method, p, i) {
            None => {
                self.edges.swap_remove_from_partition(p, i);
            }
            Some((q, j)) if q == p => {
                self.detach(p, i.max(j));
                self.detach(p, i.min(j));
            }
            Some((q, j)) => {
                self.detach(p, i);
                self.detach(q, j);
            }
        }
    }

    /// Swap-remove one record and repoint the partner of the record that
    /// moved into its slot.
    fn detach(&mut self, p: usize, i: usize) {
        let last = self.edges.partition_len(p).saturating_sub(1);
        self.edges.swap_remove_from_partition(p, i);
        if !F::EMBEDDED || i >= last {
            return;
        }
        let moved = self.edges.get(p, i).and_then(Self::stored_partner);
        if let Some(loc) = moved {
            self.set_complement(loc, i);
        }
    }
}

impl<F, NS, EL, WP> Default for Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, NS, EL, WP> Clone for Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            marker: PhantomData,
        }
    }
}

/// Equal order, equal node weights, and equal records partition by partition.
/// Storage choices do not take part.
impl<F, NS, EL, WP, NS2, EL2> PartialEq<Graph<F, NS2, EL2, WP>> for Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    NS::Weight: PartialEq,
    EL: EdgeLayout,
    WP: WeightPolicy,
    NS2: NodeStorage<Weight = NS::Weight>,
    EL2: EdgeLayout,
{
    fn eq(&self, other: &Graph<F, NS2, EL2, WP>) -> bool {
        self.order() == other.order()
            && self.nodes.iter().eq(other.nodes.iter())
            && (0..self.order()).all(|p| self.edges.partition(p).eq(other.edges.partition(p)))
    }
}

impl<F, NS, EL, WP> fmt::Debug for Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partitions = (0..self.order()).map(|p| (p, self.edges.partition(p).collect::<Vec<_>>()));
        f.debug_struct("Graph")
            .field("flavour", &F::KIND)
            .field("nodes", &self.nodes)
            .field("edges", &DebugMap(partitions))
            .finish()
    }
}

struct DebugMap<I>(I);

impl<I, K, V> fmt::Debug for DebugMap<I>
where
    I: Iterator<Item = (K, V)> + Clone,
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.clone()).finish()
    }
}

impl<F, NS, EL, WP> Network for Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    fn order(&self) -> usize {
        self.nodes.len()
    }

    fn flavour(&self) -> FlavourKind {
        F::KIND
    }

    fn degree(&self, node: usize) -> usize {
        self.edges.partition_len(node)
    }

    fn link(&self, node: usize, edge: usize) -> Option<Link> {
        self.edges.get(node, edge).map(|r| Link {
            neighbour: r.neighbour(),
            outgoing: !r.is_inverted(),
            complementary_index: r.complementary_index(),
        })
    }
}
