//! Generic first-search over any [`Network`].
//!
//! The frontier decides the exploration order: [`StackFrontier`] gives
//! depth-first, [`QueueFrontier`] breadth-first and [`PriorityFrontier`]
//! best-first. Nodes are marked discovered when pushed, so each node enters
//! the frontier at most once, and are reported to the visitor when popped.
//!
//! On `{0→1, 0→2, 1→3}` from node 0, breadth-first reports `0, 1, 2, 3` and
//! depth-first reports `0, 1, 3, 2`: the stack frontier scans edges in
//! reverse, so the first edge's target is popped first.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::ops::ControlFlow;

use log::debug;

use crate::config::FlavourKind;
use crate::error::{GraphError, Result};

/// Read-only view of a graph used by the traversal engine.
pub trait Network {
    fn order(&self) -> usize;

    fn flavour(&self) -> FlavourKind;

    /// Number of records hosted by `node`.
    fn degree(&self, node: usize) -> usize;

    fn link(&self, node: usize, edge: usize) -> Option<Link>;
}

/// One edge record as seen from its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub neighbour: usize,
    /// False only for the incoming half of a directed-embedded edge.
    pub outgoing: bool,
    pub complementary_index: Option<usize>,
}

pub trait Frontier {
    /// Scan a node's edges in insertion order (`true`) or in reverse.
    const FORWARD: bool;

    fn push(&mut self, node: usize);

    fn pop_next(&mut self) -> Option<usize>;

    fn is_empty(&self) -> bool;
}

/// LIFO: depth-first.
#[derive(Debug, Clone, Default)]
pub struct StackFrontier(Vec<usize>);

/// FIFO: breadth-first.
#[derive(Debug, Clone, Default)]
pub struct QueueFrontier(VecDeque<usize>);

/// Highest rank first; equal ranks leave in push order.
pub struct PriorityFrontier<K, R> {
    heap: BinaryHeap<(K, Reverse<u64>, usize)>,
    rank: R,
    pushed: u64,
}

impl Frontier for StackFrontier {
    const FORWARD: bool = false;

    fn push(&mut self, node: usize) {
        self.0.push(node);
    }

    fn pop_next(&mut self) -> Option<usize> {
        self.0.pop()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Frontier for QueueFrontier {
    const FORWARD: bool = true;

    fn push(&mut self, node: usize) {
        self.0.push_back(node);
    }

    fn pop_next(&mut self) -> Option<usize> {
        self.0.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Ord, R: FnMut(usize) -> K> PriorityFrontier<K, R> {
    pub fn new(rank: R) -> Self {
        Self {
            heap: BinaryHeap::new(),
            rank,
            pushed: 0,
        }
    }
}

impl<K: Ord, R: FnMut(usize) -> K> Frontier for PriorityFrontier<K, R> {
    const FORWARD: bool = true;

    fn push(&mut self, node: usize) {
        let key = (self.rank)(node);
        self.heap.push((key, Reverse(self.pushed), node));
        self.pushed += 1;
    }

    fn pop_next(&mut self) -> Option<usize> {
        self.heap.pop().map(|(_, _, node)| node)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Traversal callbacks. Returning `Break` stops the traversal.
pub trait Visitor {
    fn on_discover(&mut self, _node: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// An edge met for the first time.
    fn on_edge(&mut self, _node: usize, _edge: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Undirected flavours only: an edge met again from its other end.
    fn on_second_edge(&mut self, _node: usize, _edge: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn on_finish(&mut self, _node: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl Visitor for () {}

/// Adapts a closure into a visitor that only watches discoveries.
pub struct OnDiscover<F>(pub F);

impl<F: FnMut(usize) -> ControlFlow<()>> Visitor for OnDiscover<F> {
    fn on_discover(&mut self, node: usize) -> ControlFlow<()> {
        (self.0)(node)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    pub start: usize,
    /// Restart from the lowest undiscovered node whenever the frontier
    /// runs dry.
    pub cover_all_components: bool,
}

impl TraversalOptions {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            cover_all_components: false,
        }
    }

    pub fn covering_all_components(mut self) -> Self {
        self.cover_all_components = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalOutcome {
    pub discovered: usize,
    pub finished: usize,
    /// A visitor callback returned `Break`.
    pub stopped: bool,
}

/// Run a first-search from `options.start` with the given frontier.
pub fn traverse<N, Q, V>(
    network: &N,
    mut frontier: Q,
    options: TraversalOptions,
    visitor: &mut V,
) -> Result<TraversalOutcome>
where
    N: Network + ?Sized,
    Q: Frontier,
    V: Visitor + ?Sized,
{
    let order = network.order();
    if options.start >= order {
        return Err(GraphError::NodeIndexOutOfRange {
            method: "traverse",
            index: options.start,
            order,
        });
    }

    let mut search = Search {
        network,
        flavour: network.flavour(),
        discovered: vec![false; order],
        finished: vec![false; order],
        outcome: TraversalOutcome::default(),
    };
    let mut root = Some(options.start);
    let mut cursor = 0;
    while let Some(node) = root {
        search.discovered[node] = true;
        frontier.push(node);
        if search.drain(&mut frontier, visitor).is_break() {
            search.outcome.stopped = true;
            break;
        }
        root = None;
        if options.cover_all_components {
            while cursor < order && search.discovered[cursor] {
                cursor += 1;
            }
            root = (cursor < order).then_some(cursor);
        }
    }

    debug!(
        "traverse: {} of {} node(s) discovered from {}{}",
        search.outcome.discovered,
        order,
        options.start,
        if search.outcome.stopped { ", stopped early" } else { "" }
    );
    Ok(search.outcome)
}

pub fn breadth_first_search<N, V>(
    network: &N,
    start: usize,
    visitor: &mut V,
) -> Result<TraversalOutcome>
where
    N: Network + ?Sized,
    V: Visitor + ?Sized,
{
    traverse(network, QueueFrontier::default(), TraversalOptions::new(start), visitor)
}

pub fn depth_first_search<N, V>(
    network: &N,
    start: usize,
    visitor: &mut V,
) -> Result<TraversalOutcome>
where
    N: Network + ?Sized,
    V: Visitor + ?Sized,
{
    traverse(network, StackFrontier::default(), TraversalOptions::new(start), visitor)
}

/// Best-first search: the frontier node with the highest `rank` goes next.
pub fn priority_search<N, K, R, V>(
    network: &N,
    start: usize,
    rank: R,
    visitor: &mut V,
) -> Result<TraversalOutcome>
where
    N: Network + ?Sized,
    K: Ord,
    R: FnMut(usize) -> K,
    V: Visitor + ?Sized,
{
    traverse(network, PriorityFrontier::new(rank), TraversalOptions::new(start), visitor)
}

struct Search<'n, N: ?Sized> {
    network: &'n N,
    flavour: FlavourKind,
    discovered: Vec<bool>,
    finished: Vec<bool>,
    outcome: TraversalOutcome,
}

impl<N: Network + ?Sized> Search<'_, N> {
    fn drain<Q: Frontier, V: Visitor + ?Sized>(
        &mut self,
        frontier: &mut Q,
        visitor: &mut V,
    ) -> ControlFlow<()> {
        while let Some(node) = frontier.pop_next() {
            self.outcome.discovered += 1;
            visitor.on_discover(node)?;
            self.scan(node, frontier, visitor)?;
            self.finished[node] = true;
            self.outcome.finished += 1;
            visitor.on_finish(node)?;
        }
        ControlFlow::Continue(())
    }

    fn scan<Q: Frontier, V: Visitor + ?Sized>(
        &mut self,
        node: usize,
        frontier: &mut Q,
        visitor: &mut V,
    ) -> ControlFlow<()> {
        let degree = self.network.degree(node);
        // Plain undirected self-loops have no complement: pair records up
        // by alternation.
        let mut loop_half_seen = false;
        for k in 0..degree {
            let edge = if Q::FORWARD { k } else { degree - 1 - k };
            let Some(link) = self.network.link(node, edge) else {
                continue;
            };

            if self.flavour.is_directed() {
                if !link.outgoing {
                    continue;
                }
                visitor.on_edge(node, edge)?;
            } else {
                let second = if link.neighbour == node {
                    match link.complementary_index {
                        Some(c) if Q::FORWARD => c < edge,
                        Some(c) => c > edge,
                        None => {
                            loop_half_seen = !loop_half_seen;
                            !loop_half_seen
                        }
                    }
                } else {
                    self.finished[link.neighbour]
                };
                if second {
                    visitor.on_second_edge(node, edge)?;
                    continue;
                }
                visitor.on_edge(node, edge)?;
            }

            let next = link.neighbour;
            if !self.discovered[next] {
                self.discovered[next] = true;
                frontier.push(next);
            }
        }
        ControlFlow::Continue(())
    }
}
