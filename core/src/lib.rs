//! graph-store-core: generic graph storage and traversal.
//!
//! A graph is configured entirely through type parameters: its flavour
//! (directed or undirected, plain or embedded), node storage, edge layout
//! and edge-weight sharing policy. Static storages never allocate, so a
//! [`StaticGraph`] can live on the stack.
//!
//! Nodes and edges are addressed by dense indices. Embedded flavours store
//! each edge twice and cross-reference the two records, so erasing either
//! half finds its partner in O(1).
//!
//! Traversal works on anything implementing [`Network`] and is generic over
//! the frontier: stack, queue or priority heap.

mod config;
mod edges;
mod error;
mod fixed;
mod graph;
mod index;
mod nodes;
mod record;
mod subgraph;
mod traversal;
mod weight;

pub use config::{
    Configuration, EdgeStorageKind, FlavourKind, LayoutKind, SharingKind, StorageKind,
};
pub use edges::{
    Bucketed, BucketedEdges, Contiguous, ContiguousEdges, EdgeLayout, EdgeStorage,
    StaticBucketed, StaticBucketedEdges, StaticContiguous, StaticContiguousEdges,
};
pub use error::{GraphError, Resource, Result};
pub use fixed::FixedVec;
pub use graph::{
    DirectedEmbeddedGraph, DirectedGraph, Graph, RecordOf, StaticGraph,
    UndirectedEmbeddedGraph, UndirectedGraph,
};
pub use index::IndexType;
pub use nodes::{DynamicNodes, NodeStorage, StaticNodes, Unweighted};
pub use record::{
    Directed, DirectedEmbedded, DirectedEmbeddedEdge, Edge, EdgeRecord, EmbeddedEdge, Flavour,
    Undirected, UndirectedEmbedded,
};
pub use subgraph::sub_graph;
pub use traversal::{
    breadth_first_search, depth_first_search, priority_search, traverse, Frontier, Link,
    Network, OnDiscover, PriorityFrontier, QueueFrontier, StackFrontier, TraversalOptions,
    TraversalOutcome, Visitor,
};
pub use weight::{Independent, Shared, SharedWeight, WeightPolicy};
