//! Runtime description of a graph's compile-time configuration.
//!
//! A graph's shape is fixed by its type parameters. These enums mirror that
//! closed set of choices so it can be inspected, compared and printed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavourKind {
    Directed,
    Undirected,
    DirectedEmbedded,
    UndirectedEmbedded,
}

impl FlavourKind {
    pub fn is_directed(self) -> bool {
        matches!(self, FlavourKind::Directed | FlavourKind::DirectedEmbedded)
    }

    pub fn is_embedded(self) -> bool {
        matches!(
            self,
            FlavourKind::DirectedEmbedded | FlavourKind::UndirectedEmbedded
        )
    }
}

/// Static storage has a fixed capacity; dynamic storage grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Static { capacity: usize },
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// One flat sequence partitioned by node.
    Contiguous,
    /// One independent sequence per node.
    Bucketed,
}

/// Edge storage choice.
///
/// For static bucketed storage the capacity is per partition; for static
/// contiguous storage it bounds the total number of edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeStorageKind {
    pub layout: LayoutKind,
    pub partitions: StorageKind,
    pub records: StorageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharingKind {
    Independent,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub flavour: FlavourKind,
    pub node_storage: StorageKind,
    pub edge_storage: EdgeStorageKind,
    pub weight_sharing: SharingKind,
}

impl fmt::Display for FlavourKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlavourKind::Directed => "directed",
            FlavourKind::Undirected => "undirected",
            FlavourKind::DirectedEmbedded => "directed_embedded",
            FlavourKind::UndirectedEmbedded => "undirected_embedded",
        })
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Static { capacity } => write!(f, "static<{}>", capacity),
            StorageKind::Dynamic => f.write_str("dynamic"),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayoutKind::Contiguous => "contiguous",
            LayoutKind::Bucketed => "bucketed",
        })
    }
}

impl fmt::Display for EdgeStorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.layout, self.records)
    }
}

impl fmt::Display for SharingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SharingKind::Independent => "independent",
            SharingKind::Shared => "shared",
        })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{flavour: {}, node_storage: {}, edge_storage: {}, weight_sharing: {}}}",
            self.flavour, self.node_storage, self.edge_storage, self.weight_sharing
        )
    }
}
