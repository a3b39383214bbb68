use std::fmt;

use thiserror::Error;

/// The bounded resource a static storage ran out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Nodes,
    /// One edge partition per node; static edge storages cap their count.
    EdgePartitions,
    Edges,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Nodes => f.write_str("node"),
            Resource::EdgePartitions => f.write_str("edge partition"),
            Resource::Edges => f.write_str("edge"),
        }
    }
}

/// Recoverable graph errors.
///
/// Every operation that returns one of these checks before mutating, so the
/// graph is unchanged when an error comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{method}: {resource} capacity of {capacity} exceeded")]
    CapacityExceeded {
        method: &'static str,
        resource: Resource,
        capacity: usize,
    },

    #[error("{method}: node index {index} out of range - graph order is {order}")]
    NodeIndexOutOfRange {
        method: &'static str,
        index: usize,
        order: usize,
    },

    #[error("{method} [node: {node}]: edge index {index} out of range - node has {len} edge(s)")]
    EdgeIndexOutOfRange {
        method: &'static str,
        node: usize,
        index: usize,
        len: usize,
    },
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Abort on a broken edge cross-reference.
///
/// Only reachable through a bug in this crate; the graph cannot be trusted
/// afterwards, so there is no error variant for it.
#[cold]
#[track_caller]
pub(crate) fn invariant_violation(method: &str, detail: fmt::Arguments<'_>) -> ! {
    panic!("invariant violation in {method}: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_range_message() {
        let err = GraphError::NodeIndexOutOfRange {
            method: "erase_node",
            index: 7,
            order: 3,
        };
        assert_eq!(
            err.to_string(),
            "erase_node: node index 7 out of range - graph order is 3"
        );
    }

    #[test]
    fn test_edge_range_message() {
        let err = GraphError::EdgeIndexOutOfRange {
            method: "erase_edge",
            node: 1,
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "erase_edge [node: 1]: edge index 4 out of range - node has 2 edge(s)"
        );
    }

    #[test]
    fn test_capacity_message() {
        let err = GraphError::CapacityExceeded {
            method: "add_node",
            resource: Resource::Nodes,
            capacity: 3,
        };
        assert_eq!(err.to_string(), "add_node: node capacity of 3 exceeded");
    }

    #[test]
    #[should_panic(expected = "invariant violation in erase_edge")]
    fn test_invariant_violation_panics() {
        invariant_violation("erase_edge", format_args!("partner missing"));
    }
}
