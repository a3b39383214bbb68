//! Induced sub-graph extraction.

use log::debug;

use crate::edges::EdgeLayout;
use crate::graph::Graph;
use crate::nodes::NodeStorage;
use crate::record::Flavour;
use crate::weight::WeightPolicy;

impl<F, NS, EL, WP> Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    /// Keep the nodes whose weight satisfies `keep`, with the edges between
    /// them. Kept nodes retain their relative order and are renumbered
    /// densely from 0. Shared weights stay shared with `self`, as with
    /// `Clone`.
    pub fn sub_graph(&self, mut keep: impl FnMut(&NS::Weight) -> bool) -> Self {
        let doomed: Vec<usize> = self
            .node_weights()
            .enumerate()
            .filter_map(|(i, w)| (!keep(w)).then_some(i))
            .collect();

        let mut sub = self.clone();
        // Highest first, so pending indices are unaffected by the shifts.
        for &node in doomed.iter().rev() {
            sub.erase_node_unchecked("sub_graph", node);
        }
        debug!(
            "sub_graph: kept {} of {} node(s), {} of {} edge(s)",
            sub.order(),
            self.order(),
            sub.size(),
            self.size()
        );
        sub
    }
}

/// Free-function form of [`Graph::sub_graph`].
pub fn sub_graph<F, NS, EL, WP>(
    graph: &Graph<F, NS, EL, WP>,
    keep: impl FnMut(&NS::Weight) -> bool,
) -> Graph<F, NS, EL, WP>
where
    F: Flavour,
    NS: NodeStorage,
    EL: EdgeLayout,
    WP: WeightPolicy,
{
    graph.sub_graph(keep)
}
