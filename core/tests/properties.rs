//! Property tests: random operation sequences against every flavour and
//! layout, checking cross-reference consistency and layout independence.

use std::ops::ControlFlow;

use graph_store_core::{
    breadth_first_search, depth_first_search, sub_graph, traverse, Bucketed, Contiguous,
    Directed, DirectedEmbedded, DynamicNodes, EdgeLayout, EdgeRecord, Flavour, Graph, GraphError,
    Independent, NodeStorage, QueueFrontier, Shared, StackFrontier, StaticBucketed, StaticGraph,
    StaticNodes, TraversalOptions, Undirected, UndirectedEmbedded, Visitor, WeightPolicy,
};
use proptest::{
    collection::vec,
    prelude::{any, prop_assert, prop_assert_eq, prop_oneof, Strategy},
    proptest,
    test_runner::Config as ProptestConfig,
};

const PROP_CASES: u32 = 128;
const MAX_OPS: usize = 40;

#[derive(Debug, Clone)]
enum Op {
    AddNode(u32),
    InsertNode(u8, u32),
    EraseNode(u8),
    SwapNodes(u8, u8),
    AddEdge(u8, u8, i32),
    InsertEdge(u8, u8, u8, u8, i32),
    EraseEdge(u8, u8),
    SwapEdges(u8, u8, u8),
    SetEdgeWeight(u8, u8, i32),
    SortEdges(u8, u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::AddNode),
        1 => (any::<u8>(), any::<u32>()).prop_map(|(p, w)| Op::InsertNode(p, w)),
        1 => any::<u8>().prop_map(Op::EraseNode),
        1 => (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::SwapNodes(a, b)),
        4 => (any::<u8>(), any::<u8>(), -50..50i32).prop_map(|(a, b, w)| Op::AddEdge(a, b, w)),
        2 => (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>(), -50..50i32)
            .prop_map(|(a, i, b, j, w)| Op::InsertEdge(a, i, b, j, w)),
        2 => (any::<u8>(), any::<u8>()).prop_map(|(n, e)| Op::EraseEdge(n, e)),
        1 => (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(n, i, j)| Op::SwapEdges(n, i, j)),
        1 => (any::<u8>(), any::<u8>(), -50..50i32).prop_map(|(n, e, w)| Op::SetEdgeWeight(n, e, w)),
        1 => (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(n, a, b)| Op::SortEdges(n, a, b)),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    vec(op_strategy(), 0..MAX_OPS)
}

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: PROP_CASES,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

type Labelled<F, EL, WP = Independent<i32>> = Graph<F, DynamicNodes<u32>, EL, WP>;

/// Apply `op` with indices folded into range; ops on an empty graph or an
/// edgeless node are no-ops.
fn apply<F, NS, EL, WP>(g: &mut Graph<F, NS, EL, WP>, op: &Op) -> Result<(), GraphError>
where
    F: Flavour,
    NS: NodeStorage<Weight = u32>,
    EL: EdgeLayout,
    WP: WeightPolicy<Weight = i32>,
{
    let order = g.order();
    let pick = |x: u8| usize::from(x) % order.max(1);
    match *op {
        Op::AddNode(w) => g.add_node(w).map(drop),
        Op::InsertNode(p, w) => g.insert_node(usize::from(p) % (order + 1), w).map(drop),
        _ if order == 0 => Ok(()),
        Op::EraseNode(n) => g.erase_node(pick(n)).map(drop),
        Op::SwapNodes(a, b) => g.swap_nodes(pick(a), pick(b)),
        Op::AddEdge(a, b, w) => g.add_edge(pick(a), pick(b), w).map(drop),
        Op::InsertEdge(a, i, b, j, w) => {
            let (from, to) = (pick(a), pick(b));
            let slots_from = g.num_edges(from)? + 1;
            let slots_to = g.num_edges(to)? + 1 + usize::from(from == to);
            let (i, j) = (usize::from(i) % slots_from, usize::from(j) % slots_to);
            g.insert_edge(from, i, to, j, w).map(drop)
        }
        Op::EraseEdge(n, e) => {
            let n = pick(n);
            match g.num_edges(n)? {
                0 => Ok(()),
                d => g.erase_edge(n, usize::from(e) % d),
            }
        }
        Op::SwapEdges(n, i, j) => {
            let n = pick(n);
            match g.num_edges(n)? {
                0 => Ok(()),
                d => g.swap_edges(n, usize::from(i) % d, usize::from(j) % d),
            }
        }
        Op::SetEdgeWeight(n, e, w) => {
            let n = pick(n);
            match g.num_edges(n)? {
                0 => Ok(()),
                d => g.set_edge_weight(n, usize::from(e) % d, w),
            }
        }
        Op::SortEdges(n, a, b) => {
            let n = pick(n);
            let slots = g.num_edges(n)? + 1;
            let (a, b) = (usize::from(a) % slots, usize::from(b) % slots);
            g.sort_edges(n, a.min(b)..a.max(b), |p, q| {
                WP::read(p.weight(), |x| WP::read(q.weight(), |y| x.cmp(y)))
            })
        }
    }
}

fn build<F, EL, WP>(ops: &[Op]) -> Labelled<F, EL, WP>
where
    F: Flavour,
    EL: EdgeLayout,
    WP: WeightPolicy<Weight = i32>,
{
    let mut g = Labelled::<F, EL, WP>::new();
    for label in 0..4 {
        g.add_node(label).unwrap();
    }
    for op in ops {
        apply(&mut g, op).unwrap();
    }
    g
}

fn record_count<F, EL>(g: &Labelled<F, EL>) -> usize
where
    F: Flavour,
    EL: EdgeLayout,
{
    (0..g.order()).map(|n| g.num_edges(n).unwrap()).sum()
}

fn check_consistency<F: Flavour>(ops: &[Op]) {
    let mut g = Labelled::<F, Contiguous, Independent<i32>>::new();
    let mut expected_order = 0;
    for op in ops {
        let order = g.order();
        apply(&mut g, op).unwrap();
        match op {
            Op::AddNode(_) | Op::InsertNode(..) => expected_order += 1,
            Op::EraseNode(_) if order > 0 => expected_order -= 1,
            _ => {}
        }
        g.check_invariants();
        assert_eq!(g.order(), expected_order);
        assert_eq!(g.node_weights().count(), expected_order);
        let records = record_count(&g);
        if F::DIRECTED && !F::EMBEDDED {
            assert_eq!(g.size(), records);
        } else {
            assert_eq!(records % 2, 0);
            assert_eq!(g.size(), records / 2);
        }
    }
}

#[derive(Default)]
struct Counter {
    seen: Vec<usize>,
}

impl Visitor for Counter {
    fn on_discover(&mut self, node: usize) -> ControlFlow<()> {
        self.seen.push(node);
        ControlFlow::Continue(())
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn test_random_ops_keep_cross_references(ops in ops_strategy()) {
        check_consistency::<Directed>(&ops);
        check_consistency::<Undirected>(&ops);
        check_consistency::<DirectedEmbedded>(&ops);
        check_consistency::<UndirectedEmbedded>(&ops);
    }

    #[test]
    fn test_layouts_agree(ops in ops_strategy()) {
        let contiguous = build::<UndirectedEmbedded, Contiguous, Independent<i32>>(&ops);
        let bucketed = build::<UndirectedEmbedded, Bucketed, Independent<i32>>(&ops);
        prop_assert!(contiguous == bucketed);

        let mut fixed: StaticGraph<UndirectedEmbedded, u32, i32, 64, 128, u8> = Graph::new();
        for label in 0..4 {
            fixed.add_node(label).unwrap();
        }
        for op in &ops {
            apply(&mut fixed, op).unwrap();
        }
        prop_assert!(fixed == bucketed);

        let directed_a = build::<DirectedEmbedded, Contiguous, Independent<i32>>(&ops);
        let directed_b = build::<DirectedEmbedded, Bucketed, Independent<i32>>(&ops);
        prop_assert!(directed_a == directed_b);
    }

    #[test]
    fn test_add_then_erase_node_round_trips(ops in ops_strategy(), pos in any::<u8>()) {
        let mut g = build::<Undirected, Bucketed, Independent<i32>>(&ops);
        let before = g.clone();
        let index = g.add_node(99).unwrap();
        prop_assert_eq!(g.erase_node(index).unwrap(), 99);
        prop_assert!(g == before);

        let at = usize::from(pos) % (g.order() + 1);
        g.insert_node(at, 77).unwrap();
        g.check_invariants();
        prop_assert_eq!(g.erase_node(at).unwrap(), 77);
        prop_assert!(g == before);
    }

    #[test]
    fn test_static_capacity_failure_leaves_state(ops in ops_strategy()) {
        let mut g: Graph<DirectedEmbedded, StaticNodes<u32, 5, u8>, StaticBucketed<5, 3, u8>, Independent<i32>> =
            Graph::new();
        for op in &ops {
            let before = g.clone();
            if let Err(err) = apply(&mut g, op) {
                let is_capacity = matches!(err, GraphError::CapacityExceeded { .. });
                prop_assert!(is_capacity, "unexpected error {err}");
                prop_assert!(g == before);
            }
            g.check_invariants();
            prop_assert!(g.order() <= 5);
        }
    }

    #[test]
    fn test_sub_graph_compacts(ops in ops_strategy()) {
        let g = build::<UndirectedEmbedded, Contiguous, Independent<i32>>(&ops);
        let sub = sub_graph(&g, |label| label % 2 == 0);
        let kept: Vec<u32> = g.node_weights().copied().filter(|l| l % 2 == 0).collect();
        prop_assert_eq!(sub.node_weights().copied().collect::<Vec<_>>(), kept);
        sub.check_invariants();
        prop_assert!(sub.size() <= g.size());
    }

    #[test]
    fn test_shared_weights_visible_through_clone(ops in ops_strategy(), w in any::<i32>()) {
        let mut shared = build::<Undirected, Bucketed, Shared<i32>>(&ops);
        let mut independent = build::<Undirected, Bucketed, Independent<i32>>(&ops);
        let Some(node) = (0..shared.order()).find(|&n| shared.num_edges(n).unwrap() > 0) else {
            return Ok(());
        };

        let original = shared.edge_weight(node, 0, |x| *x).unwrap();
        let alias = shared.clone();
        let detached = shared.deep_clone();
        shared.set_edge_weight(node, 0, w).unwrap();
        prop_assert_eq!(alias.edge_weight(node, 0, |x| *x).unwrap(), w);
        prop_assert_eq!(detached.edge_weight(node, 0, |x| *x).unwrap(), original);
        detached.check_invariants();

        let copy = independent.clone();
        let old = copy.edge_weight(node, 0, |x| *x).unwrap();
        independent.set_edge_weight(node, 0, w.wrapping_add(1)).unwrap();
        prop_assert_eq!(copy.edge_weight(node, 0, |x| *x).unwrap(), old);
        independent.check_invariants();
    }

    #[test]
    fn test_full_cover_discovers_each_node_once(ops in ops_strategy()) {
        let g = build::<Directed, Contiguous, Independent<i32>>(&ops);
        if g.is_empty() {
            let options = TraversalOptions::new(0).covering_all_components();
            let outcome = traverse(&g, QueueFrontier::default(), options, &mut Counter::default());
            let rejected = matches!(
                outcome,
                Err(GraphError::NodeIndexOutOfRange { index: 0, order: 0, .. })
            );
            prop_assert!(rejected);
            return Ok(());
        }
        for stack in [false, true] {
            let mut counter = Counter::default();
            let options = TraversalOptions::new(0).covering_all_components();
            let outcome = if stack {
                traverse(&g, StackFrontier::default(), options, &mut counter)
            } else {
                traverse(&g, QueueFrontier::default(), options, &mut counter)
            }
            .unwrap();
            prop_assert_eq!(outcome.discovered, g.order());
            let mut seen = counter.seen.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..g.order()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_single_root_search_agrees_on_reach(ops in ops_strategy()) {
        let g = build::<UndirectedEmbedded, Bucketed, Independent<i32>>(&ops);
        if g.is_empty() {
            return Ok(());
        }
        let mut bfs = Counter::default();
        let mut dfs = Counter::default();
        breadth_first_search(&g, 0, &mut bfs).unwrap();
        depth_first_search(&g, 0, &mut dfs).unwrap();
        prop_assert_eq!(bfs.seen.first(), Some(&0));
        prop_assert_eq!(dfs.seen.first(), Some(&0));
        bfs.seen.sort_unstable();
        dfs.seen.sort_unstable();
        prop_assert_eq!(bfs.seen, dfs.seen);
    }
}
