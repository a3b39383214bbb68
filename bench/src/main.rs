use clap::{Parser, ValueEnum};
use graph_store_core::{
    breadth_first_search, priority_search, traverse, Bucketed, Contiguous, Directed,
    DirectedEmbedded, DynamicNodes, EdgeLayout, Flavour, Graph, Independent, OnDiscover,
    Result, StackFrontier, TraversalOptions, Undirected, UndirectedEmbedded,
};
use log::info;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::time::Instant;

/// Topology generators to benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run all generators (default)
    All,
    /// Fractal branching tree (deep paths)
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Two dense cliques connected by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FlavourArg {
    All,
    Directed,
    Undirected,
    DirectedEmbedded,
    UndirectedEmbedded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// One flat edge array; inserting into an early partition shifts the rest
    Contiguous,
    /// One edge vector per node
    Bucketed,
    Both,
}

/// graph-store-bench - time construction, traversal and erasure per layout
#[derive(Parser, Debug)]
#[command(name = "graph-store-bench")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Target node count
    #[arg(short, long, default_value_t = 100_000, value_parser = clap::value_parser!(u64).range(16..))]
    nodes: u64,

    #[arg(short, long, value_enum, default_value = "undirected-embedded")]
    flavour: FlavourArg,

    /// Contiguous storage is quadratic to build; keep --nodes small with it
    #[arg(short, long, value_enum, default_value = "bucketed")]
    layout: LayoutArg,

    /// Nodes erased one at a time after the traversals
    #[arg(long, default_value_t = 100)]
    erase: usize,
}

/// Generated topology, independent of any storage choice.
struct EdgeList {
    nodes: usize,
    /// `(from, to, relation)`
    edges: Vec<(usize, usize, u8)>,
}

type BenchGraph<F, EL> = Graph<F, DynamicNodes<u32>, EL, Independent<u8>>;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("graph-store-bench");
    println!("=================");
    println!();

    let generators: Vec<(&str, fn(u64) -> EdgeList)> = match args.mode {
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("L-system tree", gen_lsystem as fn(u64) -> EdgeList),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    for (name, generator) in generators {
        println!("--- {} ---", name);
        let t = Instant::now();
        let list = generator(args.nodes);
        println!(
            "Generated in {:.2}s: {} nodes, {} edges",
            t.elapsed().as_secs_f64(),
            list.nodes,
            list.edges.len()
        );
        println!();
        println!(
            "{:<50} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "configuration", "build", "bfs", "dfs", "priority", "erase"
        );
        println!(
            "{:-<50} {:->10} {:->10} {:->10} {:->10} {:->10}",
            "", "", "", "", "", ""
        );
        run_flavours(&list, &args)?;
        println!();
    }
    Ok(())
}

fn run_flavours(list: &EdgeList, args: &Args) -> Result<()> {
    let all = args.flavour == FlavourArg::All;
    if all || args.flavour == FlavourArg::Directed {
        run_layouts::<Directed>(list, args)?;
    }
    if all || args.flavour == FlavourArg::Undirected {
        run_layouts::<Undirected>(list, args)?;
    }
    if all || args.flavour == FlavourArg::DirectedEmbedded {
        run_layouts::<DirectedEmbedded>(list, args)?;
    }
    if all || args.flavour == FlavourArg::UndirectedEmbedded {
        run_layouts::<UndirectedEmbedded>(list, args)?;
    }
    Ok(())
}

fn run_layouts<F: Flavour>(list: &EdgeList, args: &Args) -> Result<()> {
    if args.layout != LayoutArg::Bucketed {
        run_benchmark::<F, Contiguous>(list, args.erase)?;
    }
    if args.layout != LayoutArg::Contiguous {
        run_benchmark::<F, Bucketed>(list, args.erase)?;
    }
    Ok(())
}

fn run_benchmark<F: Flavour, EL: EdgeLayout>(list: &EdgeList, erase: usize) -> Result<()> {
    let t = Instant::now();
    let mut graph = build::<F, EL>(list)?;
    let build_time = t.elapsed();

    let t = Instant::now();
    let bfs = breadth_first_search(&graph, 0, &mut ())?;
    let bfs_time = t.elapsed();

    // Full cover so every component is walked once.
    let t = Instant::now();
    let mut last = 0;
    let dfs = traverse(
        &graph,
        StackFrontier::default(),
        TraversalOptions::new(0).covering_all_components(),
        &mut OnDiscover(|node: usize| {
            last = node;
            ControlFlow::Continue(())
        }),
    )?;
    let dfs_time = t.elapsed();

    // Hubs first.
    let t = Instant::now();
    let degree = |node: usize| graph.num_edges(node).unwrap_or(0);
    let best = priority_search(&graph, 0, degree, &mut ())?;
    let priority_time = t.elapsed();

    let t = Instant::now();
    let mut rng = FastRng::new(2024);
    for _ in 0..erase.min(graph.order()) {
        let node = rng.next(graph.order() as u64) as usize;
        graph.erase_node(node)?;
    }
    let erase_time = t.elapsed();

    info!(
        "{}: bfs reached {}, dfs reached {} (last {}), priority reached {}, {} nodes / {} edges after erase",
        graph.configuration(),
        bfs.discovered,
        dfs.discovered,
        last,
        best.discovered,
        graph.order(),
        graph.size()
    );
    println!(
        "{:<50} {:>8.1}ms {:>8.1}ms {:>8.1}ms {:>8.1}ms {:>8.1}ms",
        format!("{} / {}", F::KIND, graph.configuration().edge_storage),
        build_time.as_secs_f64() * 1000.0,
        bfs_time.as_secs_f64() * 1000.0,
        dfs_time.as_secs_f64() * 1000.0,
        priority_time.as_secs_f64() * 1000.0,
        erase_time.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn build<F: Flavour, EL: EdgeLayout>(list: &EdgeList) -> Result<BenchGraph<F, EL>> {
    let mut graph = BenchGraph::<F, EL>::new();
    graph.reserve_nodes(list.nodes);
    for label in 0..list.nodes {
        graph.add_node(label as u32)?;
    }
    let mut degree = vec![0usize; list.nodes];
    for &(from, to, _) in &list.edges {
        degree[from] += 1;
        if F::EMBEDDED || !F::DIRECTED {
            degree[to] += 1;
        }
    }
    for (node, &records) in degree.iter().enumerate() {
        graph.reserve_partition(node, records)?;
    }
    for &(from, to, relation) in &list.edges {
        graph.add_edge(from, to, relation)?;
    }
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    fn relation(&mut self) -> u8 {
        self.next(RELATIONS) as u8
    }
}

/// Distinct edge weights handed out by the generators.
const RELATIONS: u64 = 5;

impl EdgeList {
    fn with_capacity(nodes: u64, edges: u64) -> Self {
        Self {
            nodes: nodes as usize,
            edges: Vec::with_capacity(edges as usize),
        }
    }

    fn push(&mut self, from: u64, to: u64, relation: u8) {
        self.edges.push((from as usize, to as usize, relation));
    }
}

/// L-system fractal tree: each node spawns three children. Deep paths
/// (log depth) with exponential width.
fn gen_lsystem(node_count: u64) -> EdgeList {
    let mut list = EdgeList::with_capacity(node_count, node_count);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                list.push(parent, child, rng.relation());
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    list
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random existing edge and connecting
/// to one of its endpoints. Nodes with more edges are more likely to be picked.
fn gen_scale_free(node_count: u64) -> EdgeList {
    let edges_per_node = 10u64;
    let mut list = EdgeList::with_capacity(node_count, node_count * edges_per_node);
    let mut rng = FastRng::new(12345);

    let mut edge_endpoints: Vec<u64> =
        Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64;
    for i in 0..seed {
        for j in (i + 1)..seed {
            list.push(i, j, rng.relation());
            edge_endpoints.push(i);
            edge_endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            let idx = rng.next(edge_endpoints.len() as u64) as usize;
            let target = edge_endpoints[idx];
            if target != new_node {
                list.push(new_node, target, rng.relation());
                edge_endpoints.push(new_node);
                edge_endpoints.push(target);
            }
        }
    }

    list
}

/// Small-world (Watts-Strogatz): each node linked to its K ring neighbours,
/// each link rewired with probability p.
fn gen_small_world(node_count: u64) -> EdgeList {
    let k = 10u64;
    let p = 0.05f64;
    let mut list = EdgeList::with_capacity(node_count, node_count * k);
    let mut rng = FastRng::new(67890);

    // Forward direction only to avoid double edges.
    for i in 0..node_count {
        for j in 1..=k {
            let neighbour = (i + j) % node_count;
            let relation = rng.relation();
            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    rewired
                } else {
                    neighbour
                }
            } else {
                neighbour
            };
            list.push(i, target, relation);
        }
    }

    list
}

/// Erdos-Renyi: ~10 uniform random edges per node, no structure.
fn gen_random(node_count: u64) -> EdgeList {
    let target_edges = node_count * 10;
    let mut list = EdgeList::with_capacity(node_count, target_edges);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            list.push(from, to, rng.relation());
        }
    }

    list
}

/// Barbell: two dense clusters joined by a chain of ten bridge nodes.
fn gen_barbell(node_count: u64) -> EdgeList {
    let bridge_len = 10u64;
    let clique_size = (node_count - bridge_len) / 2;
    let mut list = EdgeList::with_capacity(
        clique_size * 2 + bridge_len,
        clique_size * 40 + bridge_len + 1,
    );
    let mut rng = FastRng::new(99999);

    for i in 0..clique_size {
        for _ in 0..20u64.min(clique_size - 1) {
            let target = rng.next(clique_size);
            if target != i {
                list.push(i, target, rng.relation());
            }
        }
    }

    // Bridge: chain from last node of A to first node of B
    let bridge_start = clique_size;
    for i in 0..bridge_len {
        let id = bridge_start + i;
        let from = if i == 0 { clique_size - 1 } else { id - 1 };
        list.push(from, id, 0);
    }

    let b_start = bridge_start + bridge_len;
    list.push(b_start - 1, b_start, 0);

    for i in 0..clique_size {
        for _ in 0..20u64.min(clique_size - 1) {
            let target = rng.next(clique_size);
            if target != i {
                list.push(b_start + i, b_start + target, rng.relation());
            }
        }
    }

    list
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Simplified: each new node attaches to a random recent "surface" node,
/// with occasional long-range jumps.
fn gen_dla(node_count: u64) -> EdgeList {
    let mut list = EdgeList::with_capacity(node_count, node_count * 2);
    let mut rng = FastRng::new(77777);

    let surface_max = 10000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        list.push(new_node, attach_to, rng.relation());

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                list.push(new_node, other, rng.relation());
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_stay_in_range() {
        for generator in [
            gen_lsystem as fn(u64) -> EdgeList,
            gen_scale_free,
            gen_small_world,
            gen_random,
            gen_barbell,
            gen_dla,
        ] {
            let list = generator(200);
            assert!(list.nodes <= 200);
            assert!(!list.edges.is_empty());
            assert!(list
                .edges
                .iter()
                .all(|&(a, b, r)| a < list.nodes && b < list.nodes && u64::from(r) < RELATIONS));
        }
    }

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(gen_random(64).edges, gen_random(64).edges);
    }

    #[test]
    fn test_benchmark_runs_every_configuration() {
        let list = gen_barbell(40);
        let args = Args::parse_from([
            "graph-store-bench",
            "barbell",
            "--flavour",
            "all",
            "--layout",
            "both",
            "--nodes",
            "40",
            "--erase",
            "5",
        ]);
        run_flavours(&list, &args).unwrap();
    }

    #[test]
    fn test_layouts_build_equal_graphs() {
        let list = gen_dla(300);
        let contiguous = build::<UndirectedEmbedded, Contiguous>(&list).unwrap();
        let bucketed = build::<UndirectedEmbedded, Bucketed>(&list).unwrap();
        assert!(contiguous == bucketed);
        assert_eq!(bucketed.size(), list.edges.len());
        bucketed.check_invariants();
    }
}
