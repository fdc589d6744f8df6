use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use crate::hypergraph::Hypergraph;
use fxhash::FxHashMap;
#[cfg(feature = "log")]
use log::debug;
use rand::prelude::*;
use std::cmp::max;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Seed used for tie-breaking when none is configured.
pub const DEFAULT_SEED: u64 = 1337 * 42 * 777;

/// A permutation of a hypergraph's vertices; position 0 is eliminated first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexOrdering {
    data: Vec<usize>,
    positions: FxHashMap<usize, usize>,
}

impl VertexOrdering {
    pub fn new(data: Vec<usize>) -> Self {
        let positions = data.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        Self { data, positions }
    }

    pub fn order(&self) -> &[usize] {
        self.data.as_slice()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self, v: usize) -> Option<usize> {
        self.positions.get(&v).copied()
    }

    pub fn is_permutation_of(&self, hypergraph: &Hypergraph) -> bool {
        self.data.len() == hypergraph.num_vertices()
            && self.positions.len() == self.data.len()
            && self.data.iter().all(|v| hypergraph.is_vertex(*v))
    }

    /// Largest number of higher neighbors any vertex has when eliminated in
    /// this order, which equals the width of the bucket decomposition
    /// built from it.
    pub fn width(&self, hypergraph: &Hypergraph) -> usize {
        let mut graph = hypergraph.primal_graph();
        let mut width = 0;
        for v in self.data.iter().copied() {
            if graph.has_vertex(v) {
                width = max(width, graph.degree(v));
                graph.eliminate_vertex(v);
            }
        }
        width
    }
}

pub trait OrderingAlgorithm {
    fn compute_ordering(&self, hypergraph: &Hypergraph) -> VertexOrdering;
}

impl OrderingAlgorithm for Box<dyn OrderingAlgorithm> {
    fn compute_ordering(&self, hypergraph: &Hypergraph) -> VertexOrdering {
        (**self).compute_ordering(hypergraph)
    }
}

/// Scores vertices of a working graph; the vertex with the lowest value is
/// eliminated next.
pub trait Selector: From<HashMapGraph> {
    fn graph(&self) -> &HashMapGraph;
    fn value(&self, v: usize) -> i64;
    fn eliminate_vertex(&mut self, v: usize);
}

pub struct MinFillDegreeSelector {
    inner: MinFillSelector,
}

impl From<HashMapGraph> for MinFillDegreeSelector {
    fn from(graph: HashMapGraph) -> Self {
        Self {
            inner: MinFillSelector::from(graph),
        }
    }
}

impl Selector for MinFillDegreeSelector {
    fn graph(&self) -> &HashMapGraph {
        self.inner.graph()
    }

    fn value(&self, v: usize) -> i64 {
        (self.inner.value(v) << 32) + (self.inner.graph.degree(v) as i64)
    }

    fn eliminate_vertex(&mut self, v: usize) {
        self.inner.eliminate_vertex(v);
    }
}

pub struct MinDegreeSelector {
    graph: HashMapGraph,
}

impl From<HashMapGraph> for MinDegreeSelector {
    fn from(graph: HashMapGraph) -> Self {
        Self { graph }
    }
}

impl Selector for MinDegreeSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.graph.degree(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        self.graph.eliminate_vertex(v);
    }
}

/// Min-fill scoring with an incrementally maintained cache: `cache[u]` is
/// the number of edges present among the neighbors of `u`.
pub struct MinFillSelector {
    graph: HashMapGraph,
    cache: FxHashMap<usize, usize>,
}

impl From<HashMapGraph> for MinFillSelector {
    fn from(graph: HashMapGraph) -> Self {
        let mut cache = FxHashMap::with_capacity_and_hasher(graph.order(), Default::default());
        for u in graph.vertices() {
            cache.insert(u, 0);
        }
        for u in graph.vertices() {
            for v in graph.neighborhood(u).filter(|v| u < *v) {
                graph
                    .neighborhood_set(u)
                    .iter()
                    .copied()
                    .filter(|x| v < *x && graph.has_edge(*x, v))
                    .for_each(|x| {
                        *cache.get_mut(&x).unwrap() += 1;
                        *cache.get_mut(&u).unwrap() += 1;
                        *cache.get_mut(&v).unwrap() += 1;
                    })
            }
        }
        Self { graph, cache }
    }
}

impl Selector for MinFillSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.fill_in_count(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        if self.fill_in_count(v) == 0 {
            self.eliminate_fill0(v);
        } else {
            let mut to_add: Vec<(usize, usize)> = vec![];
            for u in self.graph.neighborhood_set(v) {
                for w in self
                    .graph
                    .neighborhood_set(v)
                    .iter()
                    .filter(|w| u < *w && !self.graph.has_edge(*u, **w))
                {
                    to_add.push((*u, *w));
                }
            }
            for (u, w) in to_add {
                self.add_edge(u, w);
            }
            self.remove_vertex(v);
        }
    }
}

impl MinFillSelector {
    fn add_edge(&mut self, u: usize, v: usize) {
        self.graph.add_edge(u, v);
        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                *self.cache.get_mut(x).unwrap() += 1;
                *self.cache.get_mut(&u).unwrap() += 1;
                *self.cache.get_mut(&v).unwrap() += 1;
            }
        }
    }

    fn remove_vertex(&mut self, u: usize) {
        for v in self.graph.neighborhood_set(u).clone() {
            self.remove_edge(u, v);
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        self.graph.remove_edge(u, v);

        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                *self.cache.get_mut(x).unwrap() -= 1;
                *self.cache.get_mut(&u).unwrap() -= 1;
                *self.cache.get_mut(&v).unwrap() -= 1;
            }
        }
    }

    // neighborhood is already a clique, so each neighbor just loses the
    // triangles through `u`
    fn eliminate_fill0(&mut self, u: usize) {
        if self.graph.degree(u) > 1 {
            let delta = self.graph.degree(u) - 1;
            let graph = &self.graph;
            let cache = &mut self.cache;
            graph.neighborhood_set(u).iter().copied().for_each(|v| {
                *cache.get_mut(&v).unwrap() -= delta;
            });
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let deg = self.graph.degree(u);
        (deg * deg - deg) / 2 - self.cache.get(&u).unwrap()
    }
}

/// Vertices of minimum value, ascending.
fn minimum_pool<S: Selector>(selector: &S) -> Vec<usize> {
    let mut pool = Vec::new();
    let mut minimum = i64::MAX;
    for v in selector.graph().vertices() {
        let value = selector.value(v);
        if value < minimum {
            minimum = value;
            pool.clear();
        }
        if value == minimum {
            pool.push(v);
        }
    }
    pool.sort_unstable();
    pool
}

/// Greedy elimination ordering driven by a [`Selector`].
///
/// Ties among equally scored vertices are broken by a `StdRng` seeded from
/// `seed`, so the same seed and hypergraph always give the same ordering.
pub struct HeuristicOrdering<S: Selector> {
    seed: u64,
    _selector: PhantomData<S>,
}

pub type MinFillOrdering = HeuristicOrdering<MinFillSelector>;
pub type MinDegreeOrdering = HeuristicOrdering<MinDegreeSelector>;
pub type MinFillDegreeOrdering = HeuristicOrdering<MinFillDegreeSelector>;

impl<S: Selector> Default for HeuristicOrdering<S> {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            _selector: PhantomData,
        }
    }
}

impl<S: Selector> HeuristicOrdering<S> {
    pub fn new() -> Self {
        Self::default()
    }

    impl_setter!(self, seed, u64);
}

impl<S: Selector> OrderingAlgorithm for HeuristicOrdering<S> {
    fn compute_ordering(&self, hypergraph: &Hypergraph) -> VertexOrdering {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut selector = S::from(hypergraph.primal_graph());
        let mut order = Vec::with_capacity(hypergraph.num_vertices());

        while selector.graph().order() > 0 {
            let pool = minimum_pool(&selector);
            let u = pool[rng.gen_range(0..pool.len())];
            order.push(u);
            selector.eliminate_vertex(u);
        }
        #[cfg(feature = "log")]
        debug!("computed elimination ordering of {} vertices", order.len());
        VertexOrdering::new(order)
    }
}

/// Maximum cardinality search: repeatedly visits the vertex with the most
/// already visited neighbors and eliminates in reverse visiting order.
/// Perfect elimination orderings are found for chordal inputs.
pub struct MaximumCardinalityOrdering {
    seed: u64,
}

impl Default for MaximumCardinalityOrdering {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl MaximumCardinalityOrdering {
    pub fn new() -> Self {
        Self::default()
    }

    impl_setter!(self, seed, u64);
}

impl OrderingAlgorithm for MaximumCardinalityOrdering {
    fn compute_ordering(&self, hypergraph: &Hypergraph) -> VertexOrdering {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let graph = hypergraph.primal_graph();
        let mut weights: FxHashMap<usize, usize> = hypergraph.vertices().map(|v| (v, 0)).collect();
        let mut visited = Vec::with_capacity(weights.len());

        while !weights.is_empty() {
            let maximum = weights.values().copied().max().unwrap_or(0);
            let mut pool: Vec<usize> = weights
                .iter()
                .filter(|(_, w)| **w == maximum)
                .map(|(v, _)| *v)
                .collect();
            pool.sort_unstable();
            let u = pool[rng.gen_range(0..pool.len())];
            weights.remove(&u);
            for v in graph.neighborhood(u) {
                if let Some(w) = weights.get_mut(&v) {
                    *w += 1;
                }
            }
            visited.push(u);
        }
        visited.reverse();
        VertexOrdering::new(visited)
    }
}

/// Eliminates vertices by ascending id.
#[derive(Default)]
pub struct NaturalOrdering;

impl OrderingAlgorithm for NaturalOrdering {
    fn compute_ordering(&self, hypergraph: &Hypergraph) -> VertexOrdering {
        VertexOrdering::new(hypergraph.vertices().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    MinFill,
    MinDegree,
    MinFillDegree,
    MaxCardinality,
    Natural,
}

impl Default for OrderingStrategy {
    fn default() -> Self {
        Self::MinFill
    }
}

impl OrderingStrategy {
    pub const VARIANTS: &'static [&'static str] = &[
        "min-fill",
        "min-degree",
        "min-fill-degree",
        "max-cardinality",
        "natural",
    ];

    /// Whether the seed influences the computed ordering.
    pub fn is_randomized(&self) -> bool {
        *self != OrderingStrategy::Natural
    }

    pub fn algorithm(&self, seed: u64) -> Box<dyn OrderingAlgorithm> {
        match self {
            OrderingStrategy::MinFill => Box::new(MinFillOrdering::new().seed(seed)),
            OrderingStrategy::MinDegree => Box::new(MinDegreeOrdering::new().seed(seed)),
            OrderingStrategy::MinFillDegree => Box::new(MinFillDegreeOrdering::new().seed(seed)),
            OrderingStrategy::MaxCardinality => {
                Box::new(MaximumCardinalityOrdering::new().seed(seed))
            }
            OrderingStrategy::Natural => Box::new(NaturalOrdering),
        }
    }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderingStrategy::MinFill => "min-fill",
            OrderingStrategy::MinDegree => "min-degree",
            OrderingStrategy::MinFillDegree => "min-fill-degree",
            OrderingStrategy::MaxCardinality => "max-cardinality",
            OrderingStrategy::Natural => "natural",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OrderingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-fill" => Ok(OrderingStrategy::MinFill),
            "min-degree" => Ok(OrderingStrategy::MinDegree),
            "min-fill-degree" => Ok(OrderingStrategy::MinFillDegree),
            "max-cardinality" => Ok(OrderingStrategy::MaxCardinality),
            "natural" => Ok(OrderingStrategy::Natural),
            _ => Err(format!("unknown ordering strategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{BaseGraph, MutableGraph};
    use crate::heuristic_elimination_order::{
        MaximumCardinalityOrdering, MinDegreeOrdering, MinFillOrdering, MinFillSelector,
        NaturalOrdering, OrderingAlgorithm, OrderingStrategy, Selector, VertexOrdering,
    };
    use crate::hypergraph::Hypergraph;
    use fxhash::FxHashMap;

    fn grid(rows: usize, columns: usize) -> Hypergraph {
        let mut graph = Hypergraph::new(rows * columns);
        for r in 0..rows {
            for c in 0..columns {
                let v = r * columns + c + 1;
                if c + 1 < columns {
                    graph.add_edge(&[v, v + 1]).unwrap();
                }
                if r + 1 < rows {
                    graph.add_edge(&[v, v + columns]).unwrap();
                }
            }
        }
        graph
    }

    #[test]
    fn initial_cache_matches_fill_in() {
        let graph = grid(4, 4).primal_graph();
        let selector = MinFillSelector::from(graph.clone());

        for v in graph.vertices() {
            assert_eq!(graph.fill_in_count(v) as i64, selector.value(v));
        }
    }

    #[test]
    fn eliminate() {
        let mut graph = grid(4, 5).primal_graph();
        graph.add_edge(1, 7);
        graph.add_edge(3, 14);
        let mut selector = MinFillSelector::from(graph.clone());

        let mut vertices: Vec<_> = graph.vertices().collect();
        vertices.sort_unstable();

        while let Some(v) = vertices.pop() {
            graph.eliminate_vertex(v);
            selector.eliminate_vertex(v);

            let mut a: Vec<_> = selector.graph.vertices().collect();
            a.sort_unstable();
            let mut b: Vec<_> = graph.vertices().collect();
            b.sort_unstable();
            assert_eq!(a, b);

            let fc1: FxHashMap<_, _> = vertices
                .iter()
                .map(|v| (*v, graph.fill_in_count(*v) as i64))
                .collect();
            let fc2: FxHashMap<_, _> = vertices.iter().map(|v| (*v, selector.value(*v))).collect();
            assert_eq!(fc1, fc2);
        }
    }

    #[test]
    fn orderings_are_permutations() {
        let mut graph = grid(3, 3);
        graph.add_vertex();
        for strategy in [
            OrderingStrategy::MinFill,
            OrderingStrategy::MinDegree,
            OrderingStrategy::MinFillDegree,
            OrderingStrategy::MaxCardinality,
            OrderingStrategy::Natural,
        ]
        .iter()
        {
            let ordering = strategy.algorithm(7).compute_ordering(&graph);
            assert!(ordering.is_permutation_of(&graph), "{}", strategy);
        }
    }

    #[test]
    fn min_fill_prefers_simplicial_vertices() {
        // triangle 1-2-3 with pendant 4 on 3 and a 4-cycle 3-5-6-7
        let mut graph = Hypergraph::new(7);
        graph.add_edge(&[1, 2, 3]).unwrap();
        graph.add_edge(&[3, 4]).unwrap();
        graph.add_edge(&[3, 5]).unwrap();
        graph.add_edge(&[5, 6]).unwrap();
        graph.add_edge(&[6, 7]).unwrap();
        graph.add_edge(&[7, 3]).unwrap();

        let ordering = MinFillOrdering::new().compute_ordering(&graph);
        let first = ordering.order()[0];
        assert!([1, 2, 4].contains(&first));
        assert_eq!(ordering.width(&graph), 2);
    }

    #[test]
    fn same_seed_same_ordering() {
        let graph = grid(5, 5);
        let a = MinDegreeOrdering::new().seed(42).compute_ordering(&graph);
        let b = MinDegreeOrdering::new().seed(42).compute_ordering(&graph);
        assert_eq!(a, b);

        let a = MinFillOrdering::new().seed(3).compute_ordering(&graph);
        let b = MinFillOrdering::new().seed(3).compute_ordering(&graph);
        assert_eq!(a.order(), b.order());
    }

    #[test]
    fn max_cardinality_on_chordal_graph() {
        // two triangles sharing the edge 2-3
        let mut graph = Hypergraph::new(4);
        graph.add_edge(&[1, 2, 3]).unwrap();
        graph.add_edge(&[2, 3, 4]).unwrap();

        let ordering = MaximumCardinalityOrdering::new().compute_ordering(&graph);
        assert_eq!(ordering.width(&graph), 2);
    }

    #[test]
    fn natural_ordering() {
        let graph = Hypergraph::with_offset(4, 10);
        let ordering = NaturalOrdering.compute_ordering(&graph);
        assert_eq!(ordering.order(), &[10, 11, 12, 13]);
        assert_eq!(ordering.position(12), Some(2));
        assert_eq!(ordering.position(1), None);
    }

    #[test]
    fn width_of_path_ordering() {
        let mut graph = Hypergraph::new(4);
        graph.add_edge(&[1, 2]).unwrap();
        graph.add_edge(&[2, 3]).unwrap();
        graph.add_edge(&[3, 4]).unwrap();

        assert_eq!(VertexOrdering::new(vec![1, 2, 3, 4]).width(&graph), 1);
        assert_eq!(VertexOrdering::new(vec![2, 3, 1, 4]).width(&graph), 2);
    }

    #[test]
    fn width_ignores_repeated_and_isolated_vertices() {
        let mut graph = Hypergraph::new(4);
        graph.add_edge(&[1, 2, 3]).unwrap();

        assert_eq!(VertexOrdering::new(vec![1, 1, 2, 3, 4]).width(&graph), 2);
        assert_eq!(VertexOrdering::new(vec![4]).width(&graph), 0);
        assert_eq!(VertexOrdering::new(vec![]).width(&graph), 0);
    }

    #[test]
    fn not_a_permutation() {
        let graph = Hypergraph::new(3);
        assert!(!VertexOrdering::new(vec![1, 2]).is_permutation_of(&graph));
        assert!(!VertexOrdering::new(vec![1, 2, 2]).is_permutation_of(&graph));
        assert!(!VertexOrdering::new(vec![1, 2, 4]).is_permutation_of(&graph));
        assert!(VertexOrdering::new(vec![3, 1, 2]).is_permutation_of(&graph));
    }

    #[test]
    fn strategy_names_round_trip() {
        for name in OrderingStrategy::VARIANTS {
            let strategy: OrderingStrategy = name.parse().unwrap();
            assert_eq!(strategy.to_string(), *name);
        }
        assert!("quickbb".parse::<OrderingStrategy>().is_err());
    }
}
