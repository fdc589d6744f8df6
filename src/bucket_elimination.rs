use crate::graph::MutableGraph;
use crate::heuristic_elimination_order::{MinFillOrdering, OrderingAlgorithm, VertexOrdering};
use crate::hypergraph::Hypergraph;
use crate::tree_decomposition::{DecompositionError, TreeDecomposition};
use fxhash::FxHashSet;
#[cfg(feature = "log")]
use log::{debug, info};

/// Builds tree decompositions by bucket elimination along an ordering
/// produced by `O`.
pub struct BucketEliminationDecomposer<O: OrderingAlgorithm> {
    ordering_algorithm: O,
    compress: bool,
}

impl Default for BucketEliminationDecomposer<MinFillOrdering> {
    fn default() -> Self {
        Self::new(MinFillOrdering::default())
    }
}

impl<O: OrderingAlgorithm> BucketEliminationDecomposer<O> {
    pub fn new(ordering_algorithm: O) -> Self {
        Self {
            ordering_algorithm,
            compress: true,
        }
    }

    impl_setter!(self, compress, bool);

    pub fn ordering_algorithm(&self) -> &O {
        &self.ordering_algorithm
    }

    pub fn decompose(&self, hypergraph: &Hypergraph) -> Result<TreeDecomposition, DecompositionError> {
        if hypergraph.num_vertices() == 0 {
            return Err(DecompositionError::EmptyHypergraph);
        }
        let ordering = self.ordering_algorithm.compute_ordering(hypergraph);
        self.decompose_with_ordering(hypergraph, &ordering)
    }

    pub fn decompose_with_ordering(
        &self,
        hypergraph: &Hypergraph,
        ordering: &VertexOrdering,
    ) -> Result<TreeDecomposition, DecompositionError> {
        if hypergraph.num_vertices() == 0 {
            return Err(DecompositionError::EmptyHypergraph);
        }
        if !ordering.is_permutation_of(hypergraph) {
            return Err(DecompositionError::InvalidOrdering {
                expected: hypergraph.num_vertices(),
                found: ordering.len(),
            });
        }

        let n = ordering.len();
        let mut graph = hypergraph.primal_graph();
        let mut buckets: Vec<FxHashSet<usize>> = Vec::with_capacity(n);
        let mut parents: Vec<Option<usize>> = Vec::with_capacity(n);

        for v in ordering.order().iter().copied() {
            let mut bucket = graph.neighborhood_set(v).clone();
            parents.push(bucket.iter().filter_map(|u| ordering.position(*u)).min());
            bucket.insert(v);
            buckets.push(bucket);
            graph.eliminate_vertex(v);
        }

        // one parentless bucket per component; all but the last hang off the root
        let root = n - 1;
        let mut children: Vec<Vec<usize>> = vec![vec![]; n];
        for (i, parent) in parents.iter().enumerate().take(root) {
            children[parent.unwrap_or(root)].push(i);
        }

        let mut td = TreeDecomposition::default();
        let root_node = td.add_bag(std::mem::take(&mut buckets[root]));
        let mut stack = vec![(root, root_node)];
        while let Some((bucket, node)) = stack.pop() {
            for child in children[bucket].iter().copied() {
                let child_node = td.add_child(node, std::mem::take(&mut buckets[child]));
                stack.push((child, child_node));
            }
        }
        #[cfg(feature = "log")]
        debug!(
            "bucket elimination produced {} nodes of width {}",
            td.node_count(),
            td.width()
        );

        if self.compress {
            td.flatten();
            #[cfg(feature = "log")]
            debug!("compressed decomposition to {} nodes", td.node_count());
        }
        #[cfg(feature = "log")]
        info!(
            "decomposed hypergraph with {} vertices: width {}",
            hypergraph.num_vertices(),
            td.width()
        );
        Ok(td)
    }
}
