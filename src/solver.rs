use crate::bucket_elimination::BucketEliminationDecomposer;
use crate::heuristic_elimination_order::{OrderingStrategy, DEFAULT_SEED};
use crate::hypergraph::Hypergraph;
use crate::tree_decomposition::{DecompositionError, TreeDecomposition};
#[cfg(feature = "log")]
use log::info;
use rand::prelude::*;

/// Repeats seeded bucket elimination and keeps the narrowest decomposition.
///
/// The first iteration always runs with the configured seed, so a solver
/// limited to one iteration behaves like a single
/// [`BucketEliminationDecomposer`] call. Later iterations draw fresh seeds
/// from a generator seeded the same way.
pub struct Solver {
    strategy: OrderingStrategy,
    seed: Option<u64>,
    iterations: Option<usize>,
    patience: Option<usize>,
    compress: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            strategy: OrderingStrategy::default(),
            seed: None,
            iterations: Some(1),
            patience: None,
            compress: true,
        }
    }
}

impl Solver {
    impl_setter!(self, strategy, OrderingStrategy);
    impl_setter!(self, seed, Option<u64>);
    impl_setter!(self, iterations, Option<usize>);
    impl_setter!(self, patience, Option<usize>);
    impl_setter!(self, compress, bool);

    pub fn solve(&self, hypergraph: &Hypergraph) -> Result<TreeDecomposition, DecompositionError> {
        self.solve_with_progress(hypergraph, |_, _| {})
    }

    /// Like [`Solver::solve`], calling `on_improvement` with the iteration
    /// number (starting at 1) whenever a narrower decomposition is found.
    pub fn solve_with_progress<F>(
        &self,
        hypergraph: &Hypergraph,
        mut on_improvement: F,
    ) -> Result<TreeDecomposition, DecompositionError>
    where
        F: FnMut(usize, &TreeDecomposition),
    {
        #[cfg(feature = "log")]
        info!(
            "attempting to solve hypergraph with {} vertices and {} hyperedges",
            hypergraph.num_vertices(),
            hypergraph.num_edges()
        );
        let seed = self.seed.unwrap_or(DEFAULT_SEED);
        let mut rng = StdRng::seed_from_u64(seed);
        // every bag containing a hyperedge bounds the width from below
        let lowerbound = hypergraph
            .hyperedges()
            .iter()
            .map(|e| e.len() - 1)
            .max()
            .unwrap_or(0);

        let mut best: Option<TreeDecomposition> = None;
        let mut iteration = 0;
        let mut since_improvement = 0;
        loop {
            let seed = if iteration == 0 { seed } else { rng.gen() };
            let td = BucketEliminationDecomposer::new(self.strategy.algorithm(seed))
                .compress(self.compress)
                .decompose(hypergraph)?;
            iteration += 1;

            let improved = best.as_ref().map_or(true, |b| td.width() < b.width());
            if improved {
                #[cfg(feature = "log")]
                info!("iteration {}: found width {}", iteration, td.width());
                on_improvement(iteration, &td);
                best = Some(td);
                since_improvement = 0;
            } else {
                since_improvement += 1;
            }

            if self.should_stop(iteration, since_improvement) {
                break;
            }
            if best.as_ref().map_or(false, |b| b.width() <= lowerbound) {
                #[cfg(feature = "log")]
                info!("width matches lower bound {}", lowerbound);
                break;
            }
        }
        best.ok_or(DecompositionError::EmptyHypergraph)
    }

    fn should_stop(&self, iteration: usize, since_improvement: usize) -> bool {
        if !self.strategy.is_randomized() {
            return true;
        }
        if let Some(limit) = self.iterations {
            if iteration >= limit {
                return true;
            }
        }
        if let Some(patience) = self.patience {
            if since_improvement >= patience {
                return true;
            }
        }
        interrupted()
    }
}

#[cfg(feature = "handle-ctrlc")]
fn interrupted() -> bool {
    let received = crate::signals::received_ctrl_c();
    if received {
        #[cfg(feature = "log")]
        info!("received ctrl-c, returning best decomposition so far");
    }
    received
}

#[cfg(not(feature = "handle-ctrlc"))]
fn interrupted() -> bool {
    false
}
