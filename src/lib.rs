#[macro_use]
mod util;

pub(crate) mod datastructures;

pub mod bucket_elimination;
pub mod graph;
pub mod heuristic_elimination_order;
pub mod hypergraph;
pub mod io;
#[cfg(feature = "pace-logging")]
pub mod logging;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;
pub mod solver;
pub mod tree_decomposition;

pub use bucket_elimination::BucketEliminationDecomposer;
pub use heuristic_elimination_order::{
    MaximumCardinalityOrdering, MinDegreeOrdering, MinFillDegreeOrdering, MinFillOrdering,
    NaturalOrdering, OrderingAlgorithm, OrderingStrategy, VertexOrdering,
};
pub use hypergraph::{Hyperedge, Hypergraph, HypergraphError};
pub use solver::Solver;
pub use tree_decomposition::{
    DecompositionError, TreeDecomposition, TreeDecompositionValidationError,
};
