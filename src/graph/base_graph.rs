use std::fmt::Debug;

pub trait BaseGraph: Clone + Debug {
    fn degree(&self, u: usize) -> usize;
    fn order(&self) -> usize;
    fn is_clique(&self, vertices: &[usize]) -> bool;
    fn has_vertex(&self, u: usize) -> bool;
    fn has_edge(&self, u: usize, v: usize) -> bool;
    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_>;
    /// Number of missing edges among the neighbors of `u`, i.e. the fill
    /// introduced by eliminating `u`.
    fn fill_in_count(&self, u: usize) -> usize;
}
