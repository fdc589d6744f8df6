use crate::datastructures::BitSet;
use crate::hypergraph::Hypergraph;
use fxhash::FxHashSet;
use std::cmp::max;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeDecompositionValidationError {
    #[error("Has Cycle")]
    HasCycle,
    #[error("Not Connected")]
    NotConnected,
    #[error("Empty Bag: {0}")]
    EmptyBag(usize),
    #[error("Missing Vertex: {0}")]
    MissingVertex(usize),
    #[error("Missing Hyperedge: {0}")]
    MissingHyperedge(usize),
    #[error("Not Inducing Subtree: {0}")]
    NotInducingSubtree(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompositionError {
    #[error("cannot decompose a hypergraph without vertices")]
    EmptyHypergraph,
    #[error("ordering of {found} entries is not a permutation of {expected} vertices")]
    InvalidOrdering { expected: usize, found: usize },
    #[error("unknown decomposition node: {0}")]
    UnknownNode(usize),
}

#[derive(Debug, Default, Clone)]
pub struct Bag {
    id: usize,
    vertex_set: FxHashSet<usize>,
    neighbors: FxHashSet<usize>,
    parent: Option<usize>,
}

impl Bag {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn vertex_set(&self) -> &FxHashSet<usize> {
        &self.vertex_set
    }

    /// Adjacent nodes, parent included.
    pub fn neighbors(&self) -> &FxHashSet<usize> {
        &self.neighbors
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.vertex_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_set.is_empty()
    }

    /// Bag vertices in ascending order.
    pub fn sorted_vertices(&self) -> Vec<usize> {
        let mut vertices: Vec<_> = self.vertex_set.iter().copied().collect();
        vertices.sort_unstable();
        vertices
    }
}

/// A rooted tree of bags. Node ids are dense, `0..node_count()`.
#[derive(Debug, Clone, Default)]
pub struct TreeDecomposition {
    bags: Vec<Bag>,
    root: Option<usize>,
    max_bag_size: usize,
}

impl TreeDecomposition {
    pub(crate) fn add_bag(&mut self, vertex_set: FxHashSet<usize>) -> usize {
        let id = self.bags.len();
        if id == 0 {
            self.root = Some(id);
        }
        self.max_bag_size = max(self.max_bag_size, vertex_set.len());
        self.bags.push(Bag {
            id,
            vertex_set,
            neighbors: FxHashSet::default(),
            parent: None,
        });
        id
    }

    pub(crate) fn add_child(&mut self, parent: usize, vertex_set: FxHashSet<usize>) -> usize {
        let id = self.add_bag(vertex_set);
        self.add_edge(parent, id);
        self.bags[id].parent = Some(parent);
        id
    }

    pub(crate) fn add_edge(&mut self, b1: usize, b2: usize) {
        debug_assert!(b1 < self.bags.len());
        debug_assert!(b2 < self.bags.len());
        debug_assert_ne!(b1, b2);
        self.bags[b1].neighbors.insert(b2);
        self.bags[b2].neighbors.insert(b1);
    }

    /// Merges every node whose bag is a subset of an adjacent bag into that
    /// neighbor. Node ids are compacted afterwards and parents re-derived
    /// from the root.
    pub(crate) fn flatten(&mut self) {
        while let Some((kept, merged)) = self.find_combinable() {
            self.reroute(merged, kept);
            if self.root == Some(merged) {
                self.root = Some(kept);
            }
            self.remove_bag(merged);
        }
        self.orient();
    }

    fn find_combinable(&self) -> Option<(usize, usize)> {
        for b in &self.bags {
            if let Some(n) = b
                .neighbors
                .iter()
                .copied()
                .filter(|n| self.bags[*n].vertex_set.is_subset(&b.vertex_set))
                .min()
            {
                return Some((b.id, n));
            }
        }
        None
    }

    fn reroute(&mut self, old_bag: usize, kept: usize) {
        let old_neighbors = std::mem::take(&mut self.bags[old_bag].neighbors);

        self.bags[kept].neighbors.extend(old_neighbors.iter());
        self.bags[kept].neighbors.remove(&kept);
        self.bags[kept].neighbors.remove(&old_bag);

        for neighbor in old_neighbors {
            if neighbor == kept {
                continue;
            }
            let neighbors = &mut self.bags[neighbor].neighbors;
            neighbors.remove(&old_bag);
            neighbors.insert(kept);
        }
    }

    fn remove_bag(&mut self, id: usize) {
        debug_assert!(self.bags[id].neighbors.is_empty());
        let old_last = self.bags.len() - 1;
        self.bags.swap_remove(id);
        if id == old_last {
            return;
        }
        self.bags[id].id = id;
        if self.root == Some(old_last) {
            self.root = Some(id);
        }
        for neighbor in self.bags[id].neighbors.clone() {
            let neighbors = &mut self.bags[neighbor].neighbors;
            neighbors.remove(&old_last);
            neighbors.insert(id);
        }
    }

    fn orient(&mut self) {
        let root = match self.root {
            Some(root) => root,
            None => return,
        };
        let mut visited = BitSet::new(self.bags.len());
        visited.set_bit(root);
        self.bags[root].parent = None;
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let neighbors: Vec<_> = self.bags[current].neighbors.iter().copied().collect();
            for n in neighbors {
                if !visited.set_bit(n) {
                    self.bags[n].parent = Some(current);
                    stack.push(n);
                }
            }
        }
    }

    /// Node ids in ascending order.
    pub fn vertices(&self) -> Vec<usize> {
        (0..self.bags.len()).collect()
    }

    pub fn bag(&self, node: usize) -> Option<&Bag> {
        self.bags.get(node)
    }

    pub fn bag_content(&self, node: usize) -> Result<Vec<usize>, DecompositionError> {
        self.bags
            .get(node)
            .map(Bag::sorted_vertices)
            .ok_or(DecompositionError::UnknownNode(node))
    }

    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    pub fn width(&self) -> usize {
        self.max_bag_size.saturating_sub(1)
    }

    pub fn max_bag_size(&self) -> usize {
        self.max_bag_size
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.bags.len()
    }

    pub fn edge_count(&self) -> usize {
        self.bags.iter().map(|b| b.neighbors.len()).sum::<usize>() / 2
    }

    pub fn neighbors(&self, node: usize) -> Result<Vec<usize>, DecompositionError> {
        let bag = self
            .bags
            .get(node)
            .ok_or(DecompositionError::UnknownNode(node))?;
        let mut neighbors: Vec<_> = bag.neighbors.iter().copied().collect();
        neighbors.sort_unstable();
        Ok(neighbors)
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.bags.get(node).and_then(|b| b.parent)
    }

    /// Children of `node` in ascending order; empty for unknown nodes.
    pub fn children(&self, node: usize) -> Vec<usize> {
        match self.bags.get(node) {
            Some(bag) => {
                let mut children: Vec<_> = bag
                    .neighbors
                    .iter()
                    .copied()
                    .filter(|n| self.bags[*n].parent == Some(node))
                    .collect();
                children.sort_unstable();
                children
            }
            None => vec![],
        }
    }

    /// `(parent, child)` pairs, ordered by child id.
    pub fn tree_edges(&self) -> Vec<(usize, usize)> {
        self.bags
            .iter()
            .filter_map(|b| b.parent.map(|p| (p, b.id)))
            .collect()
    }

    /// Pre-order traversal from the root, children in ascending order.
    pub fn dfs(&self) -> TreeDecompositionIterator<'_> {
        let mut visited = BitSet::new(self.bags.len());
        let stack = match self.root {
            Some(root) => {
                visited.set_bit(root);
                vec![root]
            }
            None => vec![],
        };
        TreeDecompositionIterator {
            td: self,
            stack,
            visited,
        }
    }

    pub fn verify(&self, hypergraph: &Hypergraph) -> Result<(), TreeDecompositionValidationError> {
        if self.bags.is_empty() {
            return match hypergraph.vertices().next() {
                Some(v) => Err(TreeDecompositionValidationError::MissingVertex(v)),
                None => Ok(()),
            };
        }

        if !self.is_connected() {
            return Err(TreeDecompositionValidationError::NotConnected);
        }

        if self.edge_count() + 1 != self.bags.len() {
            return Err(TreeDecompositionValidationError::HasCycle);
        }

        if let Some(b) = self.bags.iter().find(|b| b.vertex_set.is_empty()) {
            return Err(TreeDecompositionValidationError::EmptyBag(b.id));
        }

        if let Some(v) = self.get_missing_vertex(hypergraph) {
            return Err(TreeDecompositionValidationError::MissingVertex(v));
        }

        if let Some(e) = self.get_missing_hyperedge(hypergraph) {
            return Err(TreeDecompositionValidationError::MissingHyperedge(e));
        }

        if let Some(v) = self.get_vertex_not_inducing_subtree(hypergraph) {
            return Err(TreeDecompositionValidationError::NotInducingSubtree(v));
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        let mut visited = BitSet::new(self.bags.len());
        self.dfs().for_each(|b| {
            visited.set_bit(b.id);
        });
        visited.full()
    }

    fn get_missing_vertex(&self, hypergraph: &Hypergraph) -> Option<usize> {
        let mut covered = FxHashSet::default();
        for b in &self.bags {
            covered.extend(b.vertex_set.iter().copied());
        }
        hypergraph.vertices().find(|v| !covered.contains(v))
    }

    fn get_missing_hyperedge(&self, hypergraph: &Hypergraph) -> Option<usize> {
        hypergraph
            .hyperedges()
            .iter()
            .find(|e| {
                !self
                    .bags
                    .iter()
                    .any(|b| e.vertices().iter().all(|v| b.vertex_set.contains(v)))
            })
            .map(|e| e.id())
    }

    fn get_vertex_not_inducing_subtree(&self, hypergraph: &Hypergraph) -> Option<usize> {
        for u in hypergraph.vertices() {
            let mut inducing_bags: FxHashSet<usize> = self
                .bags
                .iter()
                .filter(|b| b.vertex_set.contains(&u))
                .map(|b| b.id)
                .collect();

            let first = match inducing_bags.iter().next() {
                Some(first) => *first,
                None => continue,
            };
            inducing_bags.remove(&first);
            let mut visited = BitSet::new(self.bags.len());
            visited.set_bit(first);
            let mut stack: Vec<usize> = vec![first];
            while let Some(c) = stack.pop() {
                for n in self.bags[c].neighbors.iter().copied() {
                    let bag = &self.bags[n];
                    if !visited[n] && bag.vertex_set.contains(&u) {
                        inducing_bags.remove(&bag.id);
                        stack.push(n);
                        visited.set_bit(n);
                    }
                }
            }
            if !inducing_bags.is_empty() {
                return Some(u);
            }
        }
        None
    }
}

pub struct TreeDecompositionIterator<'a> {
    td: &'a TreeDecomposition,
    stack: Vec<usize>,
    visited: BitSet,
}

impl<'a> Iterator for TreeDecompositionIterator<'a> {
    type Item = &'a Bag;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let mut next: Vec<_> = self.td.bags[current]
            .neighbors
            .iter()
            .copied()
            .filter(|c| !self.visited[*c])
            .collect();
        next.sort_unstable_by(|a, b| b.cmp(a));
        for c in next {
            self.visited.set_bit(c);
            self.stack.push(c);
        }
        self.td.bags.get(current)
    }
}
