//! Hypergraph storage.
//!
//! Vertex ids are handed out sequentially starting at a configurable
//! offset and are never reused or removed, so the live ids of a
//! [`Hypergraph`] always form the range `offset..offset + num_vertices()`.

use crate::graph::{HashMapGraph, MutableGraph};
use fxhash::FxHashSet;
use std::ops::Range;
use thiserror::Error;

/// Id of the first vertex when no explicit offset is given.
pub const DEFAULT_VERTEX_OFFSET: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HypergraphError {
    #[error("invalid vertex reference: {0}")]
    InvalidVertexReference(usize),
    #[error("a hyperedge needs at least two distinct vertices")]
    DegenerateHyperedge,
    #[error("unknown hyperedge: {0}")]
    UnknownHyperedge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperedge {
    id: usize,
    vertices: Vec<usize>,
}

impl Hyperedge {
    pub fn id(&self) -> usize {
        self.id
    }

    /// The endpoints in ascending order, without duplicates.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn contains(&self, v: usize) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct Hypergraph {
    offset: usize,
    edges: Vec<Hyperedge>,
    neighborhoods: Vec<FxHashSet<usize>>,
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Hypergraph {
    /// Creates a hypergraph with vertices `1..=initial_vertex_count`.
    pub fn new(initial_vertex_count: usize) -> Self {
        Self::with_offset(initial_vertex_count, DEFAULT_VERTEX_OFFSET)
    }

    /// Creates a hypergraph whose vertex ids start at `offset`.
    pub fn with_offset(initial_vertex_count: usize, offset: usize) -> Self {
        Self {
            offset,
            edges: Vec::new(),
            neighborhoods: vec![FxHashSet::default(); initial_vertex_count],
        }
    }

    pub fn vertex_offset(&self) -> usize {
        self.offset
    }

    pub fn num_vertices(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn add_vertex(&mut self) -> usize {
        self.neighborhoods.push(FxHashSet::default());
        self.offset + self.neighborhoods.len() - 1
    }

    /// Adds `count` vertices and returns the range of their ids.
    pub fn add_vertices(&mut self, count: usize) -> Range<usize> {
        let first = self.offset + self.neighborhoods.len();
        self.neighborhoods
            .resize_with(self.neighborhoods.len() + count, FxHashSet::default);
        first..first + count
    }

    pub fn is_vertex(&self, v: usize) -> bool {
        v >= self.offset && v - self.offset < self.neighborhoods.len()
    }

    /// All vertex ids in ascending order.
    pub fn vertices(&self) -> Range<usize> {
        self.offset..self.offset + self.neighborhoods.len()
    }

    /// Adds a hyperedge over `vertices` and returns its id.
    ///
    /// Every endpoint must already be a vertex; duplicates are collapsed.
    /// On error the hypergraph is left untouched.
    pub fn add_edge(&mut self, vertices: &[usize]) -> Result<usize, HypergraphError> {
        if let Some(v) = vertices.iter().copied().find(|v| !self.is_vertex(*v)) {
            return Err(HypergraphError::InvalidVertexReference(v));
        }
        let mut vertices = vertices.to_vec();
        vertices.sort_unstable();
        vertices.dedup();
        if vertices.len() < 2 {
            return Err(HypergraphError::DegenerateHyperedge);
        }

        for u in vertices.iter().copied() {
            let idx = u - self.offset;
            self.neighborhoods[idx].extend(vertices.iter().copied().filter(|w| *w != u));
        }
        let id = self.edges.len();
        self.edges.push(Hyperedge { id, vertices });
        Ok(id)
    }

    pub fn hyperedges(&self) -> &[Hyperedge] {
        &self.edges
    }

    pub fn hyperedge(&self, id: usize) -> Result<&Hyperedge, HypergraphError> {
        self.edges
            .get(id)
            .ok_or(HypergraphError::UnknownHyperedge(id))
    }

    /// Vertices sharing at least one hyperedge with `v`, in ascending order.
    pub fn neighbors(&self, v: usize) -> Result<Vec<usize>, HypergraphError> {
        if !self.is_vertex(v) {
            return Err(HypergraphError::InvalidVertexReference(v));
        }
        let mut neighbors: Vec<_> = self.neighborhoods[v - self.offset]
            .iter()
            .copied()
            .collect();
        neighbors.sort_unstable();
        Ok(neighbors)
    }

    pub fn isolated_vertices(&self) -> Vec<usize> {
        self.vertices()
            .filter(|v| self.neighborhoods[v - self.offset].is_empty())
            .collect()
    }

    /// The 2-section: every hyperedge becomes a clique.
    pub fn primal_graph(&self) -> HashMapGraph {
        let mut graph = HashMapGraph::with_capacity(self.num_vertices());
        for v in self.vertices() {
            graph.add_vertex(v);
        }
        for edge in &self.edges {
            graph.make_clique(edge.vertices());
        }
        graph
    }
}
