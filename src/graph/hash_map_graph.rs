use crate::graph::base_graph::BaseGraph;
use crate::graph::mutable_graph::MutableGraph;
use fxhash::FxHashMap;
use fxhash::FxHashSet;

/// Adjacency-set graph over arbitrary `usize` vertex ids.
///
/// This is the working representation for elimination: vertex ids are the
/// hypergraph's ids, so no translation is needed between an ordering and
/// the graph it was computed on.
#[derive(Clone, Debug)]
pub struct HashMapGraph {
    data: FxHashMap<usize, FxHashSet<usize>>,
}

impl HashMapGraph {
    pub fn neighborhood_set(&self, u: usize) -> &FxHashSet<usize> {
        self.data.get(&u).unwrap()
    }
}

impl MutableGraph for HashMapGraph {
    fn add_vertex(&mut self, u: usize) {
        self.data.entry(u).or_insert_with(FxHashSet::default);
    }

    fn remove_vertex(&mut self, u: usize) {
        if let Some(neighbors) = self.data.remove(&u) {
            for i in neighbors.iter() {
                if let Some(x) = self.data.get_mut(i) {
                    x.remove(&u);
                }
            }
        }
    }

    fn add_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        let first = self.data.entry(u).or_insert_with(FxHashSet::default);
        first.insert(v);
        let second = self.data.entry(v).or_insert_with(FxHashSet::default);
        second.insert(u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        if let Some(x) = self.data.get_mut(&u) {
            x.remove(&v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.remove(&u);
        }
    }

    fn eliminate_vertex(&mut self, u: usize) {
        let nb = match self.data.remove(&u) {
            Some(nb) => nb,
            None => return,
        };
        for i in &nb {
            self.data.get_mut(i).unwrap().remove(&u);
        }
        for i in &nb {
            for j in &nb {
                if i < j {
                    self.data.get_mut(i).unwrap().insert(*j);
                    self.data.get_mut(j).unwrap().insert(*i);
                }
            }
        }
    }

    fn new() -> Self {
        HashMapGraph {
            data: FxHashMap::default(),
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMapGraph {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }
}

impl BaseGraph for HashMapGraph {
    fn degree(&self, u: usize) -> usize {
        self.data.get(&u).map_or(0, |nb| nb.len())
    }

    fn order(&self) -> usize {
        self.data.len()
    }

    fn is_clique(&self, vertices: &[usize]) -> bool {
        for (i, v) in vertices.iter().enumerate() {
            for u in vertices.iter().skip(i + 1) {
                if !self.has_edge(*v, *u) {
                    return false;
                }
            }
        }
        true
    }

    fn has_vertex(&self, u: usize) -> bool {
        self.data.contains_key(&u)
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.data.get(&u).map_or(false, |nb| nb.contains(&v))
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        let keys = self.data.keys().copied();
        Box::new(keys)
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data.get(&u).unwrap().iter().copied())
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let mut count = 0;
        for x in self.neighborhood_set(u) {
            for y in self.neighborhood_set(u) {
                if x < y && !self.has_edge(*x, *y) {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::base_graph::BaseGraph;
    use crate::graph::hash_map_graph::HashMapGraph;
    use crate::graph::mutable_graph::MutableGraph;

    #[test]
    fn test_order() {
        let mut graph = HashMapGraph::new();
        graph.add_vertex(7);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        assert_eq!(graph.order(), 4);

        graph.remove_vertex(2);
        assert_eq!(graph.order(), 3);
        assert!(!graph.has_edge(1, 2));
        assert!(!graph.has_edge(3, 2));
    }

    #[test]
    fn test_degree() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(1, 4);
        assert_eq!(graph.degree(1), 3);
        assert_eq!(graph.degree(2), 1);

        graph.remove_edge(1, 4);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(4), 0);
    }

    #[test]
    fn eliminate_vertex_fills_neighborhood() {
        let mut graph = HashMapGraph::new();
        // star with center 0
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(0, 3);
        assert_eq!(graph.fill_in_count(0), 3);

        graph.eliminate_vertex(0);
        assert!(!graph.has_vertex(0));
        assert!(graph.is_clique(&[1, 2, 3]));
        assert_eq!(graph.fill_in_count(1), 0);
    }
}
