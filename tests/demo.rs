use bucket_td::{BucketEliminationDecomposer, Hypergraph, MinFillOrdering, Solver};

// builds a small hypergraph, decomposes it with min-fill and inspects the result
#[test]
fn decompose_small_hypergraph() {
    let mut graph = Hypergraph::new(4);
    let v = graph.add_vertex();
    assert_eq!(v, 5);

    graph.add_edge(&[1, 2]).unwrap();
    graph.add_edge(&[2, 3]).unwrap();
    graph.add_edge(&[3, 4]).unwrap();
    graph.add_edge(&[4, 1]).unwrap();
    graph.add_edge(&[1, 3, 5]).unwrap();
    assert_eq!(graph.num_vertices(), 5);
    assert_eq!(graph.num_edges(), 5);

    let decomposer = BucketEliminationDecomposer::new(MinFillOrdering::new().seed(1234));
    let td = decomposer.decompose(&graph).unwrap();

    assert_eq!(td.width(), 2);
    for node in td.vertices() {
        let bag = td.bag_content(node).unwrap();
        assert!(!bag.is_empty() && bag.len() <= 3);
    }
    assert_eq!(td.verify(&graph), Ok(()));
}

#[test]
fn decompose_with_zero_offset() {
    let mut graph = Hypergraph::with_offset(4, 0);
    for u in 0..4 {
        for v in u + 1..4 {
            graph.add_edge(&[u, v]).unwrap();
        }
    }
    assert!(graph.add_edge(&[3, 4]).is_err());

    let td = Solver::default().seed(Some(1)).solve(&graph).unwrap();
    assert_eq!(td.width(), 3);
    assert_eq!(td.node_count(), 1);
    assert_eq!(td.bag_content(0), Ok(vec![0, 1, 2, 3]));
}
