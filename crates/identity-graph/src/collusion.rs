use std::collections::HashSet;

use identity_core::{Identifier, MIN_COLLUSION_CLUSTER_SIZE};
use identity_provider::VouchGraph;

#[derive(Debug, Clone)]
pub struct CollusionCluster {
    pub members: Vec<Identifier>,
    pub density: f64,
    pub suspicion: f64,
    pub confidence: f64,
}

fn density(graph: &VouchGraph, members: &HashSet<Identifier>) -> f64 {
    let n = members.len();
    if n < 2 {
        return 0.0;
    }
    let edges = graph
        .edges
        .iter()
        .filter(|e| members.contains(&e.from) && members.contains(&e.to))
        .count();
    let possible = n * (n - 1);
    edges as f64 / possible as f64
}

/// Dense-subgraph growth: starting from each unvisited node, greedily
/// add whichever neighbor keeps cluster density highest, stopping once no
/// candidate keeps density at or above `threshold`. Clusters smaller than
/// `MIN_COLLUSION_CLUSTER_SIZE` are discarded as noise.
pub fn find_collusion_clusters(graph: &VouchGraph, threshold: f64) -> Vec<CollusionCluster> {
    let mut nodes: Vec<&Identifier> = graph.nodes.iter().collect();
    nodes.sort();

    let mut visited: HashSet<Identifier> = HashSet::new();
    let mut clusters = Vec::new();

    for seed in nodes {
        if visited.contains(seed) {
            continue;
        }
        let mut members: HashSet<Identifier> = HashSet::new();
        members.insert(seed.clone());

        loop {
            let mut candidates: HashSet<Identifier> = HashSet::new();
            for m in &members {
                for e in graph.outgoing(m) {
                    if !members.contains(&e.to) {
                        candidates.insert(e.to.clone());
                    }
                }
                for e in graph.incoming(m) {
                    if !members.contains(&e.from) {
                        candidates.insert(e.from.clone());
                    }
                }
            }

            let mut best: Option<(Identifier, f64)> = None;
            for candidate in candidates {
                let mut trial = members.clone();
                trial.insert(candidate.clone());
                let d = density(graph, &trial);
                if d >= threshold {
                    match &best {
                        Some((_, best_d)) if *best_d >= d => {}
                        _ => best = Some((candidate, d)),
                    }
                }
            }

            match best {
                Some((candidate, _)) => {
                    members.insert(candidate);
                }
                None => break,
            }
        }

        if members.len() >= MIN_COLLUSION_CLUSTER_SIZE {
            for m in &members {
                visited.insert(m.clone());
            }
            let d = density(graph, &members);
            let mut member_vec: Vec<Identifier> = members.into_iter().collect();
            member_vec.sort();
            let normalized_size = member_vec.len() as f64 / graph.nodes.len().max(1) as f64;
            let suspicion = (normalized_size + d) / 2.0;
            let confidence = (normalized_size + d) / 2.0;
            clusters.push(CollusionCluster {
                members: member_vec,
                density: d,
                suspicion,
                confidence,
            });
        } else {
            visited.insert(seed.clone());
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_provider::VouchEdge;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn edge(from: &str, to: &str) -> VouchEdge {
        VouchEdge {
            from: id(from),
            to: id(to),
            strength: 1.0,
            epoch: 1,
        }
    }

    #[test]
    fn fully_connected_triangle_is_flagged() {
        let graph = VouchGraph {
            nodes: vec![id("key:a"), id("key:b"), id("key:c")],
            edges: vec![
                edge("key:a", "key:b"),
                edge("key:b", "key:a"),
                edge("key:b", "key:c"),
                edge("key:c", "key:b"),
                edge("key:a", "key:c"),
                edge("key:c", "key:a"),
            ],
        };
        let clusters = find_collusion_clusters(&graph, 0.8);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 3);
        assert!((clusters[0].density - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sparse_graph_yields_no_clusters() {
        let graph = VouchGraph {
            nodes: vec![id("key:a"), id("key:b"), id("key:c"), id("key:d")],
            edges: vec![edge("key:a", "key:b"), edge("key:c", "key:d")],
        };
        let clusters = find_collusion_clusters(&graph, 0.8);
        assert!(clusters.is_empty());
    }
}
