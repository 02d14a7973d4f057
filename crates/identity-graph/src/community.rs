use std::collections::HashMap;

use identity_core::Identifier;
use identity_provider::VouchGraph;

pub type Community = Vec<Identifier>;

/// Greedy seed-and-grow community detection: in canonical node order,
/// each unassigned identity joins the existing community its outgoing
/// vouches most land in, or else seeds a new one. An intentionally simple
/// approximation — exact modularity maximization is out of scope.
pub fn detect_communities(graph: &VouchGraph) -> Vec<Community> {
    let mut nodes: Vec<&Identifier> = graph.nodes.iter().collect();
    nodes.sort();

    let mut assignment: HashMap<Identifier, usize> = HashMap::new();
    let mut communities: Vec<Community> = Vec::new();

    for node in nodes {
        if assignment.contains_key(node) {
            continue;
        }
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for edge in graph.outgoing(node) {
            if let Some(&community_idx) = assignment.get(&edge.to) {
                *counts.entry(community_idx).or_insert(0) += 1;
            }
        }
        let best = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(idx, _)| idx);

        let community_idx = match best {
            Some(idx) => idx,
            None => {
                communities.push(Vec::new());
                communities.len() - 1
            }
        };
        communities[community_idx].push(node.clone());
        assignment.insert(node.clone(), community_idx);
    }

    communities
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_provider::VouchEdge;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn isolated_nodes_form_singleton_communities() {
        let graph = VouchGraph {
            nodes: vec![id("key:a"), id("key:b")],
            edges: vec![],
        };
        let communities = detect_communities(&graph);
        assert_eq!(communities.len(), 2);
    }

    #[test]
    fn mutual_vouchers_join_same_community() {
        let graph = VouchGraph {
            nodes: vec![id("key:a"), id("key:b"), id("key:c")],
            edges: vec![
                VouchEdge { from: id("key:a"), to: id("key:b"), strength: 1.0, epoch: 1 },
                VouchEdge { from: id("key:c"), to: id("key:b"), strength: 1.0, epoch: 1 },
            ],
        };
        let communities = detect_communities(&graph);
        // key:a is processed first (seeds community 0); key:b joins it (no
        // assigned targets yet, seeds its own); key:c's only outgoing vouch
        // lands on key:b, joining key:b's community.
        assert!(communities.iter().any(|c| c.len() >= 2));
    }
}
