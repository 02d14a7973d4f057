use std::collections::HashMap;

use identity_core::Identifier;
use identity_provider::VouchGraph;

use crate::community::Community;

fn voucher_community_index(communities: &[Community], voucher: &Identifier) -> Option<usize> {
    communities.iter().position(|c| c.contains(voucher))
}

/// Normalized Shannon entropy over the communities represented among
/// `target`'s vouchers: `H / log2(|communities represented|)`. An empty
/// voucher set is maximally diverse by convention (`1.0`); a voucher set
/// concentrated in a single community is `0.0`.
pub fn shannon_diversity(target: &Identifier, graph: &VouchGraph, communities: &[Community]) -> f64 {
    let vouchers: Vec<&Identifier> = graph.incoming(target).map(|e| &e.from).collect();
    if vouchers.is_empty() {
        return 1.0;
    }

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for voucher in &vouchers {
        if let Some(idx) = voucher_community_index(communities, voucher) {
            *counts.entry(idx).or_insert(0) += 1;
        }
    }
    if counts.len() <= 1 {
        return 0.0;
    }

    let total = vouchers.len() as f64;
    let entropy: f64 = counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum();
    entropy / (counts.len() as f64).log2()
}

/// Mean pairwise Jaccard similarity over the (singleton) community
/// memberships of `target`'s vouchers: the fraction of voucher pairs that
/// land in the same community.
pub fn community_overlap(target: &Identifier, graph: &VouchGraph, communities: &[Community]) -> f64 {
    let vouchers: Vec<&Identifier> = graph.incoming(target).map(|e| &e.from).collect();
    let indices: Vec<Option<usize>> = vouchers
        .iter()
        .map(|v| voucher_community_index(communities, v))
        .collect();

    let mut pair_count = 0usize;
    let mut same_count = 0usize;
    for i in 0..indices.len() {
        for j in (i + 1)..indices.len() {
            pair_count += 1;
            if let (Some(a), Some(b)) = (indices[i], indices[j]) {
                if a == b {
                    same_count += 1;
                }
            }
        }
    }
    if pair_count == 0 {
        1.0
    } else {
        same_count as f64 / pair_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_provider::VouchEdge;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn empty_vouchers_are_maximally_diverse() {
        let graph = VouchGraph::default();
        let target = id("key:alice");
        assert_eq!(shannon_diversity(&target, &graph, &[]), 1.0);
    }

    #[test]
    fn single_community_has_zero_diversity() {
        let target = id("key:alice");
        let graph = VouchGraph {
            nodes: vec![id("key:v1"), id("key:v2"), target.clone()],
            edges: vec![
                VouchEdge { from: id("key:v1"), to: target.clone(), strength: 1.0, epoch: 1 },
                VouchEdge { from: id("key:v2"), to: target.clone(), strength: 1.0, epoch: 1 },
            ],
        };
        let communities = vec![vec![id("key:v1"), id("key:v2")]];
        assert_eq!(shannon_diversity(&target, &graph, &communities), 0.0);
    }
}
