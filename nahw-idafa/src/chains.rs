//! Chain linking: a construction whose second term is another construction's
//! first term continues that construction (`كتاب رب العالمين`).

use std::collections::{HashMap, HashSet};

use crate::construction::Construction;

/// Ordered index sequences of linked constructions, heads first.
///
/// Traversal is an explicit worklist; `processed` guarantees every
/// construction joins at most one chain and pathological inputs terminate.
/// Only sequences of two or more are returned.
pub fn find_chains(constructions: &[Construction]) -> Vec<Vec<usize>> {
    let mut by_head: HashMap<&str, usize> = HashMap::new();
    for (index, construction) in constructions.iter().enumerate() {
        by_head.entry(construction.role_a.id.as_str()).or_insert(index);
    }
    let targets: HashSet<&str> = constructions
        .iter()
        .map(|construction| construction.role_b.id.as_str())
        .collect();

    let mut processed = HashSet::new();
    let mut chains = Vec::new();

    for (start, construction) in constructions.iter().enumerate() {
        if processed.contains(&start) || targets.contains(construction.role_a.id.as_str()) {
            continue;
        }
        let chain = walk(constructions, &by_head, start, &mut processed);
        if chain.len() >= 2 {
            chains.push(chain);
        }
    }

    chains
}

fn walk(
    constructions: &[Construction],
    by_head: &HashMap<&str, usize>,
    start: usize,
    processed: &mut HashSet<usize>,
) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut worklist = vec![start];

    while let Some(current) = worklist.pop() {
        if !processed.insert(current) {
            break;
        }
        chain.push(current);
        if let Some(next) = by_head.get(constructions[current].role_b.id.as_str()) {
            worklist.push(*next);
        }
    }

    chain
}
