use std::collections::{HashMap, HashSet};

use super::graph::Relationship;

/// Whether adding the edge `before -> after` to `edges` would close a cycle.
pub(crate) fn creates_cycle(edges: &[Relationship], before: &str, after: &str) -> bool {
    if before == after {
        return true;
    }

    let mut downstream: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        downstream
            .entry(edge.before.as_str())
            .or_default()
            .push(edge.after.as_str());
    }

    let mut visited = HashSet::new();
    reaches(&downstream, after, before, &mut visited)
}

/// DFS helper: is `target` reachable from `from`?
fn reaches<'a>(
    downstream: &HashMap<&'a str, Vec<&'a str>>,
    from: &'a str,
    target: &str,
    visited: &mut HashSet<&'a str>,
) -> bool {
    if from == target {
        return true;
    }
    if !visited.insert(from) {
        return false;
    }

    downstream.get(from).map_or(false, |next| {
        next.iter()
            .any(|&task| reaches(downstream, task, target, visited))
    })
}
