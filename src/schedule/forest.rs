use crate::schedule::ScheduleError;
use crate::types::ClassificationNode;

/// Rebuild the chapter forest from the flat, depth-annotated row sequence.
///
/// Nodes are consumed in reverse document order. A depth-0 node is a root;
/// any other node attaches to the nearest remaining node with a strictly
/// lower depth — not `depth - 1`, because the source indentation can skip
/// levels. Processing back-to-front guarantees that a node's own subtree is
/// complete before the node itself is linked, and front-insertion into
/// `children` restores document order among siblings.
pub fn build_forest(
    nodes: Vec<ClassificationNode>,
) -> Result<Vec<ClassificationNode>, ScheduleError> {
    let mut pending = nodes;
    let mut forest = Vec::new();

    while let Some(node) = pending.pop() {
        if node.depth == 0 {
            forest.push(node);
            continue;
        }
        match pending.iter_mut().rev().find(|c| c.depth < node.depth) {
            Some(parent) => parent.children.insert(0, node),
            None => {
                // Only ever popped from the back, so the remaining length is
                // the popped node's original row index.
                return Err(ScheduleError::OrphanNode {
                    index: pending.len(),
                    depth: node.depth,
                });
            }
        }
    }

    // Roots were collected back-to-front.
    forest.reverse();
    Ok(forest)
}

/// Fill blank statistical codes from the nearest ancestor, top-down.
///
/// A node keeps its own non-empty code; otherwise it takes the code resolved
/// for its parent, which may itself be inherited. HS codes are never touched.
pub fn inherit_stat_codes(forest: &mut [ClassificationNode]) {
    for root in forest.iter_mut() {
        propagate_stat_code(root, "");
    }
}

fn propagate_stat_code(node: &mut ClassificationNode, inherited: &str) {
    if node.stat_code.is_empty() {
        node.stat_code = inherited.to_string();
    }
    let resolved = node.stat_code.clone();
    for child in node.children.iter_mut() {
        propagate_stat_code(child, &resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::index::count_items;
    use crate::types::{RateTable, Units};

    fn node(depth: u32, stat_code: &str, description: &str) -> ClassificationNode {
        ClassificationNode {
            depth,
            stat_code: stat_code.to_string(),
            hs_code: String::new(),
            description: description.to_string(),
            rates: RateTable::new(),
            units: Units::default(),
            laws: Vec::new(),
            children: Vec::new(),
        }
    }

    fn nodes_at(depths: &[u32]) -> Vec<ClassificationNode> {
        depths
            .iter()
            .enumerate()
            .map(|(i, &depth)| node(depth, "", &format!("row {i}")))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(build_forest(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn all_zero_depths_yield_a_flat_forest() {
        let forest = build_forest(nodes_at(&[0, 0, 0])).unwrap();
        assert_eq!(forest.len(), 3);
        assert!(forest.iter().all(|n| n.children.is_empty()));
        assert_eq!(forest[0].description, "row 0");
        assert_eq!(forest[2].description, "row 2");
    }

    #[test]
    fn nests_by_nearest_lower_depth() {
        let forest = build_forest(nodes_at(&[0, 1, 2, 1, 0])).unwrap();
        assert_eq!(forest.len(), 2);

        let first = &forest[0];
        assert_eq!(first.description, "row 0");
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[0].description, "row 1");
        assert_eq!(first.children[0].children.len(), 1);
        assert_eq!(first.children[0].children[0].description, "row 2");
        assert_eq!(first.children[1].description, "row 3");

        let second = &forest[1];
        assert_eq!(second.description, "row 4");
        assert!(second.children.is_empty());
    }

    #[test]
    fn depth_jumps_attach_to_nearest_lower_ancestor() {
        let forest = build_forest(nodes_at(&[0, 3, 0])).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].depth, 3);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn siblings_keep_document_order() {
        let forest = build_forest(nodes_at(&[0, 1, 1, 1])).unwrap();
        assert_eq!(forest.len(), 1);
        let children: Vec<_> = forest[0]
            .children
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(children, vec!["row 1", "row 2", "row 3"]);
    }

    #[test]
    fn node_count_is_preserved() {
        let depths = [0, 1, 2, 2, 1, 0, 2, 2, 1, 0];
        let forest = build_forest(nodes_at(&depths)).unwrap();
        assert_eq!(count_items(&forest), depths.len());
    }

    #[test]
    fn orphan_node_aborts_the_chapter() {
        let err = build_forest(nodes_at(&[1, 2])).unwrap_err();
        assert_eq!(err, ScheduleError::OrphanNode { index: 0, depth: 1 });
    }

    #[test]
    fn inheritance_fills_blank_codes_from_nearest_ancestor() {
        let mut root = node(0, "1234", "root");
        let mut child = node(1, "", "child");
        child.children.push(node(2, "5678", "grandchild with code"));
        child.children.push(node(2, "", "grandchild without"));
        root.children.push(child);

        let mut forest = vec![root];
        inherit_stat_codes(&mut forest);

        let child = &forest[0].children[0];
        assert_eq!(child.stat_code, "1234");
        assert_eq!(child.children[0].stat_code, "5678");
        assert_eq!(child.children[1].stat_code, "1234");
    }

    #[test]
    fn inheritance_leaves_codeless_lineages_empty() {
        let mut root = node(0, "", "root");
        root.children.push(node(1, "", "child"));
        let mut forest = vec![root];
        inherit_stat_codes(&mut forest);
        assert_eq!(forest[0].stat_code, "");
        assert_eq!(forest[0].children[0].stat_code, "");
    }
}
