//! Text views of a chart: a `termtree` outline and root-to-leaf branches.

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{OrgNode, OrgTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// One outline line per node: `label [id]`.
pub fn node_line(node: &OrgNode) -> String {
    format!("{} [{}]", node.label, node.id)
}

impl TreeNodeConvert for OrgTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &OrgTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(node_line(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut out = Tree::new(node_line(self.root()));
        build_tree(self, self.root_index(), &mut out);
        out
    }
}

/// Each branch on one line, leaf first: `Branch member 2/1 <- Subordinate 2 <- Director`.
pub fn branch_lines(tree: &OrgTree) -> Vec<String> {
    tree.branches()
        .into_iter()
        .map(|path| path.iter().rev().map(|n| n.label.as_str()).join(" <- "))
        .collect()
}
