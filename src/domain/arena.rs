use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{Affordances, ChildKind, NodeId, NodeKind, TreePolicy};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::IdSource;
use crate::domain::label::derive_label;

/// Label given to the root when none is configured.
pub const DIRECTOR_LABEL: &str = "Director";

/// Node of the org chart.
#[derive(Debug, Clone)]
pub struct OrgNode {
    /// Unique within the tree, fixed at creation
    pub id: NodeId,
    pub kind: NodeKind,
    /// Fixed at creation, never recomputed
    pub label: String,
    /// Index of parent node in the arena, None for the Director
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Org chart as an arena of nodes rooted at a single Director.
///
/// A tree value is never mutated once built. Every mutator takes `&self` and
/// returns a new tree; the input stays valid and unchanged. Misses (unknown id,
/// wrong target kind, attempts to remove the Director) return a copy of the
/// input. The `try_*` variants report why instead.
///
/// Equality is structural: two trees are equal when they hold the same ids,
/// kinds and labels in the same shape. Arena slots and policy are ignored.
#[derive(Debug, Clone)]
pub struct OrgTree {
    arena: Arena<OrgNode>,
    root: Index,
    policy: TreePolicy,
}

/// Director-only tree with the default label and policy, root id drawn from `ids`.
pub fn initial_tree<I: IdSource + ?Sized>(ids: &mut I) -> OrgTree {
    OrgTree::new(ids.next_id())
}

impl OrgTree {
    pub fn new(root_id: NodeId) -> Self {
        Self::with_options(root_id, DIRECTOR_LABEL, TreePolicy::default())
    }

    pub fn with_options(root_id: NodeId, root_label: impl Into<String>, policy: TreePolicy) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(OrgNode {
            id: root_id,
            kind: NodeKind::Director,
            label: root_label.into(),
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            policy,
        }
    }

    pub fn policy(&self) -> &TreePolicy {
        &self.policy
    }

    pub fn root_index(&self) -> Index {
        self.root
    }

    pub fn root(&self) -> &OrgNode {
        &self.arena[self.root]
    }

    pub fn get_node(&self, idx: Index) -> Option<&OrgNode> {
        self.arena.get(idx)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn children<'a>(&'a self, node: &'a OrgNode) -> impl Iterator<Item = &'a OrgNode> + 'a {
        node.children.iter().filter_map(|&c| self.arena.get(c))
    }

    pub fn parent(&self, node: &OrgNode) -> Option<&OrgNode> {
        node.parent.and_then(|p| self.arena.get(p))
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Depth-first pre-order search for `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_node(&self, id: &NodeId) -> Option<&OrgNode> {
        self.find_index(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_index(id).is_some()
    }

    /// First node in pre-order carrying `label`.
    pub fn find_by_label(&self, label: &str) -> Option<&OrgNode> {
        self.iter().map(|(_, n)| n).find(|n| n.label == label)
    }

    fn find_index(&self, id: &NodeId) -> Option<Index> {
        self.iter().find(|(_, n)| &n.id == id).map(|(idx, _)| idx)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        match self.get_node(node_idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Every root-to-leaf path, leaves in pre-order.
    pub fn branches(&self) -> Vec<Vec<&OrgNode>> {
        let mut branches = Vec::new();
        let mut path = Vec::new();
        self.collect_branches(self.root, &mut path, &mut branches);
        branches
    }

    fn collect_branches<'a>(
        &'a self,
        node_idx: Index,
        path: &mut Vec<&'a OrgNode>,
        branches: &mut Vec<Vec<&'a OrgNode>>,
    ) {
        if let Some(node) = self.get_node(node_idx) {
            path.push(node);
            if node.children.is_empty() {
                branches.push(path.clone());
            } else {
                for &child in &node.children {
                    self.collect_branches(child, path, branches);
                }
            }
            path.pop();
        }
    }

    /// Actions the presentation layer should offer for `node`.
    pub fn affordances(&self, node: &OrgNode) -> Affordances {
        Affordances::for_kind(node.kind, &self.policy)
    }

    /// Append a Subordinate under `parent_id`; unchanged copy on miss.
    pub fn add_subordinate<I: IdSource + ?Sized>(&self, parent_id: &NodeId, ids: &mut I) -> OrgTree {
        self.try_add_subordinate(parent_id, ids)
            .unwrap_or_else(|e| self.unchanged(e))
    }

    #[instrument(level = "debug", skip(self, ids))]
    pub fn try_add_subordinate<I: IdSource + ?Sized>(
        &self,
        parent_id: &NodeId,
        ids: &mut I,
    ) -> DomainResult<OrgTree> {
        let parent_idx = self
            .find_index(parent_id)
            .ok_or_else(|| DomainError::NodeNotFound(parent_id.clone()))?;
        self.insert_child(parent_idx, ChildKind::Subordinate, ids)
    }

    /// Append a BranchMember under `target_id`; unchanged copy on miss or wrong kind.
    pub fn add_branch_member<I: IdSource + ?Sized>(&self, target_id: &NodeId, ids: &mut I) -> OrgTree {
        self.try_add_branch_member(target_id, ids)
            .unwrap_or_else(|e| self.unchanged(e))
    }

    #[instrument(level = "debug", skip(self, ids))]
    pub fn try_add_branch_member<I: IdSource + ?Sized>(
        &self,
        target_id: &NodeId,
        ids: &mut I,
    ) -> DomainResult<OrgTree> {
        let target_idx = self
            .find_index(target_id)
            .ok_or_else(|| DomainError::NodeNotFound(target_id.clone()))?;
        let kind = self.arena[target_idx].kind;
        if !self.policy.accepts_branch_member(kind) {
            return Err(DomainError::InvalidTarget {
                id: target_id.clone(),
                kind,
            });
        }
        self.insert_child(target_idx, ChildKind::BranchMember, ids)
    }

    /// Drop `id` and its whole subtree; unchanged copy on miss or for the Director.
    pub fn remove_node(&self, id: &NodeId) -> OrgTree {
        self.try_remove_node(id).unwrap_or_else(|e| self.unchanged(e))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn try_remove_node(&self, id: &NodeId) -> DomainResult<OrgTree> {
        let idx = self
            .find_index(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.clone()))?;
        if idx == self.root {
            return Err(DomainError::RootRemoval(id.clone()));
        }

        let doomed: Vec<Index> = TreeIterator::new(self, idx).map(|(i, _)| i).collect();
        let mut next = self.clone();
        if let Some(parent_idx) = self.arena[idx].parent {
            if let Some(parent) = next.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != idx);
            }
        }
        for i in &doomed {
            next.arena.remove(*i);
        }
        debug!(%id, removed = doomed.len(), "removed subtree");
        Ok(next)
    }

    fn insert_child<I: IdSource + ?Sized>(
        &self,
        parent_idx: Index,
        kind: ChildKind,
        ids: &mut I,
    ) -> DomainResult<OrgTree> {
        let parent = &self.arena[parent_idx];
        let siblings = self
            .children(parent)
            .filter(|c| c.kind == NodeKind::from(kind))
            .count();
        let label = derive_label(kind, parent.kind, &parent.label, siblings);

        let id = ids.next_id();
        if self.contains(&id) {
            return Err(DomainError::DuplicateId(id));
        }

        let mut next = self.clone();
        debug!(%id, %label, parent = %parent.id, "inserting node");
        let child_idx = next.arena.insert(OrgNode {
            id,
            kind: kind.into(),
            label,
            parent: Some(parent_idx),
            children: Vec::new(),
        });
        if let Some(parent) = next.arena.get_mut(parent_idx) {
            parent.children.push(child_idx);
        }
        Ok(next)
    }

    fn unchanged(&self, reason: DomainError) -> OrgTree {
        debug!(%reason, "mutation ignored");
        self.clone()
    }

    fn shape(&self) -> Vec<(usize, &OrgNode)> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack = vec![(self.root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                for &child in node.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
                out.push((depth, node));
            }
        }
        out
    }
}

impl PartialEq for OrgTree {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.shape(), other.shape());
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|((da, na), (db, nb))| {
                da == db && na.id == nb.id && na.kind == nb.kind && na.label == nb.label
            })
    }
}

impl Eq for OrgTree {}

/// Pre-order iterator over a subtree.
pub struct TreeIterator<'a> {
    tree: &'a OrgTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a OrgTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a OrgTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a OrgTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
