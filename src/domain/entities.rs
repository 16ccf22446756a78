//! Domain entities: node identity, node kinds and tree policy

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique within one tree.
///
/// Integer and string id schemes are both stored as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Role of a node in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The single root.
    Director,
    /// A managerial child of the Director or of another node.
    Subordinate,
    /// A peer-style member attached under a Subordinate.
    BranchMember,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Director => "director",
            NodeKind::Subordinate => "subordinate",
            NodeKind::BranchMember => "branch member",
        };
        f.write_str(s)
    }
}

/// Kinds a newly inserted node can have. The Director is never inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Subordinate,
    BranchMember,
}

impl From<ChildKind> for NodeKind {
    fn from(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Subordinate => NodeKind::Subordinate,
            ChildKind::BranchMember => NodeKind::BranchMember,
        }
    }
}

/// Rules deciding which targets accept which insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreePolicy {
    /// Accept a BranchMember as target of `add_branch_member`
    pub allow_nested_branch_members: bool,
    /// Offer "add subordinate" on nodes other than the Director
    pub allow_nested_subordinates: bool,
}

impl Default for TreePolicy {
    fn default() -> Self {
        Self {
            allow_nested_branch_members: false,
            allow_nested_subordinates: true,
        }
    }
}

impl TreePolicy {
    /// Permissive policy: branch members may carry further branch members.
    pub fn permissive() -> Self {
        Self {
            allow_nested_branch_members: true,
            ..Self::default()
        }
    }

    /// Whether a node of `kind` may receive a new branch member.
    pub fn accepts_branch_member(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Subordinate => true,
            NodeKind::BranchMember => self.allow_nested_branch_members,
            NodeKind::Director => false,
        }
    }
}

/// Actions a presentation layer should offer for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub add_subordinate: bool,
    pub add_branch_member: bool,
    pub remove: bool,
}

impl Affordances {
    pub fn for_kind(kind: NodeKind, policy: &TreePolicy) -> Self {
        Self {
            add_subordinate: kind == NodeKind::Director || policy.allow_nested_subordinates,
            add_branch_member: policy.accepts_branch_member(kind),
            remove: kind != NodeKind::Director,
        }
    }
}
