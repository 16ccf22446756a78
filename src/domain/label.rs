//! Label derivation for newly inserted nodes.

use crate::domain::entities::{ChildKind, NodeKind};

const SUBORDINATE_PREFIX: &str = "Subordinate ";
const BRANCH_MEMBER_PREFIX: &str = "Branch member ";

/// Derive the label of a new node.
///
/// `same_kind_siblings` is the number of children of kind `child` the parent
/// already has; the new node gets the next 1-based sequence number.
///
/// - Subordinate under the Director: `Subordinate <n>`
/// - Subordinate under anything else: `<parent label>/<n>`
/// - Branch member: `Branch member <tag>/<n>`, see [`branch_tag`]
pub fn derive_label(
    child: ChildKind,
    parent_kind: NodeKind,
    parent_label: &str,
    same_kind_siblings: usize,
) -> String {
    let seq = same_kind_siblings + 1;
    match child {
        ChildKind::Subordinate if parent_kind == NodeKind::Director => {
            format!("{SUBORDINATE_PREFIX}{seq}")
        }
        ChildKind::Subordinate => format!("{parent_label}/{seq}"),
        ChildKind::BranchMember => {
            format!("{BRANCH_MEMBER_PREFIX}{}/{seq}", branch_tag(parent_label))
        }
    }
}

/// Whatever follows `"Subordinate "` in `label`, or the whole label.
pub fn branch_tag(label: &str) -> &str {
    label
        .split_once(SUBORDINATE_PREFIX)
        .map(|(_, tag)| tag)
        .unwrap_or(label)
}
