//! Session: holds the current chart and applies one action at a time.

use std::fmt;

use tracing::{debug, info, instrument};

use crate::config::{IdScheme, Settings};
use crate::domain::{DomainError, IdSource, NodeId, OrgTree, SequentialIds, UuidIds};

/// A user action against the current chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddSubordinate(NodeId),
    AddBranchMember(NodeId),
    Remove(NodeId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddSubordinate(id) => write!(f, "add subordinate under {id}"),
            Action::AddBranchMember(id) => write!(f, "add branch member under {id}"),
            Action::Remove(id) => write!(f, "remove {id}"),
        }
    }
}

/// Whether an action changed the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Unchanged(DomainError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Owner of the one current tree value.
///
/// [`Session::apply`] reads the current tree, computes the next one and
/// publishes it in a single `&mut self` call, so no two actions are ever
/// computed against the same base tree.
pub struct Session {
    tree: OrgTree,
    ids: Box<dyn IdSource + Send>,
    applied: usize,
    ignored: usize,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tree", &self.tree)
            .field("applied", &self.applied)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with a Director-only tree whose id comes from `ids`.
    pub fn new(mut ids: Box<dyn IdSource + Send>) -> Self {
        let tree = OrgTree::new(ids.next_id());
        Self::with_tree(tree, ids)
    }

    pub fn with_tree(tree: OrgTree, ids: Box<dyn IdSource + Send>) -> Self {
        Self {
            tree,
            ids,
            applied: 0,
            ignored: 0,
        }
    }

    #[instrument(level = "debug", skip(settings))]
    pub fn from_settings(settings: &Settings) -> Self {
        let mut ids: Box<dyn IdSource + Send> = match settings.id_scheme {
            IdScheme::Sequential => Box::new(SequentialIds::starting_at(settings.first_id)),
            IdScheme::Uuid => Box::new(UuidIds),
        };
        let tree = OrgTree::with_options(
            ids.next_id(),
            settings.director_label.clone(),
            settings.policy,
        );
        info!(root = %tree.root().id, "session started");
        Self::with_tree(tree, ids)
    }

    pub fn tree(&self) -> &OrgTree {
        &self.tree
    }

    pub fn applied_count(&self) -> usize {
        self.applied
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored
    }

    #[instrument(level = "debug", skip(self, action), fields(action = %action))]
    pub fn apply(&mut self, action: &Action) -> Outcome {
        let next = match action {
            Action::AddSubordinate(id) => self.tree.try_add_subordinate(id, self.ids.as_mut()),
            Action::AddBranchMember(id) => self.tree.try_add_branch_member(id, self.ids.as_mut()),
            Action::Remove(id) => self.tree.try_remove_node(id),
        };
        match next {
            Ok(tree) => {
                self.tree = tree;
                self.applied += 1;
                Outcome::Applied
            }
            Err(reason) => {
                debug!(%reason, "action ignored");
                self.ignored += 1;
                Outcome::Unchanged(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Box::new(SequentialIds::new()))
    }

    #[test]
    fn applied_action_replaces_tree() {
        let mut s = session();
        let outcome = s.apply(&Action::AddSubordinate(NodeId::from("1")));
        assert!(outcome.is_applied());
        assert_eq!(s.tree().node_count(), 2);
        assert_eq!(s.applied_count(), 1);
    }

    #[test]
    fn ignored_action_keeps_tree() {
        let mut s = session();
        let before = s.tree().clone();
        let outcome = s.apply(&Action::Remove(NodeId::from("1")));
        assert_eq!(
            outcome,
            Outcome::Unchanged(DomainError::RootRemoval(NodeId::from("1")))
        );
        assert_eq!(s.tree(), &before);
        assert_eq!(s.ignored_count(), 1);
    }
}
