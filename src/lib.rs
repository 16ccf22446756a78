//! Editable organizational chart engine.
//!
//! A chart is an immutable [`OrgTree`](domain::OrgTree) rooted at a single
//! Director. Subordinates and branch members are inserted, and nodes removed,
//! by functions that return a new tree and leave the old one untouched.
//! Failed lookups and wrong-kind targets are silent no-ops; the `try_*`
//! variants say why.
//!
//! ```
//! use orgtree::domain::{initial_tree, SequentialIds};
//!
//! let mut ids = SequentialIds::new();
//! let tree = initial_tree(&mut ids);
//! let director = tree.root().id.clone();
//!
//! let tree = tree.add_subordinate(&director, &mut ids);
//! let tree = tree.add_subordinate(&director, &mut ids);
//! let second = tree.find_by_label("Subordinate 2").unwrap().id.clone();
//! let tree = tree.add_branch_member(&second, &mut ids);
//!
//! assert!(tree.find_by_label("Branch member 2/1").is_some());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
