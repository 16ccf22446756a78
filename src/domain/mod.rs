//! Domain layer: the org chart engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod ids;
pub mod label;

pub use arena::{initial_tree, OrgNode, OrgTree, DIRECTOR_LABEL};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use label::derive_label;
