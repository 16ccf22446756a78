//! Application layer: session and action scripts
//!
//! This layer drives the domain engine and owns the only mutable state: the current tree.

pub mod error;
pub mod error_ext;
pub mod script;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use script::{load_script, parse_script, replay, resolve_ref, ReplaySummary, ScriptLine, Verb};
pub use session::{Action, Outcome, Session};
