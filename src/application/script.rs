//! Line-oriented action scripts for driving a session.
//!
//! ```text
//! # three subordinates, two branch members under the second
//! sub root
//! sub root
//! sub root
//! branch Subordinate 2
//! branch Subordinate 2
//! remove Subordinate 3
//! ```
//!
//! Verbs: `sub`/`subordinate`/`add-subordinate`, `branch`/`add-branch-member`,
//! `rm`/`remove`. The reference is the rest of the line and is resolved as a
//! node id, else a node label, else the keyword `root`. Anything else is used
//! as a raw id and the action becomes a no-op.

use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::session::{Action, Outcome, Session};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, OrgTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Subordinate,
    BranchMember,
    Remove,
}

impl Verb {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sub" | "subordinate" | "add-subordinate" => Some(Verb::Subordinate),
            "branch" | "add-branch-member" => Some(Verb::BranchMember),
            "rm" | "remove" => Some(Verb::Remove),
            _ => None,
        }
    }
}

/// One parsed script line; `target` is resolved only when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source text
    pub line: usize,
    pub verb: Verb,
    pub target: String,
}

impl ScriptLine {
    /// Resolve the target against `tree` and build the action.
    pub fn to_action(&self, tree: &OrgTree) -> Action {
        let id = resolve_ref(tree, &self.target);
        match self.verb {
            Verb::Subordinate => Action::AddSubordinate(id),
            Verb::BranchMember => Action::AddBranchMember(id),
            Verb::Remove => Action::Remove(id),
        }
    }
}

/// Parse script text. Blank lines and `#` comments are skipped.
pub fn parse_script(content: &str) -> ApplicationResult<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (verb_str, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        let verb = Verb::parse(verb_str).ok_or_else(|| ApplicationError::Script {
            line,
            message: format!("unknown action: {verb_str}"),
        })?;
        let target = rest.trim();
        if target.is_empty() {
            return Err(ApplicationError::Script {
                line,
                message: format!("missing node reference after '{verb_str}'"),
            });
        }

        lines.push(ScriptLine {
            line,
            verb,
            target: target.to_string(),
        });
    }
    Ok(lines)
}

/// Resolve a node reference: id, then label, then the `root` keyword.
pub fn resolve_ref(tree: &OrgTree, target: &str) -> NodeId {
    let as_id = NodeId::from(target);
    if tree.contains(&as_id) {
        return as_id;
    }
    if let Some(node) = tree.find_by_label(target) {
        return node.id.clone();
    }
    if target.eq_ignore_ascii_case("root") {
        return tree.root().id.clone();
    }
    as_id
}

/// Read a script from `path`, or from stdin when `path` is `-`.
///
/// Unreadable input is an I/O failure; bytes that are not UTF-8 are a
/// script error on the line holding the first bad byte.
pub fn load_script(path: &Path) -> ApplicationResult<String> {
    let bytes = if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .with_path_context("read script", path)?;
        bytes
    } else {
        std::fs::read(path).with_path_context("read script", path)?
    };
    decode_script(bytes)
}

fn decode_script(bytes: Vec<u8>) -> ApplicationResult<String> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        ApplicationError::Script {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: "script is not valid UTF-8".to_string(),
        }
    })
}

/// Counts from one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub ignored: usize,
}

/// Apply `lines` to `session` in order, calling `on_step` after each action.
///
/// With `strict`, the first ignored action aborts with [`ApplicationError::Strict`];
/// actions before it stay applied.
#[instrument(level = "debug", skip(session, lines, on_step), fields(lines = lines.len()))]
pub fn replay<F>(
    session: &mut Session,
    lines: &[ScriptLine],
    strict: bool,
    mut on_step: F,
) -> ApplicationResult<ReplaySummary>
where
    F: FnMut(&ScriptLine, &Action, &Outcome, &OrgTree),
{
    let mut summary = ReplaySummary::default();
    for line in lines {
        let action = line.to_action(session.tree());
        let outcome = session.apply(&action);
        on_step(line, &action, &outcome, session.tree());
        match outcome {
            Outcome::Applied => summary.applied += 1,
            Outcome::Unchanged(reason) => {
                if strict {
                    return Err(ApplicationError::Strict {
                        line: line.line,
                        reason,
                    });
                }
                summary.ignored += 1;
            }
        }
    }
    debug!(?summary, "replay finished");
    Ok(summary)
}
