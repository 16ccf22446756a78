//! Shared test setup: one-time tracing subscriber and chart fixtures.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{parse_script, replay, Session};
use crate::domain::{OrgTree, SequentialIds, TreePolicy, DIRECTOR_LABEL};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins; otherwise trace for this crate only
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orgtree=trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Session with sequential ids (Director = "1") after replaying `script`.
///
/// Panics on script errors; meant for tests only.
pub fn session_from_script(script: &str, policy: TreePolicy) -> Session {
    let tree = OrgTree::with_options("1".into(), DIRECTOR_LABEL, policy);
    let mut session = Session::with_tree(tree, Box::new(SequentialIds::starting_at(2)));
    let lines = parse_script(script).unwrap_or_else(|e| panic!("bad fixture script: {e}"));
    replay(&mut session, &lines, true, |_, _, _, _| {})
        .unwrap_or_else(|e| panic!("fixture script did not apply: {e}"));
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn fixture_builds_chart() {
        let session = session_from_script("sub root\nbranch Subordinate 1", TreePolicy::default());
        assert_eq!(session.tree().node_count(), 3);
    }
}
