//! Identifier sources injected into the engine.

use uuid::Uuid;

use crate::domain::entities::NodeId;

/// Produces fresh node ids. Ids must never repeat within a session.
pub trait IdSource {
    fn next_id(&mut self) -> NodeId;
}

impl<F> IdSource for F
where
    F: FnMut() -> NodeId,
{
    fn next_id(&mut self) -> NodeId {
        self()
    }
}

/// Increasing integer ids: 1, 2, 3, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::from(self.next);
        self.next += 1;
        id
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Clone, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_id().as_str(), "7");
        assert_eq!(ids.next_id().as_str(), "8");
    }

    #[test]
    fn uuid_ids_differ() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn closure_is_an_id_source() {
        let mut n = 100u64;
        let mut ids = || {
            n += 1;
            NodeId::from(n)
        };
        assert_eq!(IdSource::next_id(&mut ids).as_str(), "101");
    }
}
