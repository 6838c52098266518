//! Node id allocation for one editing session.

use crate::model::NodeId;

/// Hands out sequential numeric node ids ("1", "2", ...).
///
/// Owned by a [`GraphStore`](super::GraphStore); ids are never handed out
/// twice until the allocator is reset or reseeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// allocate the next id
    pub fn next(&mut self) -> NodeId {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    /// id the next call to [`IdAllocator::next`] will return
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// continue counting after `max_observed`
    pub fn reseed(
        &mut self,
        max_observed: u64,
    ) {
        self.next = max_observed.saturating_add(1);
    }

    /// start over from "1"
    pub fn reset(&mut self) {
        self.next = 1;
    }

    /// make sure a foreign id can never be handed out again
    pub fn observe(
        &mut self,
        id: &str,
    ) {
        if let Some(n) = numeric_id(id) {
            if n >= self.next {
                self.reseed(n);
            }
        }
    }
}

/// Numeric ids above this are treated like non-numeric ones, so the
/// allocator can never be pushed to the end of its range.
pub const MAX_NUMERIC_ID: u64 = u64::MAX / 2;

/// Numeric value of a node id, if it has one the allocator tracks.
pub fn numeric_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|n| *n <= MAX_NUMERIC_ID)
}

/// Largest numeric id among `ids`, 0 when there is none.
pub fn max_numeric_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> u64 {
    ids.into_iter().filter_map(numeric_id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next(), "1");
        assert_eq!(ids.next(), "2");
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_reseed_and_reset() {
        let mut ids = IdAllocator::new();
        ids.reseed(max_numeric_id(["3", "7", "1"]));
        assert_eq!(ids.next(), "8");

        ids.reset();
        assert_eq!(ids.next(), "1");
    }

    #[test]
    fn test_observe_only_moves_forward() {
        let mut ids = IdAllocator::new();
        ids.reseed(10);
        ids.observe("4");
        ids.observe("start");
        assert_eq!(ids.peek(), 11);
        ids.observe("15");
        assert_eq!(ids.next(), "16");
    }

    #[test]
    fn test_huge_ids_do_not_exhaust_allocator() {
        let mut ids = IdAllocator::new();
        ids.reseed(max_numeric_id(["18446744073709551615", "4"]));
        ids.observe("18446744073709551614");
        assert_eq!(ids.next(), "5");

        ids.observe(&MAX_NUMERIC_ID.to_string());
        assert_eq!(ids.next(), (MAX_NUMERIC_ID + 1).to_string());
    }

    #[test]
    fn test_max_numeric_id_ignores_non_numeric() {
        assert_eq!(max_numeric_id(["a", "b"]), 0);
        assert_eq!(max_numeric_id(["node-9", "2"]), 2);
        assert_eq!(max_numeric_id(std::iter::empty()), 0);
    }
}
