//! Time-ordered ID generation.
//!
//! Posts, comments and groups use UUID v7: generated without coordination,
//! unique across processes, and sortable by creation time. Feed ordering
//! uses the ID as the tie-breaker when two posts share a `pub_date`.

use uuid::Uuid;

/// Generate a new time-ordered ID.
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_id();
        let id2 = generate_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let ids: Vec<Uuid> = (0..100).map(|_| generate_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        // Hyphenated text form sorts the same way; the store orders by it.
        let text: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        assert!(text.windows(2).all(|w| w[0] < w[1]));
    }
}
