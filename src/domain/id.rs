//! Sequential task ID minting
//!
//! IDs use the format `TASK-{counter:04}`, zero-padded to four digits.
//! The counter is owned by the store and never reused.

/// Prefix for all task identifiers
pub const ID_PREFIX: &str = "TASK";

/// Format a counter value as a task ID
pub fn format_id(counter: u64) -> String {
    format!("{}-{:04}", ID_PREFIX, counter)
}

/// Recover the counter value from a task ID
///
/// Returns None for IDs that were not minted by [`format_id`].
pub fn parse_counter(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX)?.strip_prefix('-')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_zero_padded() {
        assert_eq!(format_id(1), "TASK-0001");
        assert_eq!(format_id(42), "TASK-0042");
        assert_eq!(format_id(9999), "TASK-9999");
    }

    #[test]
    fn test_format_id_grows_past_padding() {
        assert_eq!(format_id(10000), "TASK-10000");
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("TASK-0001"), Some(1));
        assert_eq!(parse_counter("TASK-10000"), Some(10000));
    }

    #[test]
    fn test_parse_counter_rejects_foreign_ids() {
        assert_eq!(parse_counter("JOB-0001"), None);
        assert_eq!(parse_counter("TASK-abc"), None);
        assert_eq!(parse_counter("TASK0001"), None);
        assert_eq!(parse_counter(""), None);
    }

    #[test]
    fn test_round_trip() {
        for counter in [1, 7, 100, 12345] {
            assert_eq!(parse_counter(&format_id(counter)), Some(counter));
        }
    }
}
