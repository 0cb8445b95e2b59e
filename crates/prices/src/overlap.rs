//! Closed-interval overlap test.

use crate::price::PriceRecord;

/// Returns `true` when the validity intervals of `a` and `b` share at least
/// one instant.
///
/// Bounds are inclusive, so intervals that merely touch at an endpoint
/// overlap. The test is symmetric, and reflexive for well-formed intervals.
pub fn overlaps(a: &PriceRecord, b: &PriceRecord) -> bool {
    a.valid_from() <= b.valid_to() && b.valid_from() <= a.valid_to()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn record(from: &str, to: &str) -> PriceRecord {
        PriceRecord::new(
            "retail",
            "regular",
            "CAD",
            dec!(30),
            DateTime::parse_from_rfc3339(from).unwrap(),
            DateTime::parse_from_rfc3339(to).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        let jan = record("2023-01-01T00:00:00Z", "2023-01-31T23:59:59Z");
        let feb = record("2023-02-01T00:00:00Z", "2023-02-28T23:59:59Z");
        assert!(!overlaps(&jan, &feb));
        assert!(!overlaps(&feb, &jan));
    }

    #[test]
    fn touching_endpoints_overlap() {
        let a = record("2023-01-01T00:00:00Z", "2023-01-10T00:00:00Z");
        let b = record("2023-01-10T00:00:00Z", "2023-01-20T00:00:00Z");
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn containment_overlaps() {
        let outer = record("2023-01-01T00:00:00Z", "2023-03-31T00:00:00Z");
        let inner = record("2023-02-01T00:00:00Z", "2023-02-02T00:00:00Z");
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn record_overlaps_itself() {
        let a = record("2023-01-01T00:00:00Z", "2023-01-31T23:59:59Z");
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn comparison_uses_instants_across_offsets() {
        // 2023-01-10T20:00:00-05:00 is 2023-01-11T01:00:00Z.
        let a = record("2023-01-01T00:00:00Z", "2023-01-11T00:30:00Z");
        let b = record("2023-01-10T20:00:00-05:00", "2023-01-20T00:00:00-05:00");
        assert!(!overlaps(&a, &b));
    }
}
