//! Dotted-triple version comparison.
//!
//! Versions are compared as `major.minor.patch` integer triples. A component
//! that is missing or non-numeric orders as neither greater nor less, so the
//! comparison falls through to the next component. That quirk is load-bearing:
//! callers cannot distinguish "not greater" from "unparseable", and the update
//! check relies on an unparseable published version reading as "no update".

/// Whether version `a` is strictly greater than version `b`.
///
/// Compares major, then minor, then patch, deciding at the first strict
/// difference. Equal triples are not greater. Components beyond the third are
/// ignored.
#[must_use]
pub fn is_greater(a: &str, b: &str) -> bool {
    for (left, right) in components(a).into_iter().zip(components(b)) {
        if let (Some(left), Some(right)) = (left, right) {
            if left > right {
                return true;
            }
            if left < right {
                return false;
            }
        }
    }
    false
}

/// First three dot-separated components, each parsed as an integer.
fn components(version: &str) -> [Option<u64>; 3] {
    let mut parts = version.split('.');
    std::array::from_fn(|_| parts.next().and_then(|part| part.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("2.0.0", "1.9.9", true)]
    #[case("1.9.9", "2.0.0", false)]
    #[case("1.2.3", "1.2.3", false)]
    #[case("1.10.0", "1.2.0", true)]
    #[case("1.2.0", "1.10.0", false)]
    #[case("0.1.1", "0.1.0", true)]
    #[case("0.1.0", "0.1.1", false)]
    fn test_is_greater(#[case] a: &str, #[case] b: &str, #[case] want: bool) {
        assert_eq!(is_greater(a, b), want);
    }

    #[rstest]
    #[case("not-a-version", "1.0.0")]
    #[case("1.0.0", "not-a-version")]
    #[case("", "0.0.0")]
    #[case("1.2", "1.2.0")]
    fn test_unparseable_is_never_greater(#[case] a: &str, #[case] b: &str) {
        assert!(!is_greater(a, b));
    }

    #[test]
    fn test_unparseable_component_falls_through() {
        // The bad major component decides nothing; minor does.
        assert!(is_greater("x.2.0", "1.1.0"));
        assert!(!is_greater("x.1.0", "1.2.0"));
    }

    #[test]
    fn test_extra_components_ignored() {
        assert!(!is_greater("1.2.3.9", "1.2.3"));
        assert!(is_greater("1.2.4.0", "1.2.3"));
    }

    proptest! {
        #[test]
        fn prop_matches_tuple_order(
            a in [0u64..100, 0u64..100, 0u64..100],
            b in [0u64..100, 0u64..100, 0u64..100],
        ) {
            let left = format!("{}.{}.{}", a[0], a[1], a[2]);
            let right = format!("{}.{}.{}", b[0], b[1], b[2]);
            prop_assert_eq!(is_greater(&left, &right), a > b);
        }

        #[test]
        fn prop_never_greater_than_self(v in [0u64..1000, 0u64..1000, 0u64..1000]) {
            let version = format!("{}.{}.{}", v[0], v[1], v[2]);
            prop_assert!(!is_greater(&version, &version));
        }
    }
}
