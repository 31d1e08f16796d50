//! Assertion functions for reduce results.

use crate::record::KeyValue;
use std::collections::HashSet;

/// Assert that every key appears at most once in `results`.
///
/// # Panics
///
/// Panics naming the first repeated key.
///
/// # Example
///
/// ```
/// use ironreduce::testing::{assert_unique_keys, kv};
///
/// assert_unique_keys(&[kv("1", "a"), kv("2", "b")]);
/// ```
pub fn assert_unique_keys(results: &[KeyValue]) {
    let mut seen = HashSet::new();
    for (i, r) in results.iter().enumerate() {
        assert!(
            seen.insert(r.key.as_str()),
            "Duplicate key {:?} at index {i}:\n  Results: {results:?}",
            r.key
        );
    }
}

/// Assert that the value of `key` is `expected` joined by `sep`, in any order.
///
/// # Panics
///
/// Panics if `key` is missing, repeated, or its value splits into a different
/// multiset of parts.
///
/// # Example
///
/// ```
/// use ironreduce::testing::{assert_joined_values, kv};
///
/// let results = vec![kv("1", "c,a,b")];
/// assert_joined_values(&results, "1", ",", &["a", "b", "c"]);
/// ```
pub fn assert_joined_values(results: &[KeyValue], key: &str, sep: &str, expected: &[&str]) {
    let matches: Vec<_> = results.iter().filter(|r| r.key == key).collect();
    assert_eq!(
        matches.len(),
        1,
        "Expected exactly one record for key {key:?}, found {}:\n  Results: {results:?}",
        matches.len()
    );

    let mut actual: Vec<&str> = matches[0].value.split(sep).collect();
    let mut expected = expected.to_vec();
    actual.sort_unstable();
    expected.sort_unstable();
    assert_eq!(
        actual, expected,
        "Value mismatch for key {key:?}:\n  Expected parts: {expected:?}\n  Actual value: {:?}",
        matches[0].value
    );
}

/// Assert that `results` has exactly the keys in `expected`, in that order.
///
/// # Panics
///
/// Panics if the key sequences differ.
pub fn assert_key_order(results: &[KeyValue], expected: &[&str]) {
    let actual: Vec<&str> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(
        actual, expected,
        "Key order mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}
