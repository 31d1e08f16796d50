//! Key ordering policies and the sorted-collection contract.
//!
//! Grouping only merges *adjacent* records with equal keys, so the policy used
//! to sort decides which records end up in one group. The policy is an
//! explicit value ([`KeyOrder`]) and the grouper only accepts a
//! [`SortedRecords`], which can only be produced by sorting with a policy.
//!
//! Built-in policies:
//!
//! - [`NumericKeyOrder`] -- compares keys as base-10 integers; keys that do not
//!   parse compare as `0`, integers outside the `i64` range saturate. All
//!   non-numeric keys (and `"0"`) therefore tie, and ties are left in
//!   unspecified order.
//! - [`LexicographicKeyOrder`] -- byte-wise string order.
//! - [`NumericThenLexicographic`] -- numeric first, string order on ties. This
//!   is a total order in which only identical keys compare equal.

use crate::error::ReduceError;
use crate::record::KeyValue;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::num::IntErrorKind;
use std::str::FromStr;

/// A comparison policy over record keys.
pub trait KeyOrder: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// Numeric interpretation of a key: base-10 `i64`, or `0` if it doesn't parse.
///
/// Well-formed integers out of range clamp to `i64::MIN`/`i64::MAX`.
#[inline]
#[must_use]
pub fn numeric_key(key: &str) -> i64 {
    match key.parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumericKeyOrder;

impl KeyOrder for NumericKeyOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        numeric_key(a).cmp(&numeric_key(b))
    }

    fn name(&self) -> &'static str {
        "numeric"
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LexicographicKeyOrder;

impl KeyOrder for LexicographicKeyOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &'static str {
        "lexicographic"
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumericThenLexicographic;

impl KeyOrder for NumericThenLexicographic {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        numeric_key(a)
            .cmp(&numeric_key(b))
            .then_with(|| a.cmp(b))
    }

    fn name(&self) -> &'static str {
        "numeric-then-lexicographic"
    }
}

/// Selects one of the built-in policies, e.g. from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyOrderKind {
    #[default]
    Numeric,
    Lexicographic,
    NumericThenLexicographic,
}

impl KeyOrderKind {
    /// The policy object for this kind.
    #[must_use]
    pub fn policy(self) -> &'static dyn KeyOrder {
        match self {
            Self::Numeric => &NumericKeyOrder,
            Self::Lexicographic => &LexicographicKeyOrder,
            Self::NumericThenLexicographic => &NumericThenLexicographic,
        }
    }
}

impl FromStr for KeyOrderKind {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "lexicographic" | "lex" => Ok(Self::Lexicographic),
            "numeric-then-lexicographic" | "numeric-lex" => Ok(Self::NumericThenLexicographic),
            other => Err(ReduceError::InvalidConfig(format!("unknown key order `{other}`"))),
        }
    }
}

impl fmt::Display for KeyOrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.policy().name())
    }
}

/// Records sorted by a specific [`KeyOrder`].
///
/// The only constructor sorts, so holding a `SortedRecords` means every run of
/// records that the policy considers equal is contiguous.
pub struct SortedRecords<'o, O: KeyOrder + ?Sized> {
    records: Vec<KeyValue>,
    order: PhantomData<&'o O>,
}

impl<'o, O: KeyOrder + ?Sized> SortedRecords<'o, O> {
    /// Sort `records` in place with `order`.
    ///
    /// The sort is unstable: records the policy considers equal end up in an
    /// unspecified, but for identical input always the same, relative order.
    pub fn sort(mut records: Vec<KeyValue>, order: &'o O) -> Self {
        records.sort_unstable_by(|a, b| order.compare(&a.key, &b.key));
        Self {
            records,
            order: PhantomData,
        }
    }

    pub fn as_slice(&self) -> &[KeyValue] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_inner(self) -> Vec<KeyValue> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<'a, O: KeyOrder + ?Sized>(s: &'a SortedRecords<'_, O>) -> Vec<&'a str> {
        s.as_slice().iter().map(|kv| kv.key.as_str()).collect()
    }

    #[test]
    fn numeric_key_parses_signed_integers() {
        assert_eq!(numeric_key("42"), 42);
        assert_eq!(numeric_key("-7"), -7);
        assert_eq!(numeric_key("+3"), 3);
        assert_eq!(numeric_key("abc"), 0);
        assert_eq!(numeric_key(""), 0);
        assert_eq!(numeric_key(" 5"), 0);
        assert_eq!(numeric_key("1-2"), 0);
    }

    #[test]
    fn out_of_range_integers_saturate() {
        assert_eq!(numeric_key("99999999999999999999"), i64::MAX);
        assert_eq!(numeric_key("-99999999999999999999"), i64::MIN);
        assert_eq!(numeric_key("9223372036854775807"), i64::MAX);

        let big = "99999999999999999999";
        let recs = vec![
            KeyValue::new(big, "a"),
            KeyValue::new("5", "b"),
            KeyValue::new("-99999999999999999999", "c"),
            KeyValue::new("abc", "d"),
        ];
        let sorted = SortedRecords::sort(recs, &NumericKeyOrder);
        assert_eq!(keys(&sorted), vec!["-99999999999999999999", "abc", "5", big]);
    }

    #[test]
    fn numeric_order_is_not_lexicographic() {
        let recs = vec![
            KeyValue::new("10", "a"),
            KeyValue::new("9", "b"),
            KeyValue::new("100", "c"),
            KeyValue::new("-1", "d"),
        ];
        let sorted = SortedRecords::sort(recs, &NumericKeyOrder);
        assert_eq!(keys(&sorted), vec!["-1", "9", "10", "100"]);
    }

    #[test]
    fn lexicographic_order_sorts_strings() {
        let recs = vec![
            KeyValue::new("10", "a"),
            KeyValue::new("9", "b"),
            KeyValue::new("apple", "c"),
        ];
        let sorted = SortedRecords::sort(recs, &LexicographicKeyOrder);
        assert_eq!(keys(&sorted), vec!["10", "9", "apple"]);
    }

    #[test]
    fn numeric_then_lexicographic_separates_words() {
        let recs = vec![
            KeyValue::new("b", "1"),
            KeyValue::new("2", "2"),
            KeyValue::new("a", "3"),
            KeyValue::new("b", "4"),
            KeyValue::new("0", "5"),
        ];
        let sorted = SortedRecords::sort(recs, &NumericThenLexicographic);
        assert_eq!(keys(&sorted), vec!["0", "a", "b", "b", "2"]);
    }

    #[test]
    fn kind_parses_and_displays() {
        assert_eq!("numeric".parse::<KeyOrderKind>().unwrap(), KeyOrderKind::Numeric);
        assert_eq!(
            "Lexicographic".parse::<KeyOrderKind>().unwrap(),
            KeyOrderKind::Lexicographic
        );
        assert_eq!(
            KeyOrderKind::NumericThenLexicographic.to_string(),
            "numeric-then-lexicographic"
        );
        assert!("random".parse::<KeyOrderKind>().is_err());
    }

    #[test]
    fn sort_is_repeatable() {
        let recs: Vec<_> = (0..200)
            .map(|i| KeyValue::new(format!("w{}", i % 13), i.to_string()))
            .collect();
        let a = SortedRecords::sort(recs.clone(), &NumericKeyOrder).into_inner();
        let b = SortedRecords::sort(recs, &NumericKeyOrder).into_inner();
        assert_eq!(a, b);
    }
}
