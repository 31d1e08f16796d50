//! Adjacency grouping and the reduce pass.
//!
//! [`Groups`] walks a [`SortedRecords`] once and yields a [`Group`] for every
//! maximal run of adjacent records whose keys are string-equal.
//! [`group_reduce`] feeds each group to a [`Reducer`] and collects one result
//! record per group, in sorted order.
//!
//! Grouping never looks further than the next record. With a policy that lets
//! distinct keys tie (e.g. [`NumericKeyOrder`](crate::ordering::NumericKeyOrder)
//! for non-numeric keys), interleaved ties produce several groups for the same
//! key.

use crate::ordering::{KeyOrder, SortedRecords};
use crate::record::{Group, KeyValue};
use crate::reducers::Reducer;
use std::iter::Peekable;
use std::slice;

/// Iterator adapter over adjacent equal-key runs.
pub struct Groups<'a> {
    it: Peekable<slice::Iter<'a, KeyValue>>,
}

impl<'a> Groups<'a> {
    pub fn new<O: KeyOrder + ?Sized>(sorted: &'a SortedRecords<'_, O>) -> Self {
        Self {
            it: sorted.as_slice().iter().peekable(),
        }
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = Group<'a>;

    fn next(&mut self) -> Option<Group<'a>> {
        let first = self.it.next()?;
        let key = first.key.as_str();
        let mut values = vec![first.value.as_str()];
        while let Some(kv) = self.it.next_if(|kv| kv.key == key) {
            values.push(kv.value.as_str());
        }
        Some(Group { key, values })
    }
}

/// Reduce every group of `sorted` with `reducer`.
///
/// `reducer` is called exactly once per group, in order, on the calling
/// thread. A panic in `reducer` propagates to the caller.
pub fn group_reduce<O, R>(sorted: &SortedRecords<'_, O>, reducer: &R) -> Vec<KeyValue>
where
    O: KeyOrder + ?Sized,
    R: Reducer + ?Sized,
{
    Groups::new(sorted)
        .map(|g| KeyValue::new(g.key, reducer.reduce(g.key, &g.values)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::{LexicographicKeyOrder, NumericKeyOrder};
    use crate::reducers::{Count, Join};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn kv(k: &str, v: &str) -> KeyValue {
        KeyValue::new(k, v)
    }

    #[test]
    fn groups_adjacent_runs() {
        let sorted = SortedRecords::sort(
            vec![kv("2", "x"), kv("1", "a"), kv("2", "y"), kv("1", "b"), kv("3", "z")],
            &NumericKeyOrder,
        );
        let groups: Vec<_> = Groups::new(&sorted)
            .map(|g| (g.key, g.values.len()))
            .collect();
        assert_eq!(groups, vec![("1", 2), ("2", 2), ("3", 1)]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let sorted = SortedRecords::sort(vec![], &NumericKeyOrder);
        assert_eq!(Groups::new(&sorted).count(), 0);
        assert!(group_reduce(&sorted, &Count).is_empty());
    }

    #[test]
    fn reducer_called_once_per_group() {
        let calls = AtomicUsize::new(0);
        let sorted = SortedRecords::sort(
            vec![kv("5", "a"), kv("5", "b"), kv("7", "c"), kv("5", "d")],
            &NumericKeyOrder,
        );
        let out = group_reduce(&sorted, &|_: &str, v: &[&str]| {
            calls.fetch_add(1, Ordering::SeqCst);
            v.len().to_string()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(out, vec![kv("5", "3"), kv("7", "1")]);
    }

    #[test]
    fn empty_string_key_is_a_real_group() {
        let sorted = SortedRecords::sort(vec![kv("", "a"), kv("", "b")], &LexicographicKeyOrder);
        assert_eq!(group_reduce(&sorted, &Join::default()), vec![kv("", "a,b")]);
    }

    #[test]
    fn tied_distinct_keys_never_merge() {
        // "a" and "b" both compare as 0 numerically; whatever order the sort
        // leaves them in, values of different keys must not share a group.
        let sorted = SortedRecords::sort(
            vec![kv("a", "1"), kv("b", "2"), kv("a", "3"), kv("b", "4")],
            &NumericKeyOrder,
        );
        for g in Groups::new(&sorted) {
            let expected: &[&str] = if g.key == "a" { &["1", "3"] } else { &["2", "4"] };
            assert!(g.values.iter().all(|v| expected.contains(v)), "{g:?}");
        }
    }
}
