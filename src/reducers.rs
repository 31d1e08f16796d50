//! The aggregation function seam and built-in reducers.
//!
//! A [`Reducer`] maps one key and all of its values to a single output value.
//! It is invoked exactly once per group, synchronously, and must behave as a
//! pure function of its arguments. Any `Fn(&str, &[&str]) -> String` closure
//! is a reducer:
//!
//! ```
//! use ironreduce::reducers::Reducer;
//!
//! let longest = |_key: &str, values: &[&str]| {
//!     values.iter().max_by_key(|v| v.len()).copied().unwrap_or_default().to_string()
//! };
//! assert_eq!(longest.reduce("k", &["a", "abc", "ab"]), "abc");
//! ```
//!
//! Built-ins:
//!
//! - [`Count`] -- number of values.
//! - [`Join`] -- values joined with a separator, in group order.
//! - [`SumI64`] -- sum of the values parsed as `i64` (unparseable values count as 0).
//! - [`DistinctJoin`] -- sorted, de-duplicated values joined with a separator.
//! - [`Indexer`] -- `"<count> <sorted values joined by ','>"`.

use std::collections::BTreeSet;

/// Caller-supplied aggregation function.
pub trait Reducer: Send + Sync {
    fn reduce(&self, key: &str, values: &[&str]) -> String;
}

impl<F> Reducer for F
where
    F: Fn(&str, &[&str]) -> String + Send + Sync,
{
    fn reduce(&self, key: &str, values: &[&str]) -> String {
        self(key, values)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl Reducer for Count {
    fn reduce(&self, _key: &str, values: &[&str]) -> String {
        values.len().to_string()
    }
}

#[derive(Clone, Debug)]
pub struct Join {
    pub separator: String,
}

impl Join {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for Join {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Reducer for Join {
    fn reduce(&self, _key: &str, values: &[&str]) -> String {
        values.join(&self.separator)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SumI64;

impl Reducer for SumI64 {
    fn reduce(&self, _key: &str, values: &[&str]) -> String {
        values
            .iter()
            .map(|v| v.trim().parse::<i64>().unwrap_or(0))
            .fold(0i64, i64::wrapping_add)
            .to_string()
    }
}

#[derive(Clone, Debug)]
pub struct DistinctJoin {
    pub separator: String,
}

impl DistinctJoin {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for DistinctJoin {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Reducer for DistinctJoin {
    fn reduce(&self, _key: &str, values: &[&str]) -> String {
        let set: BTreeSet<&str> = values.iter().copied().collect();
        set.into_iter().collect::<Vec<_>>().join(&self.separator)
    }
}

/// Inverted-index style output: how many values, then the sorted values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indexer;

impl Reducer for Indexer {
    fn reduce(&self, _key: &str, values: &[&str]) -> String {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        format!("{} {}", sorted.len(), sorted.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_counts() {
        assert_eq!(Count.reduce("k", &["1", "1", "1"]), "3");
        assert_eq!(Count.reduce("k", &[]), "0");
    }

    #[test]
    fn join_keeps_group_order() {
        assert_eq!(Join::default().reduce("k", &["b", "a", "c"]), "b,a,c");
        assert_eq!(Join::new(" ").reduce("k", &["x", "y"]), "x y");
    }

    #[test]
    fn sum_ignores_garbage() {
        assert_eq!(SumI64.reduce("k", &["1", "2", " 3 ", "x", "-4"]), "2");
    }

    #[test]
    fn distinct_join_sorts_and_dedups() {
        assert_eq!(DistinctJoin::default().reduce("k", &["b", "a", "b"]), "a,b");
    }

    #[test]
    fn indexer_formats_like_an_index() {
        assert_eq!(
            Indexer.reduce("word", &["file2", "file1"]),
            "2 file1,file2"
        );
    }

    #[test]
    fn closures_are_reducers() {
        let first = |_: &str, v: &[&str]| v.first().copied().unwrap_or("").to_string();
        assert_eq!(first.reduce("k", &["z", "y"]), "z");
    }
}
