//! Configuration for reduce invocations.
//!
//! [`ReduceConfig`] holds the settings that are not part of the invocation
//! contract itself: where intermediate files live and which key order to
//! group by. It can be built in code or read from the environment:
//!
//! | Variable                | Field       | Default   |
//! |-------------------------|-------------|-----------|
//! | `IRONREDUCE_INPUT_DIR`  | `input_dir` | `.`       |
//! | `IRONREDUCE_KEY_ORDER`  | `key_order` | `numeric` |

use crate::error::{ReduceError, Result};
use crate::ordering::KeyOrderKind;
use std::path::PathBuf;

pub const ENV_INPUT_DIR: &str = "IRONREDUCE_INPUT_DIR";
pub const ENV_KEY_ORDER: &str = "IRONREDUCE_KEY_ORDER";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Directory holding the intermediate files.
    pub input_dir: PathBuf,
    /// Key order used for sorting and therefore grouping.
    pub key_order: KeyOrderKind,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            key_order: KeyOrderKind::Numeric,
        }
    }
}

impl ReduceConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ReduceError::InvalidConfig`] if a variable is set to a value
    /// that cannot be interpreted.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns [`ReduceError::InvalidConfig`] for an unknown key order or an
    /// empty input directory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(dir) = lookup(ENV_INPUT_DIR) {
            if dir.trim().is_empty() {
                return Err(ReduceError::InvalidConfig(format!("{ENV_INPUT_DIR} is empty")));
            }
            cfg.input_dir = PathBuf::from(dir);
        }
        if let Some(order) = lookup(ENV_KEY_ORDER) {
            cfg.key_order = order.parse()?;
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_key_order(mut self, key_order: KeyOrderKind) -> Self {
        self.key_order = key_order;
        self
    }
}
