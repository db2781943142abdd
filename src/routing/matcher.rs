//! Endpoint filename matching.
//!
//! # Responsibilities
//! - Merge the global matcher table with a search path's own table
//! - Map a file's base name to the methods it is configured to handle
//! - Decide whether a conventionally named file is reserved by the table
//!
//! # Design Decisions
//! - Filename comparison is case-insensitive
//! - Keys are lower-cased on merge; the search path wins on collision
//! - Keys that are not HTTP methods are dropped, never an error
//! - Evaluation follows key order so loader calls are deterministic

use std::collections::BTreeMap;

use crate::config::MatcherTable;
use crate::methods;

/// The effective matcher table of one search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matchers {
    /// Lower-cased key → lower-cased target filename.
    keys: BTreeMap<String, String>,
    /// Recognised methods, in key order.
    methods: Vec<(&'static str, String)>,
}

impl Matchers {
    /// Merge `global` with `local`, `local` overriding on key collision.
    pub fn merge(global: &MatcherTable, local: &MatcherTable) -> Self {
        let mut keys = BTreeMap::new();
        for (key, matcher) in global.iter().chain(local.iter()) {
            keys.insert(key.to_lowercase(), matcher.target(key).to_lowercase());
        }

        let methods = keys
            .iter()
            .filter_map(|(key, target)| match methods::canonical(key) {
                Some(method) => Some((method, target.clone())),
                None => {
                    tracing::trace!(key = %key, "Skipping matcher for unknown method");
                    None
                }
            })
            .collect();

        Self { keys, methods }
    }

    /// Methods whose matcher names `stem` (a file name without extension).
    pub fn methods_for(&self, stem: &str) -> Vec<&'static str> {
        let stem = stem.to_lowercase();
        self.methods
            .iter()
            .filter(|(_, target)| *target == stem)
            .map(|(method, _)| *method)
            .collect()
    }

    /// Returns true if `stem` is itself a key of the table, which keeps a file
    /// named after that key from also binding by convention.
    pub fn reserves(&self, stem: &str) -> bool {
        self.keys.contains_key(&stem.to_lowercase())
    }

    /// Method bound to `stem`: matcher hits first, then the conventional
    /// filename when the table does not reserve it.
    pub fn resolve(&self, stem: &str) -> Vec<&'static str> {
        let matched = self.methods_for(stem);
        if !matched.is_empty() || self.reserves(stem) {
            return matched;
        }
        methods::canonical(stem).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
