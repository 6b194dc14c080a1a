use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Declared mutually-exclusive care code groups.
///
/// A group means "at most one of these codes may be billed for the same
/// patient on the same day". The relation is symmetric and many-to-many:
/// a code may belong to several groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusivityRules {
    groups: Vec<BTreeSet<String>>,
    adjacency: HashMap<String, BTreeSet<String>>,
}

impl ExclusivityRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exclusivity group. Groups with fewer than two distinct
    /// codes declare nothing and are dropped.
    pub fn add_group(&mut self, codes: impl IntoIterator<Item = impl Into<String>>) {
        let group: BTreeSet<String> = codes.into_iter().map(Into::into).collect();
        if group.len() < 2 {
            return;
        }
        for code in &group {
            let neighbors = self.adjacency.entry(code.clone()).or_default();
            neighbors.extend(group.iter().filter(|c| *c != code).cloned());
        }
        self.groups.push(group);
    }

    /// Whether the two codes are registered together in any group.
    /// Symmetric; a code never conflicts with itself at this level.
    pub fn conflicts(&self, code_a: &str, code_b: &str) -> bool {
        if code_a == code_b {
            return false;
        }
        self.adjacency
            .get(code_a)
            .is_some_and(|neighbors| neighbors.contains(code_b))
    }

    /// Every already-billed code that conflicts with the candidate, in
    /// input order.
    pub fn find_conflicts<'a>(
        &self,
        candidate: &str,
        already_billed: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        already_billed
            .into_iter()
            .filter(|billed| self.conflicts(candidate, billed))
            .map(String::from)
            .collect()
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
