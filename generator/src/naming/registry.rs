use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{Error, ErrorKind, Result};

/// Identifies a local naming scope, one per class model.
pub type ScopeId = usize;

/// The names claimed during one generation run.
///
/// The global scope holds imported symbols, class names and table variable names. Each class
/// model has a local scope holding its attribute names.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    global: BTreeSet<String>,
    locals: BTreeMap<ScopeId, BTreeSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a global name as is, whether or not it is already taken.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.global.insert(name.into());
    }

    /// Claim the first free variant of `candidate` in the global scope.
    pub fn claim_global(&mut self, candidate: &str) -> Result<String> {
        let name = find_free_name(candidate, &self.global, &BTreeSet::new())?;
        self.global.insert(name.clone());
        Ok(name)
    }

    /// Claim the first free variant of `candidate` in `scope`, avoiding global names too.
    pub fn claim_local(&mut self, scope: ScopeId, candidate: &str) -> Result<String> {
        let local = self.locals.entry(scope).or_default();
        let name = find_free_name(candidate, &self.global, local)?;
        local.insert(name.clone());
        Ok(name)
    }

    pub fn global_names(&self) -> &BTreeSet<String> {
        &self.global
    }

    pub fn local_names(&self, scope: ScopeId) -> Option<&BTreeSet<String>> {
        self.locals.get(&scope)
    }
}

/// Return `candidate`, or the first of `candidate1`, `candidate2`, ... claimed in neither set.
pub fn find_free_name(
    candidate: &str,
    global: &BTreeSet<String>,
    local: &BTreeSet<String>,
) -> Result<String> {
    if candidate.is_empty() {
        return Err(Error::new(ErrorKind::EmptyIdentifier {
            context: "name allocation".to_string(),
        }));
    }
    let is_taken = |name: &str| global.contains(name) || local.contains(name);
    let mut name = candidate.to_string();
    let mut counter = 1;
    while is_taken(&name) {
        name = format!("{candidate}{counter}");
        counter += 1;
    }
    Ok(name)
}
