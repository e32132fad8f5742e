//! Named, reusable query narrowing functions registered per model type.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use log::warn;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// A scope narrows a relation, optionally using call-site arguments.
pub type ScopeFn<R> = fn(R, &[Value]) -> R;

/// Scope lookup table for one relation type, keyed by scope name as written
/// in the model's directive.
///
/// Registration is expected during program setup, before generated scope
/// methods are called.
pub struct ScopeRegistry<R> {
    scopes: RwLock<BTreeMap<String, ScopeFn<R>>>,
}

impl<R> ScopeRegistry<R> {
    pub const fn new() -> Self {
        Self {
            scopes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register(&self, name: impl Into<String>, scope: ScopeFn<R>) {
        let name = name.into();
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        if scopes.insert(name.clone(), scope).is_some() {
            warn!("argen: scope `{name}` registered twice, keeping the latest");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.scopes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Applies the scope registered under `name` to `relation`.
    pub fn apply(&self, name: &str, relation: R, args: &[Value]) -> RuntimeResult<R> {
        let scope = self
            .scopes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UnknownScope(name.to_string()))?;
        Ok(scope(relation, args))
    }
}

impl<R> Default for ScopeRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    static SCOPES: ScopeRegistry<Vec<String>> = ScopeRegistry::new();

    fn recent(mut r: Vec<String>, args: &[Value]) -> Vec<String> {
        r.push(format!("recent {}", args.len()));
        r
    }

    #[test]
    fn test_apply_registered_scope() {
        SCOPES.register("Recent", recent);
        assert!(SCOPES.contains("Recent"));
        let applied = SCOPES.apply("Recent", vec![], &[Value::Int(1)]).unwrap();
        assert_eq!(applied, vec!["recent 1".to_string()]);
    }

    #[test]
    fn test_unknown_scope() {
        let registry: ScopeRegistry<u8> = ScopeRegistry::new();
        assert_matches!(
            registry.apply("Missing", 0, &[]),
            Err(RuntimeError::UnknownScope(name)) if name == "Missing"
        );
    }

    #[test]
    fn test_names_are_sorted() {
        let registry: ScopeRegistry<u8> = ScopeRegistry::new();
        registry.register("b", |r, _| r);
        registry.register("a", |r, _| r);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
