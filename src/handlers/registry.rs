//! Kind-keyed handler registries
//!
//! A registry is an explicit map from a closed kind enumeration to one boxed
//! handler. It is filled once at startup and checked for completeness with
//! [`Registry::validate`] before any game runs.

use crate::core::{ActionKind, CostKind, EffectKind};
use crate::error::HandlerFamily;
use crate::{Result, TabletopError};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

/// A closed enumeration that handlers are keyed by
pub trait HandlerKind: Copy + Eq + Hash + fmt::Debug + 'static {
    const FAMILY: HandlerFamily;

    /// Every variant; each must have a handler bound
    fn all() -> &'static [Self];
}

impl HandlerKind for CostKind {
    const FAMILY: HandlerFamily = HandlerFamily::Cost;

    fn all() -> &'static [Self] {
        &CostKind::ALL
    }
}

impl HandlerKind for ActionKind {
    const FAMILY: HandlerFamily = HandlerFamily::Action;

    fn all() -> &'static [Self] {
        &ActionKind::ALL
    }
}

impl HandlerKind for EffectKind {
    const FAMILY: HandlerFamily = HandlerFamily::Effect;

    fn all() -> &'static [Self] {
        &EffectKind::ALL
    }
}

pub struct Registry<K: HandlerKind, H: ?Sized> {
    handlers: FxHashMap<K, Box<H>>,
}

impl<K: HandlerKind, H: ?Sized> Registry<K, H> {
    pub fn new() -> Self {
        Registry {
            handlers: FxHashMap::default(),
        }
    }

    /// Bind `handler` to `kind`; a kind can only be bound once
    pub fn register(&mut self, kind: K, handler: Box<H>) -> Result<()> {
        match self.handlers.entry(kind) {
            Entry::Occupied(_) => Err(TabletopError::DuplicateHandler {
                family: K::FAMILY,
                kind: format!("{kind:?}"),
            }),
            Entry::Vacant(slot) => {
                slot.insert(handler);
                Ok(())
            }
        }
    }

    pub fn get(&self, kind: K) -> Result<&H> {
        self.handlers
            .get(&kind)
            .map(|handler| &**handler)
            .ok_or_else(|| TabletopError::MissingHandler {
                family: K::FAMILY,
                kind: format!("{kind:?}"),
            })
    }

    pub fn contains(&self, kind: K) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Fails on the first kind (in declaration order) with no handler
    pub fn validate(&self) -> Result<()> {
        match K::all().iter().find(|kind| !self.contains(**kind)) {
            Some(kind) => Err(TabletopError::MissingHandler {
                family: K::FAMILY,
                kind: format!("{kind:?}"),
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<K: HandlerKind, H: ?Sized> Default for Registry<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: HandlerKind, H: ?Sized> fmt::Debug for Registry<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<K> = K::all()
            .iter()
            .copied()
            .filter(|kind| self.contains(*kind))
            .collect();
        f.debug_struct("Registry")
            .field("family", &K::FAMILY)
            .field("bound", &bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named {
        fn name(&self) -> &'static str;
    }

    struct Tap;
    impl Named for Tap {
        fn name(&self) -> &'static str {
            "tap"
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry: Registry<CostKind, dyn Named> = Registry::new();
        registry.register(CostKind::Tap, Box::new(Tap)).unwrap();

        assert_eq!(registry.get(CostKind::Tap).unwrap().name(), "tap");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mut registry: Registry<CostKind, dyn Named> = Registry::new();
        registry.register(CostKind::Tap, Box::new(Tap)).unwrap();

        let err = registry.register(CostKind::Tap, Box::new(Tap)).unwrap_err();
        assert!(matches!(
            err,
            TabletopError::DuplicateHandler {
                family: HandlerFamily::Cost,
                ..
            }
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_handler() {
        let registry: Registry<EffectKind, dyn Named> = Registry::new();
        let err = registry.get(EffectKind::GainLife).err().unwrap();
        assert_eq!(err.to_string(), "No effect handler bound for kind GainLife");
    }

    #[test]
    fn test_validate_reports_first_unbound_kind() {
        let mut registry: Registry<CostKind, dyn Named> = Registry::new();
        registry.register(CostKind::Tap, Box::new(Tap)).unwrap();

        match registry.validate() {
            Err(TabletopError::MissingHandler { kind, .. }) => assert_eq!(kind, "Mana"),
            other => panic!("expected MissingHandler, got {other:?}"),
        }

        registry.register(CostKind::Mana, Box::new(Tap)).unwrap();
        registry.register(CostKind::PayLife, Box::new(Tap)).unwrap();
        assert!(registry.validate().is_ok());
    }
}
