use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::domain::utils::id::Id;
use crate::error::{Error, Result};

/// An entity that can be stored in a [`Registry`].
pub trait Identifiable {
    type Tag: Ord + Copy + Debug;

    /// Entity name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Id<Self::Tag>;
}

/// Run-scoped store mapping ids to live entities.
///
/// Iteration follows id order so every scan (and every aggregate computed from one)
/// is deterministic.
#[derive(Debug)]
pub struct Registry<T: Identifiable> {
    items: BTreeMap<Id<T::Tag>, T>,
}

impl<T: Identifiable> Default for Registry<T> {
    fn default() -> Self {
        Self { items: BTreeMap::new() }
    }
}

impl<T: Identifiable> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, item: T) -> Result<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(Error::DuplicateEntity { kind: T::KIND, id: id.value() });
        }
        self.items.insert(id, item);
        Ok(())
    }

    /// Unknown ids are a bookkeeping bug, never silently skipped.
    pub fn lookup(&self, id: Id<T::Tag>) -> Result<&T> {
        self.items.get(&id).ok_or(Error::UnknownEntity { kind: T::KIND, id: id.value() })
    }

    pub fn lookup_mut(&mut self, id: Id<T::Tag>) -> Result<&mut T> {
        self.items.get_mut(&id).ok_or(Error::UnknownEntity { kind: T::KIND, id: id.value() })
    }

    pub fn contains(&self, id: Id<T::Tag>) -> bool {
        self.items.contains_key(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id<T::Tag>> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::utils::id::{VmId, VmTag};

    #[derive(Debug)]
    struct Probe {
        id: VmId,
    }

    impl Identifiable for Probe {
        type Tag = VmTag;
        const KIND: &'static str = "probe";

        fn id(&self) -> VmId {
            self.id
        }
    }

    #[test]
    fn lookup_of_unknown_id_is_an_error() {
        let mut registry = Registry::new();
        registry.register(Probe { id: VmId::new(1) }).unwrap();

        assert!(registry.lookup(VmId::new(1)).is_ok());
        assert!(matches!(registry.lookup(VmId::new(2)), Err(Error::UnknownEntity { kind: "probe", id: 2 })));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        registry.register(Probe { id: VmId::new(1) }).unwrap();
        assert!(matches!(registry.register(Probe { id: VmId::new(1) }), Err(Error::DuplicateEntity { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn iteration_follows_id_order() {
        let mut registry = Registry::new();
        for id in [5, 1, 3] {
            registry.register(Probe { id: VmId::new(id) }).unwrap();
        }
        let ids: Vec<u32> = registry.ids().map(|id| id.value()).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
