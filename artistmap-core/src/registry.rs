use crate::artist::Entity;
use std::collections::HashMap;

/// Deduplicated store of entities, kept in first-seen order.
///
/// The first registration of an id wins; later registrations of the same
/// id are ignored, whatever their other fields hold.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    index: HashMap<String, usize>,
    entries: Vec<T>,
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Returns `true` if the entity was inserted, `false` if its id was
    /// already known.
    pub fn register(&mut self, entity: T) -> bool {
        if self.index.contains_key(entity.id()) {
            return false;
        }
        self.index.insert(entity.id().to_string(), self.entries.len());
        self.entries.push(entity);
        true
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Entity> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
