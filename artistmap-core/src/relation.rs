//! Many-to-many relations between source ids and target tokens.

use std::collections::{HashMap, HashSet};

/// Set of strings that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a value is inserted.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string());
        self.items.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl<S: AsRef<str>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for OrderedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value.as_ref());
        }
    }
}

/// Accumulates `source -> {token, ...}` links.
///
/// Sources are remembered in the order they were first linked, which is the
/// row order of any pivot built from the accumulator. Linking a pair twice
/// is accepted and has no further effect.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    sources: OrderedSet,
    links: HashMap<String, OrderedSet>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `token` to `source` and records the token in `discovered`,
    /// the column universe shared by every accumulator feeding it.
    ///
    /// Returns `true` if the token had never been discovered before.
    pub fn link(&mut self, source: &str, token: &str, discovered: &mut OrderedSet) -> bool {
        self.sources.insert(source);
        self.links
            .entry(source.to_string())
            .or_default()
            .insert(token);
        discovered.insert(token)
    }

    pub fn has_link(&self, source: &str, token: &str) -> bool {
        self.links
            .get(source)
            .is_some_and(|targets| targets.contains(token))
    }

    pub fn sources(&self) -> &[String] {
        self.sources.as_slice()
    }

    pub fn targets(&self, source: &str) -> &[String] {
        self.links
            .get(source)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of distinct `(source, token)` pairs.
    pub fn link_count(&self) -> usize {
        self.links.values().map(OrderedSet::len).sum()
    }
}
