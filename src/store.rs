use ahash::AHashMap;
use itertools::Itertools;

/// Name-keyed store of owned values.
///
/// Values move in whole on insert; a replaced value is handed back to the
/// caller, and everything still stored is dropped with the registry.
#[derive(Clone, Debug)]
pub struct Registry<V> {
    data: AHashMap<String, V>,
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self { data: AHashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.data.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.data.get_mut(name)
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.data.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.data.remove(name)
    }

    /// Stored names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|s| s.as_str()).sorted()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}
