use std::collections::HashMap;

/// A HashMap keyed by project paths, compared case-insensitively. Keys are
/// lower-cased and separator-normalized on the way in and on lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerCaseHashMap<V> {
    inner: HashMap<String, V>,
}

fn normalize_key(key: &str) -> String {
    key.replace('\\', "/").to_lowercase()
}

impl<V> LowerCaseHashMap<V> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert a value, replacing any entry whose key differs only by case
    pub fn insert<K: AsRef<str>>(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(normalize_key(key.as_ref()), value)
    }

    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<&V> {
        self.inner.get(&normalize_key(key.as_ref()))
    }

    pub fn remove<K: AsRef<str>>(&mut self, key: K) -> Option<V> {
        self.inner.remove(&normalize_key(key.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<V> Default for LowerCaseHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for LowerCaseHashMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
