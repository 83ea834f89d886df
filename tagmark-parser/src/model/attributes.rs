/// Attributes of a node, in the order they were first written.
///
/// Keys are stored lowercased and looked up case-insensitively. Writing an
/// existing key replaces its value but keeps its original position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        let key = key.to_lowercase();
        self.0.iter().position(|(k, _)| *k == key)
    }

    /// Get the value for `key`, ignoring case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set `key` to `value`. Returns the previous value, if any.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        if let Some((_, existing)) = self.position(key).and_then(|index| self.0.get_mut(index)) {
            return Some(std::mem::replace(existing, value));
        }
        self.0.push((key.to_lowercase(), value));
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.position(key)?;
        Some(self.0.remove(index).1)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (key, value) in iter {
            attributes.insert(key.as_ref(), value);
        }
        attributes
    }
}
