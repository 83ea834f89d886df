use std::{fmt, sync::Arc};

use rustc_hash::FxHashMap;

use crate::{Error, Tag};

/// Maps tag names and aliases, case-insensitively, to tag implementations.
///
/// Fill it once at startup and share it read-only afterwards.
#[derive(Default, Clone)]
pub struct Registry {
    by_name: FxHashMap<String, Arc<dyn Tag>>,
    tags: Vec<Arc<dyn Tag>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `tags`, stopping at the first invalid entry.
    ///
    /// # Errors
    ///
    /// See [`Registry::register`].
    pub fn with_tags(tags: impl IntoIterator<Item = Arc<dyn Tag>>) -> Result<Self, Error> {
        let mut registry = Self::new();
        for tag in tags {
            registry.register(tag)?;
        }
        Ok(registry)
    }

    /// Register `tag` under its canonical name and all of its aliases.
    ///
    /// Nothing is registered when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTagName`] if a name is empty or contains whitespace,
    ///   `[`, `]`, `=`, `/` or `"`
    /// - [`Error::DuplicateTag`] if a name collides with a registered name, or
    ///   with another name of the same tag
    pub fn register(&mut self, tag: Arc<dyn Tag>) -> Result<(), Error> {
        let definition = tag.definition();
        let mut names: Vec<String> = Vec::with_capacity(definition.aliases.len() + 1);
        for name in definition.names() {
            if !is_valid_name(name) {
                return Err(Error::InvalidTagName(name.to_string()));
            }
            let key = name.to_lowercase();
            if self.by_name.contains_key(&key) || names.contains(&key) {
                return Err(Error::DuplicateTag(name.to_string()));
            }
            names.push(key);
        }

        tracing::trace!(name = definition.name, ?names, "registering tag");
        for key in names {
            self.by_name.insert(key, Arc::clone(&tag));
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Look up a tag by canonical name or alias, ignoring case.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Tag>> {
        self.by_name.get(&name.to_lowercase())
    }

    /// Registered tags, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tag>> {
        self.tags.iter()
    }

    /// Number of registered tags (aliases not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Arc<dyn Tag>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Tag>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tags.iter().map(|tag| tag.definition().name))
            .finish()
    }
}

pub(crate) fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '[' | ']' | '=' | '/' | '"')
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}
