use std::collections::HashMap;

use crate::source::Source;

/// Supplies templates by name.
pub trait TemplateLoader {
    /// Returns the lexed source of the named template, if it exists.
    fn load(&self, name: &str) -> Option<Source>;
}

impl<F> TemplateLoader for F
where
    F: Fn(&str) -> Option<Source>,
{
    fn load(&self, name: &str) -> Option<Source> {
        self(name)
    }
}

/// A simple in-memory template loader
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone)]
pub struct InMemoryLoader {
    templates: HashMap<String, Source>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn add<N: Into<String>>(&mut self, name: N, source: Source) -> &mut Self {
        self.templates.insert(name.into(), source);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl TemplateLoader for InMemoryLoader {
    fn load(&self, name: &str) -> Option<Source> {
        self.templates.get(name).cloned()
    }
}

impl<N: Into<String>> FromIterator<(N, Source)> for InMemoryLoader {
    fn from_iter<I: IntoIterator<Item = (N, Source)>>(iter: I) -> Self {
        let mut loader = Self::new();
        for (name, source) in iter {
            loader.add(name, source);
        }
        loader
    }
}
