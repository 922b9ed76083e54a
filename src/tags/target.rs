use std::sync::LazyLock;

use regex::Regex;

use crate::{
    TagloomResult, context::Context, error::TagloomError, template::Template, value::Value,
};

use super::TagEnv;

/// A quoted template path, or a bare dotted variable path whose value names
/// the template at render time.
static TARGET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:"(?P<double>[A-Za-z0-9_\-/][A-Za-z0-9_\-./]*)"|'(?P<single>[A-Za-z0-9_\-/][A-Za-z0-9_\-./]*)'|(?P<bare>\w+(?:\.\w+)*))$"#,
    )
    .expect("template target pattern is valid")
});

/// The template an `extends` or `include` tag refers to.
#[derive(Debug)]
pub enum Target {
    /// Named by a quoted literal; loaded when the tag is constructed.
    Static(Box<Template>),
    /// Named by a context variable; loaded at render time.
    Lazy(String),
}

impl Target {
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }
}

/// A parsed but not yet loaded [`Target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetRef<'p> {
    Quoted(&'p str),
    Bare(&'p str),
}

impl<'p> TargetRef<'p> {
    /// Returns `None` when the parameters do not match the grammar.
    pub(crate) fn parse(params: &'p str) -> Option<Self> {
        let captures = TARGET_REGEX.captures(params)?;
        if let Some(path) = captures.name("double").or_else(|| captures.name("single")) {
            return Some(Self::Quoted(path.as_str()));
        }
        captures.name("bare").map(|path| Self::Bare(path.as_str()))
    }

    /// Loads a quoted path right away; keeps a bare path for render time.
    pub(crate) fn into_target(self, env: &TagEnv<'_>) -> TagloomResult<Target> {
        match self {
            Self::Quoted(path) => Ok(Target::Static(Box::new(env.load_template(path)?))),
            Self::Bare(path) => Ok(Target::Lazy(path.to_owned())),
        }
    }
}

/// Reads a lazily resolved template path from the context.
pub(crate) fn resolve_filename(context: &Context, path: &str) -> TagloomResult<String> {
    match context.get_path(path) {
        None => Err(TagloomError::MissingVariable {
            variable_name: path.to_owned(),
        }),
        Some(Value::String(filename)) if !filename.is_empty() => Ok(filename.clone()),
        Some(_) => Err(TagloomError::InvalidFilename {
            variable_name: path.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_target_grammar() {
        let matches = |params: &str| TargetRef::parse(params).is_some();
        assert!(matches("\"base.html\""));
        assert!(matches("'partials/nav.html'"));
        assert!(matches("layout.name"));
        assert!(matches("layout"));
        assert_eq!(TargetRef::parse("'a/b.html'"), Some(TargetRef::Quoted("a/b.html")));
        assert_eq!(TargetRef::parse("a.b"), Some(TargetRef::Bare("a.b")));

        assert!(!matches("\"base.html'"));
        assert!(!matches("'.hidden'"));
        assert!(!matches("\"../up.html\""));
        assert!(!matches("base.html extra"));
        assert!(!matches("\"\""));
        assert!(!matches("layout."));
        assert!(!matches(""));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_resolve_filename() {
        let mut context = Context::new();
        context.insert("layout", Value::object([("name", "base.html")]));
        context.insert("count", 3);

        assert_eq!(resolve_filename(&context, "layout.name").unwrap(), "base.html");
        assert_eq!(
            resolve_filename(&context, "layout.other").unwrap_err(),
            TagloomError::MissingVariable {
                variable_name: "layout.other".to_string()
            }
        );
        assert_eq!(
            resolve_filename(&context, "count").unwrap_err(),
            TagloomError::InvalidFilename {
                variable_name: "count".to_string()
            }
        );
    }
}
