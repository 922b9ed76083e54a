use std::sync::LazyLock;

use regex::Regex;

use crate::{
    TagloomResult,
    ast::Node,
    context::Scope,
    error::{SyntaxErrorKind, TagloomError},
    output::Output,
    template::Renderer,
    value::{Value, parse_number},
};

use super::{Tag, TagEnv};

static FOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<item>\w+)\s*(?:,\s*(?P<index>\w+))?\s+in\s+(?P<path>\w+(?:\.\w+)*)$")
        .expect("for loop pattern is valid")
});

/// `{% for item in path %}` or `{% for item, index in path %}`.
///
/// Arrays bind the element and its position, objects the value and its key,
/// strings each character and its position. Every iteration also sees a
/// `forloop` object with `counter`, `counter0`, `first`, `last` and `length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    item: String,
    index: Option<String>,
    path: String,
}

impl ForLoop {
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        let captures = FOR_REGEX
            .captures(params.trim())
            .ok_or_else(|| env.invalid_params("for", params))?;

        let item = captures.name("item").map_or("", |m| m.as_str());
        let index = captures.name("index").map(|m| m.as_str());
        let path = captures.name("path").map_or("", |m| m.as_str());

        let reserved = |name: &str| parse_number(name).is_some();
        if reserved(item) || index.is_some_and(reserved) || path.split('.').next().is_some_and(reserved) {
            return Err(env.syntax_error(SyntaxErrorKind::ReservedIdentifier {
                params: params.to_owned(),
            }));
        }

        Ok(Self {
            item: item.to_owned(),
            index: index.map(str::to_owned),
            path: path.to_owned(),
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::For)
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Pairs of (item, index) to bind, in iteration order.
    fn entries(&self, iterable: &Value) -> TagloomResult<Vec<(Value, Value)>> {
        match iterable {
            Value::Array(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, item)| (item.clone(), Value::from(i)))
                .collect()),
            Value::Object(map) => Ok(map
                .iter()
                .map(|(key, value)| (value.clone(), Value::from(key.as_str())))
                .collect()),
            Value::String(text) => Ok(text
                .chars()
                .enumerate()
                .map(|(i, c)| (Value::from(c), Value::from(i)))
                .collect()),
            Value::Null | Value::Bool(_) | Value::Number(_) => Err(TagloomError::NotLoopable {
                variable_name: self.path.clone(),
                found: iterable.type_name(),
            }),
        }
    }

    pub(crate) fn render(&self, children: &[Node], renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        let entries = match renderer.context().get_path(&self.path) {
            Some(iterable) if iterable.is_truthy() => self.entries(iterable)?,
            Some(_) | None => return Ok(Output::new()),
        };

        let length = entries.len();
        let mut output = Output::new();
        for (counter0, (item, index)) in entries.into_iter().enumerate() {
            let mut scope = Scope::new();
            scope.insert(self.item.clone(), item);
            if let Some(name) = &self.index {
                scope.insert(name.clone(), index);
            }
            scope.insert(
                "forloop".to_owned(),
                Value::object([
                    ("counter", Value::from(counter0.saturating_add(1))),
                    ("counter0", Value::from(counter0)),
                    ("first", Value::from(counter0 == 0)),
                    ("last", Value::from(counter0.saturating_add(1) == length)),
                    ("length", Value::from(length)),
                ]),
            );

            renderer.context_mut().push(scope);
            let rendered = renderer.render_nodes(children);
            renderer.context_mut().pop();
            output.extend(rendered?);
        }
        Ok(output)
    }
}
