use std::sync::LazyLock;

use regex::Regex;

use crate::{TagloomResult, ast::Node, output::Output, template::Renderer};

use super::{Tag, TagEnv};

static BLOCK_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_]+$").expect("block name pattern is valid"));

/// `{% block name %}...{% endblock %}`: a named region that templates further
/// down an inheritance chain may replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
}

impl Block {
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        let name = params.trim();
        if !BLOCK_NAME_REGEX.is_match(name) {
            return Err(env.invalid_params("block", params));
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::Block)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn render(&self, children: &[Node], renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        match renderer.block_override(&self.name) {
            Some(body) => renderer.render_nodes(&body),
            None => renderer.render_nodes(children),
        }
    }
}
