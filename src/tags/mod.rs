//! The directive tags: `block`, `extends`, `include`, `for`, `if` and `else`.
//!
//! Every tag goes through the same steps. The tree builder looks its name up
//! in the registry ([`lookup_tag`]) and constructs it from the raw parameter
//! text and its placement ([`TagEnv`]); construction validates the parameters
//! against the tag's grammar. Block-style tags are then compiled once all
//! their children are attached. Finally the tag renders once per pass, and
//! unless it overrides that step, rendering concatenates its children.

mod block;
mod conditional;
mod extends;
mod for_loop;
mod include;
mod target;

pub use block::Block;
pub use conditional::{Condition, Else, If, Operand, Operator};
pub use extends::Extends;
pub use for_loop::ForLoop;
pub use include::Include;
pub use target::Target;

use crate::{
    TagloomResult,
    ast::Node,
    engine::Engine,
    error::{SyntaxErrorKind, TagloomError},
    output::Output,
    template::{Renderer, Template},
};

/// A constructed tag.
#[derive(Debug)]
pub enum Tag {
    Block(Block),
    Extends(Extends),
    Include(Include),
    For(ForLoop),
    If(If),
    Else(Else),
}

impl Tag {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Block(_) => "block",
            Self::Extends(_) => "extends",
            Self::Include(_) => "include",
            Self::For(_) => "for",
            Self::If(_) => "if",
            Self::Else(_) => "else",
        }
    }

    /// Runs once all children are attached.
    pub(crate) fn compile(&mut self, children: &[Node], template: &str) -> TagloomResult<()> {
        match self {
            Self::If(tag) => tag.compile(children, template),
            Self::Block(_) | Self::Extends(_) | Self::Include(_) | Self::For(_) | Self::Else(_) => {
                Ok(())
            }
        }
    }

    pub(crate) fn render(&self, children: &[Node], renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        match self {
            Self::Block(tag) => tag.render(children, renderer),
            Self::Extends(tag) => tag.render(renderer),
            Self::Include(tag) => tag.render(renderer),
            Self::For(tag) => tag.render(children, renderer),
            Self::If(tag) => tag.render(children, renderer),
            // Branch delimiter only; `if` never renders it.
            Self::Else(_) => Ok(Output::new()),
        }
    }
}

/// Where a tag is being constructed, and access to the engine for tags that
/// load other templates at construction time.
pub struct TagEnv<'a> {
    engine: &'a Engine,
    chain: &'a [String],
    parent: Option<&'static str>,
    preceding_siblings: usize,
}

impl<'a> TagEnv<'a> {
    pub(crate) const fn new(
        engine: &'a Engine,
        chain: &'a [String],
        parent: Option<&'static str>,
        preceding_siblings: usize,
    ) -> Self {
        Self {
            engine,
            chain,
            parent,
            preceding_siblings,
        }
    }

    /// Path of the template that owns the tag.
    pub fn template(&self) -> &'a str {
        self.chain.last().map_or("", String::as_str)
    }

    /// Name of the enclosing tag, or `None` at the template root.
    pub const fn parent(&self) -> Option<&'static str> {
        self.parent
    }

    /// How many nodes the parent already holds.
    pub const fn preceding_siblings(&self) -> usize {
        self.preceding_siblings
    }

    pub(crate) fn load_template(&self, path: &str) -> TagloomResult<Template> {
        Template::load_within(path, self.engine, self.chain)
    }

    pub(crate) fn syntax_error(&self, kind: SyntaxErrorKind) -> TagloomError {
        TagloomError::syntax(self.template(), kind)
    }

    pub(crate) fn invalid_params(&self, tag: &str, params: &str) -> TagloomError {
        self.syntax_error(SyntaxErrorKind::InvalidParams {
            tag: tag.to_owned(),
            params: params.to_owned(),
        })
    }
}

/// Registry entry for a tag name.
pub struct TagSpec {
    pub name: &'static str,
    /// Whether the tag encloses children up to a matching closing marker.
    pub expects_closing: bool,
    construct: fn(&str, &TagEnv<'_>) -> TagloomResult<Tag>,
}

impl TagSpec {
    /// Constructs the tag from its raw parameter text.
    pub fn construct(&self, params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        (self.construct)(params, env)
    }
}

impl std::fmt::Debug for TagSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagSpec")
            .field("name", &self.name)
            .field("expects_closing", &self.expects_closing)
            .finish_non_exhaustive()
    }
}

static REGISTRY: [TagSpec; 6] = [
    TagSpec {
        name: "block",
        expects_closing: true,
        construct: Block::construct,
    },
    TagSpec {
        name: "extends",
        expects_closing: false,
        construct: Extends::construct,
    },
    TagSpec {
        name: "include",
        expects_closing: false,
        construct: Include::construct,
    },
    TagSpec {
        name: "for",
        expects_closing: true,
        construct: ForLoop::construct,
    },
    TagSpec {
        name: "if",
        expects_closing: true,
        construct: If::construct,
    },
    TagSpec {
        name: "else",
        expects_closing: false,
        construct: Else::construct,
    },
];

pub fn lookup_tag(name: &str) -> Option<&'static TagSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}

/// Every registered tag.
pub fn registered_tags() -> &'static [TagSpec] {
    &REGISTRY
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Context, Engine, InMemoryLoader, Source, TagloomResult, Template};

    pub(crate) fn engine_with(templates: Vec<(&str, Source)>) -> Engine {
        Engine::new(templates.into_iter().collect::<InMemoryLoader>())
    }

    /// Builds `source` as a template named `test.html` and renders it,
    /// running deferred work.
    pub(crate) fn render(engine: &Engine, source: Source, context: &Context) -> TagloomResult<String> {
        let template = Template::from_source("test.html", source, engine)?;
        engine
            .render_template(&template, context)
            .map(|output| output.to_string())
    }

    pub(crate) fn build(source: Source) -> TagloomResult<Template> {
        let engine = engine_with(vec![]);
        Template::from_source("test.html", source, &engine)
    }
}
