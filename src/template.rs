use std::{collections::HashMap, rc::Rc};

use log::trace;

use crate::{
    TagloomResult,
    ast::Node,
    builder::build,
    context::Context,
    engine::Engine,
    error::{SyntaxErrorKind, TagloomError},
    output::Output,
    scheduler::Scheduler,
    source::Source,
    tags::{Extends, Tag},
};

/// Block bodies keyed by block name, as passed down an inheritance chain.
pub type Blocks = Rc<HashMap<String, Rc<[Node]>>>;

/// A Template is a built token tree together with the path it was loaded from.
///
/// Templates referenced with a quoted path by `extends` or `include` are
/// loaded and built together with the template that references them.
///
/// # Example
///
/// ```rust
/// use tagloom::{Context, Engine, InMemoryLoader, Source, Template};
///
/// let engine = Engine::new(InMemoryLoader::new());
/// let source = Source::new().text("Hello, ").var("name").text("!");
/// let template = Template::from_source("greeting", source, &engine).unwrap();
///
/// let mut context = Context::new();
/// context.insert("name", "World");
///
/// let output = engine.render_template(&template, &context).unwrap();
/// assert_eq!(output.to_string(), "Hello, World!");
/// ```
#[derive(Debug)]
pub struct Template {
    path: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Loads and builds the named template through the engine's loader.
    ///
    /// # Errors
    ///
    /// * `TagloomError::MissingTemplate` if the loader does not know the name,
    ///   or does not know a template it references with a quoted path
    /// * `TagloomError::Syntax` if the template or one of its statically
    ///   referenced templates is malformed
    pub fn load(path: &str, engine: &Engine) -> TagloomResult<Self> {
        Self::load_within(path, engine, &[])
    }

    /// Builds a template from a source that did not come from the loader.
    pub fn from_source<P: Into<String>>(
        path: P,
        source: Source,
        engine: &Engine,
    ) -> TagloomResult<Self> {
        let path = path.into();
        let nodes = build(source, engine, std::slice::from_ref(&path))?;
        Ok(Self { path, nodes })
    }

    /// Loads `path` on behalf of the templates in `chain`, which are still
    /// being built. A path already in the chain would never finish building.
    pub(crate) fn load_within(path: &str, engine: &Engine, chain: &[String]) -> TagloomResult<Self> {
        let owner = chain.last().map_or(path, String::as_str);
        if chain.iter().any(|loading| loading == path) {
            let mut cycle = chain.to_vec();
            cycle.push(path.to_owned());
            return Err(TagloomError::syntax(
                owner,
                SyntaxErrorKind::CircularTemplate { chain: cycle },
            ));
        }
        let limit = engine.config().max_depth;
        if chain.len() >= limit {
            return Err(TagloomError::DepthExceeded {
                template_name: path.to_owned(),
                limit,
            });
        }

        trace!("loading template '{}'", path);
        let source = engine.source(path)?;
        let mut chain = chain.to_vec();
        chain.push(path.to_owned());
        let nodes = build(source, engine, &chain)?;
        Ok(Self {
            path: path.to_owned(),
            nodes,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The `extends` tag heading this template, if any.
    pub fn extends(&self) -> Option<&Extends> {
        match self.nodes.first().and_then(Node::tag) {
            Some(Tag::Extends(extends)) => Some(extends),
            Some(_) | None => None,
        }
    }

    /// Every block defined in this template, nested blocks included.
    pub fn blocks(&self) -> HashMap<String, Rc<[Node]>> {
        let mut blocks = HashMap::new();
        collect_blocks(&self.nodes, &mut blocks);
        blocks
    }

    /// Renders the template.
    ///
    /// `blocks` carries overrides from templates further down an inheritance
    /// chain. A template that extends another renders nothing of its own
    /// besides its blocks: they are merged under `blocks` and handed to the
    /// parent. Otherwise the whole tree renders, with `block` tags taking
    /// their bodies from `blocks` where an override exists.
    pub fn render(&self, renderer: &mut Renderer<'_>, blocks: Option<&Blocks>) -> TagloomResult<Output> {
        if let Some(extends) = self.extends() {
            let mut merged = self.blocks();
            if let Some(overrides) = blocks {
                for (name, body) in overrides.iter() {
                    merged.insert(name.clone(), Rc::clone(body));
                }
            }
            return extends.render_with(renderer, Rc::new(merged));
        }

        let blocks = blocks.cloned().unwrap_or_default();
        renderer.with_blocks(blocks, |renderer| renderer.render_nodes(&self.nodes))
    }
}

fn collect_blocks(nodes: &[Node], blocks: &mut HashMap<String, Rc<[Node]>>) {
    for node in nodes {
        let Node::Tag(tag_node) = node else {
            continue;
        };
        if let Tag::Block(block) = &tag_node.tag {
            blocks.insert(block.name().to_owned(), Rc::clone(&tag_node.children));
        }
        collect_blocks(&tag_node.children, blocks);
    }
}

/// State for one render pass over a template tree.
///
/// Tags render through it: it holds the active [`Context`], the block
/// overrides of the inheritance chain being rendered, and the [`Scheduler`]
/// that deferred work is queued on.
pub struct Renderer<'r> {
    engine: &'r Engine,
    scheduler: &'r Scheduler,
    context: &'r mut Context,
    blocks: Blocks,
    depth: usize,
}

impl<'r> Renderer<'r> {
    /// `depth` counts the lazily loaded templates this pass is nested in.
    pub(crate) fn new(
        engine: &'r Engine,
        scheduler: &'r Scheduler,
        context: &'r mut Context,
        depth: usize,
    ) -> Self {
        Self {
            engine,
            scheduler,
            context,
            blocks: Blocks::default(),
            depth,
        }
    }

    pub const fn engine(&self) -> &'r Engine {
        self.engine
    }

    pub const fn scheduler(&self) -> &'r Scheduler {
        self.scheduler
    }

    pub fn context(&self) -> &Context {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut *self.context
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub const fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    pub fn block_override(&self, name: &str) -> Option<Rc<[Node]>> {
        self.blocks.get(name).cloned()
    }

    /// Runs `f` with `blocks` as the active overrides, restoring the previous
    /// ones afterwards.
    pub fn with_blocks<T, F>(&mut self, blocks: Blocks, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let previous = std::mem::replace(&mut self.blocks, blocks);
        let result = f(self);
        self.blocks = previous;
        result
    }

    /// Renders `nodes` in order and concatenates their output.
    pub fn render_nodes(&mut self, nodes: &[Node]) -> TagloomResult<Output> {
        let mut output = Output::new();
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Variable(path) => {
                    if let Some(value) = self.context.get_path(path) {
                        output.push_str(&value.to_string());
                    }
                }
                Node::Tag(tag_node) => {
                    output.extend(tag_node.tag.render(&tag_node.children, self)?);
                }
            }
        }
        Ok(output)
    }
}

/// Fails once deferred loads nest deeper than the configured limit.
pub(crate) fn check_depth(engine: &Engine, depth: usize, template_name: &str) -> TagloomResult<()> {
    let limit = engine.config().max_depth;
    if depth > limit {
        return Err(TagloomError::DepthExceeded {
            template_name: template_name.to_owned(),
            limit,
        });
    }
    Ok(())
}
