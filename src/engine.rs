use log::debug;

use crate::{
    TagloomResult,
    config::EngineConfig,
    context::Context,
    error::TagloomError,
    loader::TemplateLoader,
    output::Output,
    scheduler::Scheduler,
    source::Source,
    template::{Renderer, Template},
};

/// `Engine` renders templates supplied by a [`TemplateLoader`], resolving
/// inheritance, inclusion and deferred loads along the way.
///
/// # Examples
///
/// ```
/// use tagloom::{Context, Engine, InMemoryLoader, Source, Value};
///
/// let mut loader = InMemoryLoader::new();
/// loader.add(
///     "list",
///     Source::new()
///         .open("for", "name, i in names")
///         .var("i")
///         .text("=")
///         .var("name")
///         .text(" ")
///         .close("for"),
/// );
///
/// let engine = Engine::new(loader);
/// let mut context = Context::new();
/// context.insert("names", Value::from(vec!["Ada", "Grace"]));
///
/// let output = engine.render("list", &context).unwrap();
/// assert_eq!(output, "0=Ada 1=Grace ");
/// ```
pub struct Engine {
    loader: Box<dyn TemplateLoader>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the default [`EngineConfig`].
    pub fn new<L: TemplateLoader + 'static>(loader: L) -> Self {
        Self::with_config(loader, EngineConfig::default())
    }

    pub fn with_config<L: TemplateLoader + 'static>(loader: L, config: EngineConfig) -> Self {
        Self {
            loader: Box::new(loader),
            config,
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetches a template's source from the loader.
    pub(crate) fn source(&self, name: &str) -> TagloomResult<Source> {
        self.loader
            .load(name)
            .ok_or_else(|| TagloomError::MissingTemplate {
                template_name: name.to_owned(),
            })
    }

    /// Loads and builds the named template.
    ///
    /// # Errors
    ///
    /// See [`Template::load`].
    pub fn load(&self, name: &str) -> TagloomResult<Template> {
        Template::load(name, self)
    }

    /// Renders the named template to a string.
    ///
    /// # Arguments
    ///
    /// * `name` - The name the loader knows the template by
    /// * `context` - Variables available to the template
    ///
    /// # Errors
    ///
    /// * `TagloomError::MissingTemplate` if the template, or a template it
    ///   extends, cannot be loaded
    /// * `TagloomError::Syntax` if a template is malformed
    /// * `TagloomError::MissingVariable`, `TagloomError::InvalidFilename` and
    ///   `TagloomError::NotLoopable` from tag evaluation
    pub fn render(&self, name: &str, context: &Context) -> TagloomResult<String> {
        self.render_output(name, context)
            .map(|output| output.to_string())
    }

    /// Like [`Engine::render`] but returns the rendered fragments.
    ///
    /// Deferred work has completed by the time this returns, so every
    /// [`DeferredCell`](crate::DeferredCell) in the output holds its final
    /// contents.
    pub fn render_output(&self, name: &str, context: &Context) -> TagloomResult<Output> {
        let template = self.load(name)?;
        self.render_template(&template, context)
    }

    /// Renders an already built template and runs all deferred work.
    pub fn render_template(&self, template: &Template, context: &Context) -> TagloomResult<Output> {
        let scheduler = Scheduler::new();
        let output = self.render_pass(template, context, &scheduler)?;
        scheduler.run_until_idle(self)?;
        Ok(output)
    }

    /// Renders a template synchronously, queueing deferred work on
    /// `scheduler` instead of running it.
    ///
    /// Placeholders in the returned output stay empty until
    /// [`Scheduler::run_until_idle`] has been called.
    pub fn render_pass(
        &self,
        template: &Template,
        context: &Context,
        scheduler: &Scheduler,
    ) -> TagloomResult<Output> {
        debug!("rendering template '{}'", template.path());
        let mut context = context.clone();
        let mut renderer = Renderer::new(self, scheduler, &mut context, 0);
        template.render(&mut renderer, None)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryLoader;

    #[test]
    #[ntest::timeout(100)]
    fn test_missing_template() {
        let engine = Engine::new(InMemoryLoader::new());
        let err = engine.render("nope.html", &Context::new()).unwrap_err();
        assert_eq!(
            err,
            TagloomError::MissingTemplate {
                template_name: "nope.html".to_string()
            }
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_closure_loader() {
        let engine = Engine::new(|name: &str| {
            (name == "hello").then(|| Source::new().text("Hello, ").var("who"))
        });
        let context: Context = [("who", "you")].into_iter().collect();
        assert_eq!(engine.render("hello", &context).unwrap(), "Hello, you");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_render_does_not_touch_callers_context() {
        let mut loader = InMemoryLoader::new();
        loader.add(
            "loop",
            Source::new().open("for", "x in xs").var("x").close("for"),
        );
        let engine = Engine::new(loader);
        let context: Context = [("xs", vec![1, 2])].into_iter().collect();

        assert_eq!(engine.render("loop", &context).unwrap(), "12");
        assert_eq!(context.depth(), 1);
        assert!(!context.contains("x"));
    }
}
