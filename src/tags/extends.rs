use log::debug;

use crate::{
    TagloomResult,
    error::SyntaxErrorKind,
    output::{DeferredCell, Output},
    template::{Blocks, Renderer, Template, check_depth},
};

use super::{
    Tag, TagEnv,
    target::{Target, TargetRef, resolve_filename},
};

/// `{% extends "base.html" %}` or `{% extends layout.name %}`.
///
/// Must be the first thing in its template. The template it names renders in
/// place of the extending template, with the extending template's blocks
/// overriding its own.
#[derive(Debug)]
pub struct Extends {
    target: Target,
}

impl Extends {
    /// # Errors
    ///
    /// * `TagloomError::Syntax` if the parameters are not a quoted path or a
    ///   variable path, or if anything precedes the tag in its parent
    /// * Any error from loading a quoted path
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        let target = TargetRef::parse(params).ok_or_else(|| env.invalid_params("extends", params))?;
        if env.preceding_siblings() > 0 {
            return Err(env.syntax_error(SyntaxErrorKind::MisplacedExtends));
        }
        Ok(Self {
            target: target.into_target(env)?,
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::Extends)
    }

    pub const fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) fn render(&self, renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        let blocks = Blocks::clone(renderer.blocks());
        self.render_with(renderer, blocks)
    }

    /// Renders the parent template with `blocks` as overrides.
    ///
    /// With a lazy target the parent is loaded after the current pass; the
    /// returned output then holds a placeholder that is filled once it has
    /// rendered. Load failures surface from the scheduler drain.
    pub(crate) fn render_with(&self, renderer: &mut Renderer<'_>, blocks: Blocks) -> TagloomResult<Output> {
        match &self.target {
            Target::Static(template) => template.render(renderer, Some(&blocks)),
            Target::Lazy(path) => {
                let filename = resolve_filename(renderer.context(), path)?;
                let cell = DeferredCell::default();
                let fill = cell.clone();
                let mut frozen = renderer.context().clone();
                let depth = renderer.depth().saturating_add(1);

                debug!("deferring extends of '{}' (from '{}')", filename, path);
                renderer.scheduler().defer(move |engine, scheduler| {
                    check_depth(engine, depth, &filename)?;
                    let template = Template::load(&filename, engine)?;
                    let mut renderer = Renderer::new(engine, scheduler, &mut frozen, depth);
                    fill.set(template.render(&mut renderer, Some(&blocks))?);
                    Ok(())
                });
                Ok(Output::from(cell))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Context, Source, TagloomError, Value,
        tags::test_support::{build, engine_with, render},
    };

    fn base() -> Source {
        Source::new()
            .text("<title>")
            .open("block", "title")
            .text("Base")
            .close("block")
            .text("</title><main>")
            .open("block", "content")
            .close("block")
            .text("</main>")
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_quoted_paths_are_static_and_bare_paths_lazy() {
        let engine = engine_with(vec![("base.html", base())]);
        for (params, lazy) in [
            ("\"base.html\"", false),
            ("'base.html'", false),
            ("layout", true),
            ("page.layout", true),
        ] {
            let template =
                Template::from_source("child.html", Source::new().open("extends", params), &engine).unwrap();
            let extends = template.extends().unwrap();
            assert_eq!(extends.target().is_lazy(), lazy, "params {:?}", params);
        }
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_invalid_params() {
        for params in ["", "\"base.html", "'base.html\"", "a b", "\".hidden\""] {
            let err = build(Source::new().open("extends", params)).unwrap_err();
            assert!(
                matches!(err, TagloomError::Syntax(ref e) if matches!(e.kind, SyntaxErrorKind::InvalidParams { .. })),
                "params {:?} gave {:?}",
                params,
                err
            );
        }
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_must_be_first_in_template() {
        let err = build(Source::new().text("\n").open("extends", "layout")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error in template 'test.html': Extends tag is not at the beginning of template"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_static_parent_missing_fails_construction() {
        let err = build(Source::new().open("extends", "'nowhere.html'")).unwrap_err();
        assert_eq!(
            err,
            TagloomError::MissingTemplate {
                template_name: "nowhere.html".to_string()
            }
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_child_blocks_override_parent() {
        let engine = engine_with(vec![("base.html", base())]);
        let output = render(
            &engine,
            Source::new()
                .open("extends", "'base.html'")
                .text("ignored outside blocks")
                .open("block", "content")
                .text("Hello ")
                .var("name")
                .close("block"),
            &[("name", "Ada")].into_iter().collect::<Context>(),
        )
        .unwrap();
        assert_eq!(output, "<title>Base</title><main>Hello Ada</main>");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_lazy_parent_resolved_from_context() {
        let engine = engine_with(vec![("base.html", base())]);
        let mut context = Context::new();
        context.insert("layout", "base.html");
        let output = render(
            &engine,
            Source::new()
                .open("extends", "layout")
                .open("block", "title")
                .text("Lazy")
                .close("block"),
            &context,
        )
        .unwrap();
        assert_eq!(output, "<title>Lazy</title><main></main>");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_lazy_parent_missing_variable() {
        let engine = engine_with(vec![("base.html", base())]);
        let err = render(&engine, Source::new().open("extends", "layout"), &Context::new()).unwrap_err();
        assert_eq!(
            err,
            TagloomError::MissingVariable {
                variable_name: "layout".to_string()
            }
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_lazy_parent_load_failure_surfaces_after_drain() {
        let engine = engine_with(vec![]);
        let template = Template::from_source("child.html", Source::new().open("extends", "layout"), &engine).unwrap();
        let mut context = Context::new();
        context.insert("layout", Value::from("gone.html"));

        let scheduler = crate::Scheduler::new();
        // The synchronous pass succeeds; the failure arrives with the deferred load.
        let output = engine.render_pass(&template, &context, &scheduler).unwrap();
        assert_eq!(output.to_string(), "");
        assert_eq!(scheduler.pending(), 1);

        let err = scheduler.run_until_idle(&engine).unwrap_err();
        assert_eq!(
            err,
            TagloomError::MissingTemplate {
                template_name: "gone.html".to_string()
            }
        );
    }
}
