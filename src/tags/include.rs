use log::{debug, warn};

use crate::{
    TagloomResult,
    config::MissingIncludePolicy,
    output::{DeferredCell, Output},
    template::{Renderer, Template, check_depth},
};

use super::{
    Tag, TagEnv,
    target::{Target, TargetRef, resolve_filename},
};

/// `{% include "partial.html" %}` or `{% include partial.name %}`.
///
/// Renders another template in place. Block overrides of the including
/// template are not passed on: the included template renders its own blocks.
#[derive(Debug)]
pub struct Include {
    target: Target,
}

impl Include {
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        let target = TargetRef::parse(params).ok_or_else(|| env.invalid_params("include", params))?;
        Ok(Self {
            target: target.into_target(env)?,
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::Include)
    }

    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// A lazy target is looked up now, but loaded and rendered after the
    /// current pass against a snapshot of the context taken here. Until then
    /// the returned placeholder is empty.
    pub(crate) fn render(&self, renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        let path = match &self.target {
            Target::Static(template) => return template.render(renderer, None),
            Target::Lazy(path) => path,
        };

        let filename = resolve_filename(renderer.context(), path)?;
        let cell = DeferredCell::default();
        let fill = cell.clone();
        let mut frozen = renderer.context().clone();
        let depth = renderer.depth().saturating_add(1);
        let policy = renderer.engine().config().missing_include;

        debug!("deferring include of '{}' (from '{}')", filename, path);
        renderer.scheduler().defer(move |engine, scheduler| {
            check_depth(engine, depth, &filename)?;
            let template = match Template::load(&filename, engine) {
                Ok(template) => template,
                Err(err) => match policy {
                    MissingIncludePolicy::Silent => {
                        warn!("include of '{}' left empty: {}", filename, err);
                        return Ok(());
                    }
                    MissingIncludePolicy::Error => return Err(err),
                },
            };
            let mut renderer = Renderer::new(engine, scheduler, &mut frozen, depth);
            fill.set(template.render(&mut renderer, None)?);
            Ok(())
        });
        Ok(Output::from(cell))
    }
}
