use std::{borrow::Cow, cmp::Ordering, sync::LazyLock};

use regex::Regex;

use crate::{
    TagloomResult,
    ast::Node,
    context::Context,
    error::{SyntaxErrorKind, TagloomError},
    output::Output,
    template::Renderer,
    value::{Value, parse_number},
};

use super::{Tag, TagEnv};

static IF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<left>\w+(?:\.\w+)*)(?:(?:\s*(?P<op>==|!=|<=|>=|<|>)\s*|\s+(?P<in>in)\s+)(?P<right>\w+(?:\.\w+)*))?$",
    )
    .expect("condition pattern is valid")
});

/// One side of a comparison: a numeric literal, or a path into the context.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Path(String),
}

impl Operand {
    fn classify(raw: &str) -> Self {
        match parse_number(raw) {
            Some(number) => Self::Number(number),
            None => Self::Path(raw.to_owned()),
        }
    }

    /// An absent variable resolves to null.
    fn resolve<'c>(&self, context: &'c Context) -> Cow<'c, Value> {
        match self {
            Self::Number(number) => Cow::Owned(Value::Number(*number)),
            Self::Path(path) => context
                .get_path(path)
                .map_or(Cow::Owned(Value::Null), Cow::Borrowed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    In,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::In => "in",
        }
    }

    fn apply(self, left: &Value, right: &Value) -> bool {
        let ordered = |accept: fn(Ordering) -> bool| left.compare(right).is_some_and(accept);
        match self {
            Self::Eq => left == right,
            Self::Ne => left != right,
            Self::Lt => ordered(Ordering::is_lt),
            Self::Gt => ordered(Ordering::is_gt),
            Self::Le => ordered(Ordering::is_le),
            Self::Ge => ordered(Ordering::is_ge),
            Self::In => right.contains(left),
        }
    }
}

/// `left`, or `left <op> right`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    left: Operand,
    comparison: Option<(Operator, Operand)>,
}

impl Condition {
    /// Returns `None` when `params` is not a valid condition.
    pub fn parse(params: &str) -> Option<Self> {
        let captures = IF_REGEX.captures(params.trim())?;
        let left = Operand::classify(captures.name("left")?.as_str());
        let comparison = match captures.name("right") {
            Some(right) => {
                let symbol = captures.name("op").or_else(|| captures.name("in"))?.as_str();
                Some((Operator::from_symbol(symbol)?, Operand::classify(right.as_str())))
            }
            None => None,
        };
        Some(Self { left, comparison })
    }

    pub const fn left(&self) -> &Operand {
        &self.left
    }

    pub const fn comparison(&self) -> Option<&(Operator, Operand)> {
        self.comparison.as_ref()
    }

    /// Without an operator the left operand is tested for truthiness.
    pub fn evaluate(&self, context: &Context) -> bool {
        let left = self.left.resolve(context);
        match &self.comparison {
            Some((operator, right)) => operator.apply(&left, &right.resolve(context)),
            None => left.is_truthy(),
        }
    }
}

/// A run of the `if` tag's children, guarded by a condition. A plain `else`
/// has none.
#[derive(Debug, Clone, PartialEq)]
struct Branch {
    condition: Option<Condition>,
    start: usize,
    end: usize,
}

/// `{% if a %}...{% else if b %}...{% else %}...{% endif %}`
///
/// Renders the children of the first branch whose condition holds, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    condition: Condition,
    branches: Vec<Branch>,
}

impl If {
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        let condition = Condition::parse(params).ok_or_else(|| env.invalid_params("if", params))?;
        Ok(Self {
            condition,
            branches: Vec::new(),
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::If)
    }

    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Number of branches, the `if` itself included. Zero before compilation.
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Splits `children` into branches at every `else` tag.
    pub(crate) fn compile(&mut self, children: &[Node], template: &str) -> TagloomResult<()> {
        let mut branches = vec![Branch {
            condition: Some(self.condition.clone()),
            start: 0,
            end: children.len(),
        }];
        let mut seen_plain_else = false;

        for (i, child) in children.iter().enumerate() {
            let Some(Tag::Else(else_tag)) = child.tag() else {
                continue;
            };
            if seen_plain_else {
                return Err(TagloomError::syntax(template, SyntaxErrorKind::BranchAfterElse));
            }
            seen_plain_else = else_tag.condition.is_none();

            if let Some(current) = branches.last_mut() {
                current.end = i;
            }
            branches.push(Branch {
                condition: else_tag.condition.clone(),
                start: i.saturating_add(1),
                end: children.len(),
            });
        }

        self.branches = branches;
        Ok(())
    }

    pub(crate) fn render(&self, children: &[Node], renderer: &mut Renderer<'_>) -> TagloomResult<Output> {
        let selected = self.branches.iter().find(|branch| {
            branch
                .condition
                .as_ref()
                .is_none_or(|condition| condition.evaluate(renderer.context()))
        });
        match selected {
            Some(branch) => renderer.render_nodes(children.get(branch.start..branch.end).unwrap_or_default()),
            None => Ok(Output::new()),
        }
    }
}

/// `{% else %}` or `{% else if condition %}`, only valid directly inside `if`.
#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    condition: Option<Condition>,
}

impl Else {
    pub fn parse(params: &str, env: &TagEnv<'_>) -> TagloomResult<Self> {
        if env.parent() != Some("if") {
            return Err(env.syntax_error(SyntaxErrorKind::ElseOutsideIf));
        }
        let params = params.trim();
        if params.is_empty() {
            return Ok(Self { condition: None });
        }

        let params = params
            .strip_prefix("if")
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map_or(params, str::trim_start);
        let condition = Condition::parse(params).ok_or_else(|| env.invalid_params("else if", params))?;
        Ok(Self {
            condition: Some(condition),
        })
    }

    pub(crate) fn construct(params: &str, env: &TagEnv<'_>) -> TagloomResult<Tag> {
        Self::parse(params, env).map(Tag::Else)
    }

    /// `true` for a plain `else`.
    pub const fn is_plain(&self) -> bool {
        self.condition.is_none()
    }

    pub const fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}
