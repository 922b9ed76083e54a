pub type TagloomResult<T> = std::result::Result<T, TagloomError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// The raw parameter text did not match the tag's grammar.
    InvalidParams {
        tag: String,
        params: String,
    },
    /// A loop variable or lookup path looks like a number.
    ReservedIdentifier {
        params: String,
    },
    /// `extends` was not the first token of its template.
    MisplacedExtends,
    ElseOutsideIf,
    /// A branch followed a plain `else` inside the same `if` block.
    BranchAfterElse,
    UnknownTag {
        name: String,
    },
    /// Two blocks in one template share a name.
    DuplicateBlock {
        name: String,
    },
    UnexpectedClose {
        /// The innermost open tag, if any.
        expected: Option<String>,
        found: String,
    },
    Unclosed {
        tag: String,
    },
    /// A statically referenced template ends up referencing itself.
    CircularTemplate {
        chain: Vec<String>,
    },
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParams { tag, params } => {
                write!(f, "Invalid '{}' tag syntax: '{}'", tag, params)
            }
            Self::ReservedIdentifier { params } => {
                write!(f, "Invalid variable names in '{{% for {} %}}'", params)
            }
            Self::MisplacedExtends => write!(f, "Extends tag is not at the beginning of template"),
            Self::ElseOutsideIf => write!(f, "'else' tag encountered outside an 'if' block"),
            Self::BranchAfterElse => {
                write!(f, "Invalid placement of 'else' tag within an 'if' block")
            }
            Self::UnknownTag { name } => write!(f, "Unknown tag '{}'", name),
            Self::DuplicateBlock { name } => {
                write!(f, "Block '{}' is defined more than once", name)
            }
            Self::UnexpectedClose { expected, found } => match expected {
                Some(expected) => write!(
                    f,
                    "Closing tag 'end{}' does not match open tag '{}'",
                    found, expected
                ),
                None => write!(f, "Closing tag 'end{}' has no open tag", found),
            },
            Self::Unclosed { tag } => {
                write!(f, "Unexpected end of template (expected 'end{}')", tag)
            }
            Self::CircularTemplate { chain } => {
                write!(f, "Circular template reference: {}", chain.join(" -> "))
            }
        }
    }
}

impl std::error::Error for SyntaxErrorKind {}

/// A failure to build a template's token tree. Always fatal for that template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxError {
    /// Path of the template being built.
    pub template: String,
    pub kind: SyntaxErrorKind,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Syntax error in template '{}': {}", self.template, self.kind)
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagloomError {
    Syntax(SyntaxError),
    MissingTemplate {
        template_name: String,
    },
    /// A variable required for control flow is absent from the context.
    MissingVariable {
        variable_name: String,
    },
    /// A lazily resolved template path is not a string.
    InvalidFilename {
        variable_name: String,
    },
    NotLoopable {
        variable_name: String,
        found: &'static str,
    },
    DepthExceeded {
        template_name: String,
        limit: usize,
    },
}

impl TagloomError {
    pub(crate) fn syntax<T: Into<String>>(template: T, kind: SyntaxErrorKind) -> Self {
        Self::Syntax(SyntaxError {
            template: template.into(),
            kind,
        })
    }

    /// `true` for failures raised while building a template, `false` for
    /// failures raised while rendering one.
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

impl std::fmt::Display for TagloomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(syntax_error) => write!(f, "{}", syntax_error),
            Self::MissingTemplate { template_name } => {
                write!(f, "Template not found: {}", template_name)
            }
            Self::MissingVariable { variable_name } => {
                write!(f, "Variable not found: {}", variable_name)
            }
            Self::InvalidFilename { variable_name } => {
                write!(f, "Variable '{}' is not a valid filename", variable_name)
            }
            Self::NotLoopable {
                variable_name,
                found,
            } => write!(
                f,
                "'{}' is not a valid variable for looping (found {})",
                variable_name, found
            ),
            Self::DepthExceeded {
                template_name,
                limit,
            } => write!(
                f,
                "Template nesting deeper than {} while loading '{}'",
                limit, template_name
            ),
        }
    }
}

impl std::error::Error for TagloomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(syntax_error) => Some(syntax_error),
            Self::MissingTemplate { .. }
            | Self::MissingVariable { .. }
            | Self::InvalidFilename { .. }
            | Self::NotLoopable { .. }
            | Self::DepthExceeded { .. } => None,
        }
    }
}

impl From<SyntaxError> for TagloomError {
    fn from(error: SyntaxError) -> Self {
        Self::Syntax(error)
    }
}
