/// A single pre-lexed unit of template input.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lexeme {
    /// Literal text, copied to the output as-is.
    Text(String),
    /// A `{{ path }}` substitution.
    Variable(String),
    /// An opening tag such as `{% for item in items %}`: the tag name and its
    /// raw parameter text.
    Open { name: String, params: String },
    /// A closing marker such as `{% endfor %}`, named by the tag it closes.
    Close { name: String },
}

/// The lexed form of a template, as handed out by a
/// [`TemplateLoader`](crate::TemplateLoader).
///
/// # Example
///
/// ```
/// use tagloom::Source;
///
/// // {% for cat in cats %}Greetings {{ cat }}
/// // {% endfor %}
/// let source = Source::new()
///     .open("for", "cat in cats")
///     .text("Greetings ")
///     .var("cat")
///     .text("\n")
///     .close("for");
/// assert_eq!(source.lexemes().len(), 5);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Source {
    lexemes: Vec<Lexeme>,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text<T: Into<String>>(mut self, text: T) -> Self {
        self.lexemes.push(Lexeme::Text(text.into()));
        self
    }

    #[must_use]
    pub fn var<T: Into<String>>(mut self, path: T) -> Self {
        self.lexemes.push(Lexeme::Variable(path.into()));
        self
    }

    #[must_use]
    pub fn open<N: Into<String>, P: Into<String>>(mut self, name: N, params: P) -> Self {
        self.lexemes.push(Lexeme::Open {
            name: name.into(),
            params: params.into(),
        });
        self
    }

    #[must_use]
    pub fn close<N: Into<String>>(mut self, name: N) -> Self {
        self.lexemes.push(Lexeme::Close { name: name.into() });
        self
    }

    pub fn push(&mut self, lexeme: Lexeme) {
        self.lexemes.push(lexeme);
    }

    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    pub fn into_lexemes(self) -> Vec<Lexeme> {
        self.lexemes
    }
}

impl FromIterator<Lexeme> for Source {
    fn from_iter<I: IntoIterator<Item = Lexeme>>(iter: I) -> Self {
        Self {
            lexemes: iter.into_iter().collect(),
        }
    }
}

impl From<&str> for Source {
    /// A template made of a single piece of text.
    fn from(text: &str) -> Self {
        Self::new().text(text)
    }
}
