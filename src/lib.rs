//! Directive tags for a small text templating engine: `block`, `extends`,
//! `include`, `for`, `if` and `else`.
//!
//! Templates arrive pre-lexed as a [`Source`]. The tree builder turns them
//! into [`Node`]s through the tag registry, and an [`Engine`] renders the tree
//! against a [`Context`]. Tags that only learn which template they need at
//! render time return a [`DeferredCell`] in place and finish their work on the
//! [`Scheduler`] once the synchronous pass is over.

mod ast;
mod builder;
mod config;
mod context;
mod engine;
mod error;
mod loader;
mod output;
mod scheduler;
mod source;
pub mod tags;
mod template;
mod value;

// Crate-level imports to make convenient imports for the rest of the library.
pub(crate) use error::TagloomResult;

// Public exports.
pub use ast::{Node, TagNode};
pub use config::{EngineConfig, MissingIncludePolicy};
pub use context::{Context, Scope};
pub use engine::Engine;
pub use error::{SyntaxError, SyntaxErrorKind, TagloomError};
pub use loader::{InMemoryLoader, TemplateLoader};
pub use output::{DeferredCell, Fragment, Output};
pub use scheduler::{Scheduler, Task};
pub use source::{Lexeme, Source};
pub use template::{Blocks, Renderer, Template};
pub use value::{Map, Value};
