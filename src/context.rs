use std::rc::Rc;

use crate::value::{Map, Value};

/// One frame of variables in a [`Context`].
pub type Scope = Map;

/// A chain of variable scopes, innermost last.
///
/// Frames are shared behind [`Rc`] and never change once another frame has
/// been pushed on top of them, so [`Clone`] is a cheap snapshot: a clone keeps
/// seeing the bindings it was taken with even after the original context pops
/// or pushes frames. Rendering code that defers work past the current pass
/// must take such a snapshot first.
///
/// # Example
///
/// ```
/// use tagloom::{Context, Value};
///
/// let mut context = Context::new();
/// context.insert("user", Value::object([("name", "Ada")]));
///
/// assert_eq!(context.get_path("user.name"), Some(&Value::from("Ada")));
/// assert_eq!(context.get_path("user.email"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    frames: Vec<Rc<Scope>>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            frames: vec![Rc::default()],
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable in the innermost scope.
    ///
    /// The frame is copied first if a snapshot still shares it, so earlier
    /// clones are unaffected.
    pub fn insert<N: Into<String>, V: Into<Value>>(&mut self, name: N, value: V) -> &mut Self {
        if let Some(frame) = self.frames.last_mut() {
            Rc::make_mut(frame).insert(name.into(), value.into());
        }
        self
    }

    pub fn push(&mut self, scope: Scope) {
        self.frames.push(Rc::new(scope));
    }

    /// Removes the innermost scope. The outermost scope is never removed.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.frames.len() <= 1 {
            return None;
        }
        self.frames
            .pop()
            .map(|frame| Rc::try_unwrap(frame).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Number of scopes, including the outermost one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Looks up a top-level name, searching from the innermost scope outwards.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Looks up a dotted path such as `user.address.city` or `items.0`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.get(first)?, |value, segment| value.get(segment))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (name, value) in iter {
            context.insert(name, value);
        }
        context
    }
}
