use std::{cell::RefCell, rc::Rc};

/// A piece of rendered output.
#[derive(Debug, Clone)]
pub enum Fragment {
    Text(String),
    /// Content that is filled in after it has been positioned.
    Cell(DeferredCell),
}

/// The ordered result of a render pass.
///
/// Adjacent text is merged as it is appended. Cells keep their identity, so
/// a cell handed out during rendering still sits at the same place in the
/// final output once it is filled.
#[derive(Debug, Clone, Default)]
pub struct Output {
    fragments: Vec<Fragment>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Fragment::Text(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(Fragment::Text(text.to_owned()));
        }
    }

    pub fn push_cell(&mut self, cell: DeferredCell) {
        self.fragments.push(Fragment::Cell(cell));
    }

    /// Appends every fragment of `other`, preserving order.
    pub fn extend(&mut self, other: Self) {
        for fragment in other.fragments {
            match fragment {
                Fragment::Text(text) => self.push_str(&text),
                Fragment::Cell(cell) => self.push_cell(cell),
            }
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Cells directly contained in this output, in order.
    pub fn cells(&self) -> impl Iterator<Item = &DeferredCell> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Cell(cell) => Some(cell),
            Fragment::Text(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => f.write_str(text)?,
                Fragment::Cell(cell) => write!(f, "{}", cell)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        let mut output = Self::new();
        output.push_str(text);
        output
    }
}

impl From<DeferredCell> for Output {
    fn from(cell: DeferredCell) -> Self {
        let mut output = Self::new();
        output.push_cell(cell);
        output
    }
}

/// A placeholder that reserves a position in an [`Output`] before its
/// contents are known.
///
/// Clones share the same contents: the clone held by a deferred continuation
/// fills the copy already sitting in the output. Contents may be replaced any
/// number of times; reading the final string is the caller's job once all
/// deferred work has run.
///
/// # Example
///
/// ```
/// use tagloom::{DeferredCell, Output};
///
/// let cell = DeferredCell::default();
/// let mut output = Output::from("a");
/// output.push_cell(cell.clone());
/// output.push_str("c");
/// assert_eq!(output.to_string(), "ac");
///
/// cell.set(Output::from("b"));
/// assert_eq!(output.to_string(), "abc");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeferredCell {
    contents: Rc<RefCell<Output>>,
}

impl DeferredCell {
    pub fn new(initial: Output) -> Self {
        Self {
            contents: Rc::new(RefCell::new(initial)),
        }
    }

    /// Replaces the contents of the cell.
    pub fn set(&self, output: Output) {
        *self.contents.borrow_mut() = output;
    }

    pub fn is_empty(&self) -> bool {
        self.contents.borrow().is_empty()
    }

    /// `true` if both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.contents, &other.contents)
    }
}

impl std::fmt::Display for DeferredCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.contents.borrow())
    }
}
