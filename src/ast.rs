use std::rc::Rc;

use crate::tags::Tag;

/// A node of a built template tree.
#[derive(Debug)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// A `{{ path }}` substitution. Missing values render as nothing.
    Variable(String),
    /// A tag together with the children it encloses.
    Tag(TagNode),
}

impl Node {
    pub const fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Tag(node) => Some(&node.tag),
            Self::Text(_) | Self::Variable(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct TagNode {
    pub(crate) tag: Tag,
    /// Shared so block bodies can be handed to an inheritance chain as-is.
    pub(crate) children: Rc<[Node]>,
}

impl TagNode {
    pub const fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}
