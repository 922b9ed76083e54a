use std::{collections::HashSet, rc::Rc};

use log::trace;

use crate::{
    TagloomResult,
    ast::{Node, TagNode},
    engine::Engine,
    error::{SyntaxErrorKind, TagloomError},
    source::{Lexeme, Source},
    tags::{Tag, TagEnv, lookup_tag},
};

/// A block tag whose closing marker has not been seen yet.
struct OpenTag {
    name: &'static str,
    tag: Tag,
    children: Vec<Node>,
}

/// The children list new nodes are appended to: the innermost open tag's, or
/// the template root.
fn siblings<'s>(stack: &'s mut [OpenTag], root: &'s mut Vec<Node>) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    }
}

/// Builds the token tree of the last template in `chain`.
///
/// `chain` lists the templates currently being built, outermost first; tags
/// that load other templates while being constructed extend it.
pub(crate) fn build(source: Source, engine: &Engine, chain: &[String]) -> TagloomResult<Vec<Node>> {
    let template = chain.last().map_or("", String::as_str);
    let mut root = Vec::new();
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut block_names = HashSet::new();

    for lexeme in source.into_lexemes() {
        match lexeme {
            Lexeme::Text(text) => siblings(&mut stack, &mut root).push(Node::Text(text)),
            Lexeme::Variable(path) => {
                siblings(&mut stack, &mut root).push(Node::Variable(path.trim().to_owned()));
            }
            Lexeme::Open { name, params } => {
                let spec = lookup_tag(&name).ok_or_else(|| {
                    TagloomError::syntax(template, SyntaxErrorKind::UnknownTag { name: name.clone() })
                })?;
                let (parent, preceding_siblings) = match stack.last() {
                    Some(open) => (Some(open.name), open.children.len()),
                    None => (None, root.len()),
                };
                let env = TagEnv::new(engine, chain, parent, preceding_siblings);
                trace!("constructing '{}' tag in '{}'", spec.name, template);
                let tag = spec.construct(params.trim(), &env)?;
                if let Tag::Block(block) = &tag {
                    if !block_names.insert(block.name().to_owned()) {
                        return Err(TagloomError::syntax(
                            template,
                            SyntaxErrorKind::DuplicateBlock {
                                name: block.name().to_owned(),
                            },
                        ));
                    }
                }

                if spec.expects_closing {
                    stack.push(OpenTag {
                        name: spec.name,
                        tag,
                        children: Vec::new(),
                    });
                } else {
                    siblings(&mut stack, &mut root).push(Node::Tag(TagNode {
                        tag,
                        children: Rc::from(Vec::new()),
                    }));
                }
            }
            Lexeme::Close { name } => {
                let Some(open) = stack.pop() else {
                    return Err(TagloomError::syntax(
                        template,
                        SyntaxErrorKind::UnexpectedClose {
                            expected: None,
                            found: name,
                        },
                    ));
                };
                if open.name != name {
                    return Err(TagloomError::syntax(
                        template,
                        SyntaxErrorKind::UnexpectedClose {
                            expected: Some(open.name.to_owned()),
                            found: name,
                        },
                    ));
                }

                let OpenTag {
                    mut tag, children, ..
                } = open;
                let children: Rc<[Node]> = Rc::from(children);
                tag.compile(&children, template)?;
                siblings(&mut stack, &mut root).push(Node::Tag(TagNode { tag, children }));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(TagloomError::syntax(
            template,
            SyntaxErrorKind::Unclosed {
                tag: open.name.to_owned(),
            },
        ));
    }

    Ok(root)
}
