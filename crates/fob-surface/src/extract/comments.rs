use oxc_ast::ast::Program;
use oxc_span::Span;
use rustc_hash::FxHashMap;

use crate::jsdoc::is_valid_doc;

/// Leading comments keyed by the start offset of the node they precede.
///
/// Only the comment immediately before a node is kept, and it documents the
/// node only if it is a JSDoc block.
pub struct DocComments<'a> {
    source: &'a str,
    /// `None` when the nearest leading comment is not JSDoc.
    by_node: FxHashMap<u32, Option<Span>>,
}

impl<'a> DocComments<'a> {
    pub fn new(program: &Program<'a>) -> Self {
        let mut by_node = FxHashMap::default();
        for comment in program.comments.iter().filter(|comment| comment.is_leading()) {
            by_node.insert(
                comment.attached_to,
                comment.is_jsdoc().then(|| comment.content_span()),
            );
        }
        Self {
            source: program.source_text,
            by_node,
        }
    }

    /// Raw text of the doc block attached to the node starting at `start`.
    pub fn raw(&self, start: u32) -> Option<&'a str> {
        let span = (*self.by_node.get(&start)?)?;
        self.source.get(span.start as usize..span.end as usize)
    }

    /// Whether the node starting at `start` carries valid documentation.
    pub fn documents(&self, start: u32) -> bool {
        self.raw(start).is_some_and(is_valid_doc)
    }
}
