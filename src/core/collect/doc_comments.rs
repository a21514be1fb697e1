//! Documentation comment collection.
//!
//! Only block comments opening with an extra `*` (`/** ... */`) are
//! documentation comments. Each one documents the code on the line right
//! after the line it ends on:
//!
//! ```js
//! /**
//!  * The player.
//!  */
//! var Player = Component.extend({   // <- line documented by the comment
//! ```

use std::collections::HashMap;

use swc_common::{
    BytePos, SourceMap,
    comments::{Comment, CommentKind},
};

use crate::core::parsers::js::ExtractedComments;
use crate::core::tags::strip_comment_markers;

/// A documentation comment with its markers stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Comment text without `/**`, `*/` and leading `*` continuation markers.
    pub text: String,
    /// Line of the opening `/**` (1-indexed).
    pub start_line: usize,
    /// Line of the closing `*/` (1-indexed).
    pub end_line: usize,
}

/// Documentation comments of one file, indexed by the line they document.
#[derive(Debug, Clone, Default)]
pub struct DocComments {
    by_target_line: HashMap<usize, DocComment>,
}

impl DocComments {
    /// Collect documentation comments from a parsed file.
    ///
    /// When two comments end on the same line the later one wins.
    pub fn collect(comments: &ExtractedComments, source_map: &SourceMap) -> Self {
        let mut doc_comments: Vec<&Comment> =
            comments.iter().filter(|cmt| is_doc_comment(cmt)).collect();
        doc_comments.sort_by_key(|cmt| cmt.span.lo);
        doc_comments.dedup_by_key(|cmt| cmt.span.lo);

        let by_target_line = doc_comments
            .into_iter()
            .map(|cmt| {
                let start_line = source_map.lookup_char_pos(cmt.span.lo).line;
                // `hi` is exclusive; look up the closing `/` itself
                let last = BytePos(cmt.span.hi.0.saturating_sub(1).max(cmt.span.lo.0));
                let end_line = source_map.lookup_char_pos(last).line;
                let doc = DocComment {
                    text: strip_comment_markers(&cmt.text),
                    start_line,
                    end_line,
                };
                (end_line + 1, doc)
            })
            .collect();

        Self { by_target_line }
    }

    /// The comment documenting `line`, if any.
    pub fn preceding(&self, line: usize) -> Option<&DocComment> {
        self.by_target_line.get(&line)
    }

    pub fn len(&self) -> usize {
        self.by_target_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target_line.is_empty()
    }
}

fn is_doc_comment(comment: &Comment) -> bool {
    comment.kind == CommentKind::Block && comment.text.starts_with('*')
}
