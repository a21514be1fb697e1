//! Documentation comment collection.

pub mod doc_comments;

pub use doc_comments::{DocComment, DocComments};
