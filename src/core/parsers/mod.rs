//! Source file parsers.
//!
//! - `js`: JavaScript source parser (uses swc for AST generation)

pub mod js;
