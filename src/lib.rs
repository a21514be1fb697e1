//! doclift - documentation entity extraction for JavaScript
//!
//! doclift reads `/** ... */` documentation comments, works out which piece
//! of code each one documents and produces a table of entities (classes,
//! functions, members, namespaces, events) keyed by JSDoc-style namepaths.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (parse, correlate, resolve)

pub mod cli;
pub mod config;
pub mod core;
