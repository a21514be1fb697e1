//! Extraction engine.
//!
//! A source unit goes through four stages:
//! - `parsers` + `collect`: parse with swc and index the documentation comments
//! - `extract`: correlate each comment with the code it documents
//! - `tags`: parse the comment text into structured fields
//! - `resolve`: correct entity kinds once the whole table is known
//!
//! `namepath` builds the identifiers everything is keyed by.

pub mod collect;
pub mod entity;
pub mod extract;
pub mod file_scanner;
pub mod namepath;
pub mod parsers;
pub mod pipeline;
pub mod resolve;
pub mod tags;

pub use entity::{
    Collision, Entity, EntityKind, EntityTable, Param, PartialEntity, Return, SourceRef, TagValue,
};
pub use extract::ExtractOptions;
pub use pipeline::{BatchResult, extract_source, parse_source, process_files};
pub use resolve::{ResolutionMode, resolve_relationships};
