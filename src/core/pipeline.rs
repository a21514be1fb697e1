//! Entry points tying extraction and resolution together.

use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;
use swc_common::SourceMap;

use crate::core::entity::EntityTable;
use crate::core::extract::{ExtractOptions, correlate};
use crate::core::parsers::js::parse_js_source;
use crate::core::resolve::resolve_relationships;

/// Name used for parse errors when the options carry no file name.
const ANONYMOUS_SOURCE: &str = "<source>";

/// Extract the entities of one source unit without resolving relationships.
pub fn extract_source(code: &str, options: &ExtractOptions) -> Result<EntityTable> {
    let name = options.source_name.as_deref().unwrap_or(ANONYMOUS_SOURCE);
    let source_map = Arc::new(SourceMap::default());
    let parsed = parse_js_source(code.to_string(), name, source_map)?;
    Ok(correlate(&parsed, options))
}

/// Extract and resolve one source unit.
///
/// ```
/// use doclift::core::{ExtractOptions, parse_source};
///
/// let code = "/** The answer. */\nvar answer = 42;";
/// let table = parse_source(code, &ExtractOptions::default()).unwrap();
/// assert_eq!(table.get("answer").unwrap().description.as_deref(), Some("The answer."));
/// ```
pub fn parse_source(code: &str, options: &ExtractOptions) -> Result<EntityTable> {
    let mut table = extract_source(code, options)?;
    resolve_relationships(&mut table, options.resolution);
    Ok(table)
}

/// Result of processing a batch of files.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub table: EntityTable,
    pub files: usize,
    pub promotions: usize,
}

/// Extract a batch of files and resolve the merged table once.
///
/// Files are read and correlated in parallel; their tables are merged in the
/// order of `files`, so a later file overrides an earlier one on a shared id.
/// Each entity's source URL is `base_url` followed by its file path.
pub fn process_files(
    files: &[String],
    options: &ExtractOptions,
    base_url: Option<&str>,
) -> Result<BatchResult> {
    // Parallel read + correlate, one SourceMap per file
    let results: Vec<Result<EntityTable>> = files
        .par_iter()
        .map(|file_path| {
            let code = std::fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read {}", file_path))?;

            let mut file_options = options.clone().with_source_name(file_path.as_str());
            if let Some(base_url) = base_url {
                file_options = file_options.with_source_url(format!("{}{}", base_url, file_path));
            }

            let table = extract_source(&code, &file_options)?;
            log::info!("{}: {} documented entities", file_path, table.len());
            Ok(table)
        })
        .collect();

    // Sequential merge keeps input order
    let mut table = EntityTable::new();
    for result in results {
        table.extend(result?);
    }

    let promotions = resolve_relationships(&mut table, options.resolution);
    log::debug!("resolution made {} kind promotions", promotions);

    Ok(BatchResult {
        table,
        files: files.len(),
        promotions,
    })
}
