//! Documentation comment parsing.
//!
//! A documentation comment is free-form description text followed by a block
//! of `@tag {Types} text` lines:
//!
//! ```text
//! /**
//!  * Summary line.
//!  *
//!  * More description.
//!  * @param {String|Array} [files] Files to read
//!  * @returns {Object} The entries
//!  */
//! ```
//!
//! Parsing never fails. Anything that does not match the tag grammar simply
//! yields absent fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::entity::{EntityKind, Param, PartialEntity, Return, TagValue};

/// Separates the description from the tag block, and tags from each other.
const TAG_BOUNDARY: &str = "\n@";

static CONTINUATION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\* ?").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^@?([^\s{]+)\s*(?:\{([^}]*)\})?\s*(.*)$").unwrap()
});

static TYPE_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[|,/]\s*").unwrap());

/// One `@name {types} description` occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub types: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Tag {
    /// Parse a single tag segment. Returns `None` if the segment has no name.
    pub fn parse(segment: &str) -> Option<Self> {
        let caps = TAG_REGEX.captures(segment.trim())?;
        let name = caps.get(1)?.as_str().to_string();
        let types = caps.get(2).and_then(|m| split_types(m.as_str()));
        let description = caps
            .get(3)
            .map(|m| m.as_str().trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Some(Self {
            name,
            types,
            description,
        })
    }

    fn is_empty(&self) -> bool {
        self.types.is_none() && self.description.is_none()
    }
}

/// Split the inside of a `{A|B}` type list into type names.
fn split_types(list: &str) -> Option<Vec<String>> {
    let types: Vec<String> = TYPE_SEPARATOR_REGEX
        .split(list.trim())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if types.is_empty() { None } else { Some(types) }
}

/// Remove block comment syntax from the raw text between `/*` and `*/`.
///
/// Drops the leading `*` that marks a documentation comment, then the `*`
/// continuation marker (and one following space) at the start of every line.
pub fn strip_comment_markers(raw: &str) -> String {
    let text = raw.strip_prefix('*').unwrap_or(raw);
    CONTINUATION_MARKER_REGEX.replace_all(text, "").into_owned()
}

/// Parse comment text (markers already stripped) into entity evidence.
pub fn parse_comment(text: &str) -> PartialEntity {
    let text = text.trim();
    let mut entity = PartialEntity::default();

    let tag_block = if text.starts_with('@') {
        text.to_string()
    } else {
        let mut parts = text.split(TAG_BOUNDARY);
        let description = parts.next().unwrap_or_default().trim().to_string();
        let summary = description
            .split("\n\n")
            .next()
            .unwrap_or_default()
            .to_string();
        entity.description = Some(description);
        entity.summary = Some(summary);
        parts.collect::<Vec<_>>().join(TAG_BOUNDARY)
    };

    if !tag_block.is_empty() {
        entity.merge(parse_tags(&tag_block));
    }

    entity
}

/// Parse a block of tags, one per line-leading `@`.
pub fn parse_tags(block: &str) -> PartialEntity {
    let mut entity = PartialEntity::default();

    for tag in block.split(TAG_BOUNDARY).filter_map(Tag::parse) {
        apply_tag(&mut entity, tag);
    }

    entity
}

fn apply_tag(entity: &mut PartialEntity, tag: Tag) {
    if let Some(kind) = EntityKind::from_tag(&tag.name) {
        entity.kind = Some(kind);
        if tag.description.is_some() {
            entity.name = tag.description;
        }
        return;
    }

    match tag.name.as_str() {
        "param" => {
            if let Some(param) = parse_param_tag(tag) {
                entity.params.push(param);
            }
        }
        "return" | "returns" => {
            if !tag.is_empty() {
                entity.returns.push(Return {
                    types: tag.types,
                    description: tag.description,
                });
            }
        }
        "name" => entity.name = tag.description,
        "deprecated" => entity.deprecated = Some(true),
        "extends" | "augments" | "inherits" => entity.inherits_from = tag.description,
        "type" => entity.types = tag.types,
        "instance" => entity.is_instance_member = Some(true),
        "description" => entity.description = tag.description,
        "summary" => entity.summary = tag.description,
        name if name.eq_ignore_ascii_case("inheritdoc") => entity.inheritdoc = Some(true),
        name if name.eq_ignore_ascii_case("memberof") => entity.container = tag.description,
        _ => {
            let value = match tag.description {
                Some(text) => TagValue::Text(text),
                None => TagValue::Flag(true),
            };
            entity.extra.insert(tag.name, value);
        }
    }
}

/// Parse `@param {Type} name description`.
///
/// Optional parameters are recognized from a `?` (TypeScript) or `=`
/// (Closure) type suffix and from `[name]` brackets.
pub fn parse_param_tag(tag: Tag) -> Option<Param> {
    if tag.is_empty() {
        return None;
    }

    let mut param = Param::default();

    if let Some(types) = tag.types {
        let types = types
            .into_iter()
            .map(|ty| match ty.strip_suffix(['?', '=']) {
                Some(stripped) => {
                    param.optional = true;
                    stripped.to_string()
                }
                None => ty,
            })
            .collect();
        param.types = Some(types);
    }

    if let Some(text) = tag.description {
        let mut words = text.split_whitespace();
        let mut name = words.next().unwrap_or_default().to_string();
        let description = words.collect::<Vec<_>>().join(" ");

        if name.starts_with('[') {
            param.optional = true;
            name = name.replace(['[', ']'], "");
            if let Some((bare, _default)) = name.split_once('=') {
                name = bare.to_string();
            }
        }

        param.name = Some(name);
        if !description.is_empty() {
            param.description = Some(description);
        }
    }

    Some(param)
}
