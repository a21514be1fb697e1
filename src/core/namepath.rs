//! Canonical identifier (namepath) generation.
//!
//! `MyClass.prototype.method` is documented as `MyClass#method`: `#` separates
//! an instance member from its container, `.` a static one. Events carry an
//! `event:` prefix on their final segment.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::entity::EntityKind;

pub const INSTANCE_SEPARATOR: char = '#';
pub const STATIC_SEPARATOR: char = '.';
pub const EVENT_PREFIX: &str = "event:";

static PROTOTYPE_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.prototype(?:\.|$)").unwrap());

static INSTANCE_TAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[^#]+$").unwrap());

/// Convert a dotted member path into a namepath.
///
/// ```
/// use doclift::core::namepath::path_to_id;
///
/// assert_eq!(path_to_id("a.prototype.method2"), "a#method2");
/// assert_eq!(path_to_id("a.staticMethod"), "a.staticMethod");
/// ```
pub fn path_to_id(path: &str) -> String {
    PROTOTYPE_SEGMENT_REGEX.replace_all(path, "#").into_owned()
}

/// Convert the path of a container into a namepath.
///
/// Members of a prototype are documented as members of the prototype's owner,
/// so a trailing `.prototype` is dropped first.
pub fn container_path_to_id(path: &str) -> String {
    path_to_id(path.strip_suffix(".prototype").unwrap_or(path))
}

/// True if `id` contains the instance separator followed by a name, as in
/// `a#b` or `a#b.c`.
pub fn is_instance_id(id: &str) -> bool {
    INSTANCE_TAIL_REGEX.is_match(id)
}

/// Build the namepath of an entity from its container, name and flags.
pub fn entity_id(
    container: Option<&str>,
    name: &str,
    is_instance_member: bool,
    kind: Option<EntityKind>,
) -> String {
    let mut id = String::new();

    if let Some(container) = container.filter(|c| !c.is_empty()) {
        id.push_str(container);
        id.push(if is_instance_member {
            INSTANCE_SEPARATOR
        } else {
            STATIC_SEPARATOR
        });
    }

    if kind == Some(EntityKind::Event) {
        id.push_str(EVENT_PREFIX);
    }

    id.push_str(name);
    id
}
