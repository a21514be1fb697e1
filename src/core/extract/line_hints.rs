//! Hints read from the first line of code after a documentation comment.
//!
//! These are plain text patterns over the source line and the weakest
//! evidence source: anything the syntax tree or the tags say overrides them.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::entity::{EntityKind, PartialEntity};

/// Shape of a recognized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineHint {
    /// `function name(`
    FunctionStatement { name: String },
    /// `var name = function`
    FunctionExpression { name: String },
    /// `Ctor.prototype.name = function`
    PrototypeMethod { owner: String, name: String },
    /// `Ctor.prototype.name = value`
    PrototypeProperty { owner: String, name: String },
    /// `receiver.name = function`
    Method { receiver: String, name: String },
    /// `receiver.name = value`
    Property { receiver: String, name: String },
    /// `var name = value`
    Declaration { name: String },
}

static FUNCTION_STATEMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^function\s+([\w$]+)\s*\(").unwrap());
static FUNCTION_EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:var|let|const)\s+([\w$]+)[ \t]*=[ \t]*function").unwrap()
});
static PROTOTYPE_METHOD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w$]+)\.prototype\.([\w$]+)[ \t]*=[ \t]*function").unwrap()
});
static PROTOTYPE_PROPERTY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w$]+)\.prototype\.([\w$]+)[ \t]*=[ \t]*[^\n;]+").unwrap()
});
static METHOD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w$.]+)\.([\w$]+)[ \t]*=[ \t]*function").unwrap()
});
static PROPERTY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w$]+)\.([\w$]+)[ \t]*=[ \t]*[^\n;]+").unwrap());
static DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:var|let|const)\s+([\w$]+)[ \t]*=[ \t]*[^\n;]+").unwrap()
});

impl LineHint {
    /// Recognize a source line. Only the text before the first `{` is looked at.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let head = line.split('{').next().unwrap_or_default();

        let capture = |regex: &Regex, group: usize| -> Option<String> {
            regex
                .captures(head)
                .and_then(|caps| caps.get(group))
                .map(|m| m.as_str().to_string())
        };

        if let Some(name) = capture(&FUNCTION_STATEMENT_REGEX, 1) {
            return Some(Self::FunctionStatement { name });
        }
        if let Some(name) = capture(&FUNCTION_EXPRESSION_REGEX, 1) {
            return Some(Self::FunctionExpression { name });
        }
        if let Some(caps) = PROTOTYPE_METHOD_REGEX.captures(head) {
            return Some(Self::PrototypeMethod {
                owner: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
        if let Some(caps) = PROTOTYPE_PROPERTY_REGEX.captures(head) {
            return Some(Self::PrototypeProperty {
                owner: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
        if let Some(caps) = METHOD_REGEX.captures(head) {
            return Some(Self::Method {
                receiver: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
        if let Some(caps) = PROPERTY_REGEX.captures(head) {
            return Some(Self::Property {
                receiver: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
        if let Some(name) = capture(&DECLARATION_REGEX, 1) {
            return Some(Self::Declaration { name });
        }

        None
    }

    /// Evidence contributed by this hint. The container is only kept when
    /// `top_level` is set.
    pub fn into_partial(self, top_level: bool) -> PartialEntity {
        let (kind, name, container, instance) = match self {
            Self::FunctionStatement { name } | Self::FunctionExpression { name } => {
                (EntityKind::Function, name, None, false)
            }
            Self::PrototypeMethod { owner, name } => (EntityKind::Function, name, Some(owner), true),
            Self::PrototypeProperty { owner, name } => (EntityKind::Member, name, Some(owner), true),
            Self::Method { receiver, name } => (EntityKind::Function, name, Some(receiver), false),
            Self::Property { receiver, name } => (EntityKind::Member, name, Some(receiver), false),
            Self::Declaration { name } => (EntityKind::Member, name, None, false),
        };

        let mut partial = PartialEntity {
            kind: Some(kind),
            name: Some(name),
            ..Default::default()
        };
        if top_level && container.is_some() {
            partial.container = container;
        }
        if instance {
            partial.is_instance_member = Some(true);
        }
        partial
    }
}

/// Evidence from a source line, or an empty record if the line is not recognized.
pub fn hints_for_line(line: &str, top_level: bool) -> PartialEntity {
    LineHint::parse(line)
        .map(|hint| hint.into_partial(top_level))
        .unwrap_or_default()
}
