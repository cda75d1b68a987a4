//! Route template compilation.
//!
//! # Responsibilities
//! - Split a template into static and dynamic segments
//! - Resolve each placeholder's shortcut into a fragment and default
//! - Build one anchored regex for the whole route
//!
//! # Template Syntax
//! ```text
//! /users/{id::i}           required placeholder typed by shortcut `i`
//! /articles/{page::i}?     optional placeholder
//! /tags/{tag}              placeholder typed by the word shortcut
//! ```
//!
//! # Design Decisions
//! - The separator slash lives inside a dynamic segment's group, so an
//!   elidable segment absorbs or omits its own leading slash
//! - A segment is elidable when marked optional or when its shortcut has a
//!   default (canonical links omit defaults and must still match)
//! - Literal segments are regex-escaped
//! - Each dynamic fragment sits in its own named group (`p0`, `p1`, ... by
//!   spec index), so extraction reads values straight from the captures
//! - Compilation happens once; nothing is recomputed at request time

use std::collections::HashSet;

use regex::Regex;

use crate::routing::error::DefinitionError;
use crate::routing::shortcut::ShortcutCatalog;

/// Separator between a placeholder's name and its shortcut.
const SHORTCUT_SEPARATOR: &str = "::";

/// Compiled descriptor for one template segment.
#[derive(Debug, Clone)]
pub enum ParamSpec {
    /// Literal segment that must appear verbatim.
    Static(String),
    /// Placeholder segment.
    Dynamic(DynamicParam),
}

impl ParamSpec {
    pub fn as_dynamic(&self) -> Option<&DynamicParam> {
        match self {
            ParamSpec::Dynamic(param) => Some(param),
            ParamSpec::Static(_) => None,
        }
    }
}

/// A named, shortcut-typed placeholder.
#[derive(Debug, Clone)]
pub struct DynamicParam {
    pub name: String,
    pub fragment: String,
    pub default: Option<String>,
    pub optional: bool,
    group: String,
    segment: Regex,
}

impl DynamicParam {
    /// Whether a single path segment satisfies this placeholder's shortcut.
    pub fn accepts(&self, segment: &str) -> bool {
        self.segment.is_match(segment)
    }

    /// Whether the segment may be absent from a request path.
    pub fn is_elidable(&self) -> bool {
        self.optional || self.default.is_some()
    }

    /// Whether a value may be left out of a generated link.
    pub fn is_default(&self, value: &str) -> bool {
        self.default.as_deref() == Some(value)
    }

    /// Name of the capture group holding this placeholder's value.
    pub(crate) fn group(&self) -> &str {
        &self.group
    }
}

/// Output of the compiler: matcher plus ordered segment descriptors.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub params: Vec<ParamSpec>,
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder { body: &'a str, optional: bool },
}

fn classify(segment: &str) -> Segment<'_> {
    let Some(inner) = segment.strip_prefix('{') else {
        return Segment::Literal(segment);
    };
    if let Some(body) = inner.strip_suffix("}?") {
        Segment::Placeholder { body, optional: true }
    } else if let Some(body) = inner.strip_suffix('}') {
        Segment::Placeholder { body, optional: false }
    } else {
        Segment::Literal(segment)
    }
}

/// Compile a template into its matcher and parameter list.
pub fn compile(template: &str, shortcuts: &ShortcutCatalog) -> Result<CompiledPattern, DefinitionError> {
    let mut params = Vec::new();
    let mut seen = HashSet::new();
    let mut source = String::from("^");

    for raw in template.trim_matches('/').split('/').filter(|s| !s.is_empty()) {
        match classify(raw) {
            Segment::Literal(literal) => {
                source.push('/');
                source.push_str(&regex::escape(literal));
                params.push(ParamSpec::Static(literal.to_string()));
            }
            Segment::Placeholder { body, optional } => {
                let (name, token) = match body.split_once(SHORTCUT_SEPARATOR) {
                    Some((name, token)) => (name, Some(token)),
                    None => (body, None),
                };
                if name.is_empty() {
                    return Err(DefinitionError::EmptyParameterName {
                        segment: raw.to_string(),
                        template: template.to_string(),
                    });
                }
                if !seen.insert(name) {
                    return Err(DefinitionError::DuplicateParameter {
                        name: name.to_string(),
                        template: template.to_string(),
                    });
                }

                let shortcut = shortcuts.resolve(token);
                let segment = Regex::new(&format!("^(?:{})$", shortcut.fragment))
                    .map_err(|e| invalid(template, e))?;
                let param = DynamicParam {
                    name: name.to_string(),
                    fragment: shortcut.fragment,
                    default: shortcut.default,
                    optional,
                    group: format!("p{}", params.len()),
                    segment,
                };

                source.push_str(&format!("(?:/(?P<{}>{}))", param.group, param.fragment));
                if param.is_elidable() {
                    source.push('?');
                }
                params.push(ParamSpec::Dynamic(param));
            }
        }
    }
    source.push_str("/?$");

    let regex = Regex::new(&source).map_err(|e| invalid(template, e))?;
    Ok(CompiledPattern { regex, params })
}

fn invalid(template: &str, error: regex::Error) -> DefinitionError {
    DefinitionError::InvalidPattern {
        template: template.to_string(),
        message: error.to_string(),
    }
}
