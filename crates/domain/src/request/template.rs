//! Path templates with `{name}` placeholders.
//!
//! Templates are parsed once into literal and placeholder segments and
//! resolved per call against a set of path parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Named values substituted into a path template.
pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed URL path pattern such as `/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTemplate` on unbalanced braces, nested
    /// braces or empty placeholder names.
    pub fn parse(template: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(invalid("nested '{'")),
                            c => name.push(c),
                        }
                    }
                    if !closed {
                        return Err(invalid("unclosed '{'"));
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(invalid("empty placeholder name"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                '}' => return Err(invalid("unmatched '}'")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the placeholder names in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every placeholder with its percent-encoded value from `params`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnresolvedPlaceholder` when a placeholder has no
    /// value, and `DomainError::UnusedPathParameter` when `params` names a
    /// parameter the template does not declare.
    pub fn resolve(&self, params: &PathParams) -> DomainResult<String> {
        let placeholders = self.placeholders();
        if let Some(extra) = params.keys().find(|k| !placeholders.contains(&k.as_str())) {
            return Err(DomainError::UnusedPathParameter {
                template: self.raw.clone(),
                name: extra.clone(),
            });
        }

        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => {
                    let value =
                        params
                            .get(name)
                            .ok_or_else(|| DomainError::UnresolvedPlaceholder {
                                template: self.raw.clone(),
                                name: name.clone(),
                            })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PathTemplate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PathTemplate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_and_resolve() {
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        assert_eq!(template.placeholders(), vec!["id"]);
        assert_eq!(
            template.resolve(&params(&[("id", "2")])),
            Ok("/users/2".to_string())
        );
    }

    #[test]
    fn test_template_without_placeholders() {
        let template = PathTemplate::parse("/users/").expect("valid template");
        assert!(template.placeholders().is_empty());
        assert_eq!(template.resolve(&PathParams::new()), Ok("/users/".to_string()));
    }

    #[test]
    fn test_multiple_placeholders() {
        let template = PathTemplate::parse("/orgs/{org}/users/{ id }").expect("valid");
        assert_eq!(template.placeholders(), vec!["org", "id"]);
        assert_eq!(
            template.resolve(&params(&[("org", "acme"), ("id", "7")])),
            Ok("/orgs/acme/users/7".to_string())
        );
    }

    #[test]
    fn test_values_are_encoded_as_one_segment() {
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        assert_eq!(
            template.resolve(&params(&[("id", "2/../3?page=1#x")])),
            Ok("/users/2%2F..%2F3%3Fpage%3D1%23x".to_string())
        );
        assert_eq!(
            template.resolve(&params(&[("id", "jane doe")])),
            Ok("/users/jane%20doe".to_string())
        );
    }

    #[test]
    fn test_missing_placeholder_fails_fast() {
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        assert_eq!(
            template.resolve(&PathParams::new()),
            Err(DomainError::UnresolvedPlaceholder {
                template: "/users/{id}".to_string(),
                name: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_unused_parameter_rejected() {
        let template = PathTemplate::parse("/users/").expect("valid template");
        let result = template.resolve(&params(&[("id", "2")]));
        assert!(matches!(
            result,
            Err(DomainError::UnusedPathParameter { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_malformed_templates() {
        for raw in ["/users/{id", "/users/id}", "/users/{}", "/users/{a{b}}"] {
            assert!(
                matches!(PathTemplate::parse(raw), Err(DomainError::InvalidTemplate { .. })),
                "{raw} should be rejected"
            );
        }
    }
}
