//! Path pattern compilation and matching.
//!
//! A pattern is compiled once, at registration, into a list of [`Segment`]s.
//! Matching is then a single pass over the concrete path's segments.
//!
//! # Syntax
//!
//! | Segment | Meaning |
//! |---------|---------|
//! | `blog` | literal, must match exactly |
//! | `:slug` | parameter, captures exactly one segment |
//! | `*`, `*rest`, `:rest*` | wildcard, captures the remainder (may be empty); must be last |
//!
//! A bare `*` stores its capture under the key `"*"`.
//!
//! Captured values are percent-decoded. A malformed escape makes the whole
//! match fail, so the table simply moves on to the next candidate.
//!
//! # Example
//!
//! ```
//! use spa_navigator::RoutePattern;
//!
//! let pattern = RoutePattern::parse("/blog/:slug").unwrap();
//! let params = pattern.matches("/blog/getting-started").unwrap();
//! assert_eq!(params.get("slug"), Some(&"getting-started".to_string()));
//!
//! assert!(pattern.matches("/blog").is_none());
//! ```

use crate::error::NavigationError;
use crate::location::split_segments;
use crate::params::{decode_component, encode_component};
use crate::RouteParams;
use std::collections::HashSet;
use std::fmt;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Captures one segment under the given name.
    Param(String),
    /// Captures all remaining segments under the given name.
    Wildcard(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern string.
    ///
    /// Fails with [`NavigationError::InvalidPattern`] on an empty or malformed
    /// parameter name, a wildcard that is not the last segment, or a
    /// parameter name used twice.
    pub fn parse(pattern: &str) -> Result<Self, NavigationError> {
        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        let raw_segments: Vec<&str> = split_segments(pattern).collect();

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = parse_segment(pattern, raw)?;

            if matches!(segment, Segment::Wildcard(_)) && index + 1 != raw_segments.len() {
                return Err(NavigationError::invalid_pattern(
                    pattern,
                    format!("wildcard '{}' must be the last segment", raw),
                ));
            }

            if let Segment::Param(name) | Segment::Wildcard(name) = &segment {
                if !seen.insert(name.clone()) {
                    return Err(NavigationError::invalid_pattern(
                        pattern,
                        format!("parameter '{}' appears more than once", name),
                    ));
                }
            }

            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written at registration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of literal segments. Used to rank overlapping candidates.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Whether the last segment is a wildcard.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Match a normalized path, returning the decoded parameters.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let path_segments: Vec<&str> = split_segments(path).collect();

        if !self.has_wildcard() && path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    if path_segments.get(index) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = decode_component(path_segments.get(index)?)?;
                    params.insert(name.clone(), value);
                }
                Segment::Wildcard(name) => {
                    let rest = path_segments.get(index..)?;
                    let decoded = rest
                        .iter()
                        .map(|s| decode_component(s))
                        .collect::<Option<Vec<_>>>()?;
                    params.insert(name.clone(), decoded.join("/"));
                    return Some(params);
                }
            }
        }

        Some(params)
    }

    /// Build a concrete path from parameters, percent-encoding each value.
    ///
    /// ```
    /// use spa_navigator::{RoutePattern, RouteParams};
    ///
    /// let pattern = RoutePattern::parse("/blog/:slug").unwrap();
    /// let params: RouteParams = [("slug", "hello world")].into_iter().collect();
    /// assert_eq!(pattern.build(&params).unwrap(), "/blog/hello%20world");
    /// ```
    pub fn build(&self, params: &RouteParams) -> Result<String, NavigationError> {
        let mut parts = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => parts.push(literal.clone()),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| NavigationError::MissingParam {
                            route: self.raw.clone(),
                            param: name.clone(),
                        })?;
                    parts.push(encode_component(value));
                }
                Segment::Wildcard(name) => {
                    if let Some(value) = params.get(name) {
                        parts.extend(split_segments(value).map(encode_component));
                    }
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, NavigationError> {
    if raw == "*" {
        return Ok(Segment::Wildcard("*".to_string()));
    }

    if let Some(name) = raw.strip_prefix('*') {
        return validate_name(pattern, name).map(Segment::Wildcard);
    }

    if let Some(name) = raw.strip_prefix(':') {
        return match name.strip_suffix('*') {
            Some(variadic) => validate_name(pattern, variadic).map(Segment::Wildcard),
            None => validate_name(pattern, name).map(Segment::Param),
        };
    }

    Ok(Segment::Literal(raw.to_string()))
}

fn validate_name(pattern: &str, name: &str) -> Result<String, NavigationError> {
    if name.is_empty() {
        return Err(NavigationError::invalid_pattern(
            pattern,
            "parameter name is empty",
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(NavigationError::invalid_pattern(
            pattern,
            format!("parameter name '{}' has illegal characters", name),
        ));
    }
    Ok(name.to_string())
}
