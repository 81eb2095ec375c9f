//! Route pattern parsing and matching

use crate::error::{Error, Result};
use crate::identifier::ResourceIdentifier;
use std::fmt;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this path segment
    Literal(String),
    /// `*` matches any single segment
    Any,
    /// `**` matches one or more trailing segments
    Rest,
}

impl Segment {
    /// Specificity rank used for precedence: literal beats single-segment
    /// wildcard beats multi-segment wildcard.
    fn rank(&self) -> u8 {
        match self {
            Self::Literal(_) => 2,
            Self::Any => 1,
            Self::Rest => 0,
        }
    }
}

/// A declared route pattern.
///
/// Patterns are slash-separated like identifiers; a segment of `*` matches
/// any single segment and a trailing `**` matches one or more remaining
/// segments. `**` is only valid in the final position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern is empty or places
    /// `**` anywhere but the final segment.
    pub fn parse(pattern: &str) -> Result<Self> {
        let raw = pattern.trim_matches('/').to_owned();
        let parts: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        if parts.is_empty() {
            return Err(Error::invalid_pattern(pattern, "pattern has no segments"));
        }

        let mut segments = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let segment = match *part {
                "*" => Segment::Any,
                "**" => {
                    if index + 1 != parts.len() {
                        return Err(Error::invalid_pattern(
                            pattern,
                            "`**` is only allowed as the final segment",
                        ));
                    }
                    Segment::Rest
                }
                literal => Segment::Literal(literal.to_owned()),
            };
            segments.push(segment);
        }

        Ok(Self { raw, segments })
    }

    /// The pattern as originally written (normalized of outer slashes).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The fully-qualified identifier this pattern declares, used for the
    /// reverse code → identifier lists.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.raw.clone())
    }

    /// Whether the identifier conforms to this pattern.
    pub fn matches(&self, identifier: &ResourceIdentifier) -> bool {
        let parts: Vec<&str> = identifier.segments().collect();
        let mut pos = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    if parts.get(pos) != Some(&literal.as_str()) {
                        return false;
                    }
                    pos += 1;
                }
                Segment::Any => {
                    if pos >= parts.len() {
                        return false;
                    }
                    pos += 1;
                }
                // Trailing `**` swallows everything left, requiring at
                // least one segment.
                Segment::Rest => return pos < parts.len(),
            }
        }
        pos == parts.len()
    }

    /// Per-segment specificity vector, compared lexicographically when two
    /// patterns both match an identifier.
    pub(crate) fn specificity(&self) -> Vec<u8> {
        self.segments.iter().map(Segment::rank).collect()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
