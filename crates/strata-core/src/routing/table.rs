//! Route table: pattern → code classification and the reverse lookup

use super::pattern::RoutePattern;
use crate::error::Result;
use crate::identifier::ResourceIdentifier;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Integer classification of a resource identifier.
///
/// Codes are caller-assigned; several identifiers may share one code when
/// they alias the same adapter, which groups them for notification
/// fan-out. An identifier that matches no pattern resolves to `None`
/// rather than a reserved sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteCode(pub u32);

impl fmt::Display for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct RouteEntry {
    pattern: RoutePattern,
    code: RouteCode,
}

/// Maps declared patterns to route codes and codes back to the canonical
/// set of identifiers sharing them.
///
/// The table is populated once during single-threaded composition and is
/// read-only afterwards; lookups take `&self` and never lock.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    reverse: HashMap<RouteCode, IndexSet<ResourceIdentifier>>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a pattern → code mapping.
    ///
    /// The pattern's fully-qualified identifier is appended to the reverse
    /// list for `code`; registering the same identifier twice for one code
    /// deduplicates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] if the pattern does not
    /// parse.
    pub fn register(&mut self, pattern: &str, code: RouteCode) -> Result<()> {
        let pattern = RoutePattern::parse(pattern)?;
        self.reverse
            .entry(code)
            .or_default()
            .insert(pattern.identifier());
        self.entries.push(RouteEntry { pattern, code });
        Ok(())
    }

    /// Resolve an identifier to its route code.
    ///
    /// When several patterns match, the most specific wins: exact literals
    /// beat single-segment wildcards beat the trailing multi-segment
    /// wildcard, compared leftmost segment first. Equally specific
    /// patterns resolve to the earliest registration.
    pub fn matches(&self, identifier: &ResourceIdentifier) -> Option<RouteCode> {
        let mut best: Option<(RouteCode, Vec<u8>)> = None;
        for entry in &self.entries {
            if !entry.pattern.matches(identifier) {
                continue;
            }
            let specificity = entry.pattern.specificity();
            match &best {
                // Strictly-greater keeps the earliest registration on ties.
                Some((_, current)) if *current >= specificity => {}
                _ => best = Some((entry.code, specificity)),
            }
        }
        best.map(|(code, _)| code)
    }

    /// The ordered, deduplicated identifiers sharing a route code.
    pub fn identifiers_for_code(
        &self,
        code: RouteCode,
    ) -> impl Iterator<Item = &ResourceIdentifier> {
        self.reverse.get(&code).into_iter().flatten()
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no patterns are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
