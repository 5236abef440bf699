//! Free-form identifier resolution.
//!
//! An [`EntityResolver`] owns one immutable [`AliasTable`] and one
//! [`IdPattern`]. Lookups are exact: an identifier either matches an alias,
//! or is itself a syntactically valid canonical id, or it is rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Could not resolve {kind} '{identifier}': {hint}")]
    UnresolvedEntity {
        kind: &'static str,
        identifier: String,
        hint: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Alias '{alias}' already maps to {existing}, refusing to map it to {requested}")]
pub struct AliasConflict {
    pub alias: String,
    pub existing: String,
    pub requested: String,
}

/// Result of a successful resolution, scoped to one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntity {
    pub canonical_id: String,
    pub source_identifier: String,
}

/// Normalized alias -> canonical id mapping (many-to-one)
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias. Re-adding the same alias for the same id is a no-op; an
    /// alias that already points at a different id is rejected.
    pub fn insert(
        &mut self,
        alias: &str,
        canonical_id: impl Into<String>,
    ) -> Result<(), AliasConflict> {
        let key = normalize_identifier(alias);
        let canonical_id = canonical_id.into();

        match self.aliases.get(&key) {
            Some(existing) if *existing != canonical_id => Err(AliasConflict {
                alias: key,
                existing: existing.clone(),
                requested: canonical_id,
            }),
            Some(_) => Ok(()),
            None => {
                self.aliases.insert(key, canonical_id);
                Ok(())
            }
        }
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(&normalize_identifier(alias)).map(String::as_str)
    }

    /// Iterate over `(normalized alias, canonical id)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Syntax of a canonical id for one entity domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPattern {
    range: Option<RangeInclusive<u64>>,
}

impl IdPattern {
    /// Any run of ASCII digits
    pub fn digits() -> Self {
        Self { range: None }
    }

    /// ASCII digits whose value lies inside `range`
    pub fn bounded(range: RangeInclusive<u64>) -> Self {
        Self { range: Some(range) }
    }

    /// Canonical form of `raw` when it is a valid id. The raw identifier is
    /// checked as given: surrounding whitespace makes it invalid.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let value: u64 = raw.parse().ok()?;
        match &self.range {
            Some(range) if !range.contains(&value) => None,
            _ => Some(value.to_string()),
        }
    }

    fn describe(&self) -> String {
        match &self.range {
            Some(range) => format!("a numeric id between {} and {}", range.start(), range.end()),
            None => "a numeric id".to_string(),
        }
    }
}

/// Maps user supplied identifiers to canonical provider ids
#[derive(Debug, Clone)]
pub struct EntityResolver {
    kind: &'static str,
    table: AliasTable,
    pattern: IdPattern,
    examples: Vec<String>,
}

impl EntityResolver {
    pub fn new(kind: &'static str, table: AliasTable, pattern: IdPattern) -> Self {
        Self {
            kind,
            table,
            pattern,
            examples: Vec::new(),
        }
    }

    /// Example identifiers quoted back to callers when resolution fails
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn resolve(&self, identifier: &str) -> Result<ResolvedEntity, ResolveError> {
        let canonical_id = self
            .table
            .get(identifier)
            .map(str::to_string)
            .or_else(|| self.pattern.canonicalize(identifier));

        match canonical_id {
            Some(canonical_id) => {
                debug!("🔎 Resolved {} '{}' -> {}", self.kind, identifier, canonical_id);
                Ok(ResolvedEntity {
                    canonical_id,
                    source_identifier: identifier.to_string(),
                })
            }
            None => Err(ResolveError::UnresolvedEntity {
                kind: self.kind,
                identifier: identifier.to_string(),
                hint: self.hint(),
            }),
        }
    }

    fn hint(&self) -> String {
        let mut hint = if self.table.is_empty() {
            format!("expected {}", self.pattern.describe())
        } else {
            format!(
                "expected a {} name, city or abbreviation, or {}",
                self.kind,
                self.pattern.describe()
            )
        };

        if !self.examples.is_empty() {
            hint.push_str(&format!(" (e.g. {})", self.quoted_examples()));
        }
        hint
    }

    fn quoted_examples(&self) -> String {
        self.examples
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Trim and lower-case an identifier before alias lookup
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
