use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Location, PovError, PovResult};

/// Canonical name of the bucket that absorbs characters left out of a chart.
pub const OTHER: &str = "Other";

/// Returns `true` if `alias` names a character under an alternate identity.
///
/// Alternate identities are written with a parenthesised qualifier, e.g.
/// `Harry (Polyjuice)`.
pub fn is_alternate_identity(alias: &str) -> bool {
    alias.contains('(')
}

/// Alias → canonical name lookup loaded from the character table.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    canonical: BTreeMap<String, String>,
    alternates: BTreeSet<String>,
    /// Canonical names in first-seen order.
    order: Vec<String>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a lookup table of `alias;canonical_name` lines.
    ///
    /// `source` labels the table in error messages. Blank lines are skipped.
    /// The table must define an `Other` character.
    pub fn parse(source: &str, text: &str) -> PovResult<Self> {
        let mut registry = Self::new();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let location = Some(Location::new(source, idx + 1));
            let fields: Vec<&str> = line.split(';').map(str::trim).collect();
            if fields.len() != 2 {
                return Err(PovError::MalformedLine {
                    location,
                    reason: format!("expected 2 fields, found {}", fields.len()),
                });
            }
            if fields[0].is_empty() || fields[1].is_empty() {
                return Err(PovError::MalformedLine {
                    location,
                    reason: "alias and canonical name must not be empty".into(),
                });
            }
            registry.insert(fields[0], fields[1]);
        }

        if !registry.contains_name(OTHER) {
            return Err(PovError::MissingOtherBucket);
        }

        tracing::debug!(
            source,
            aliases = registry.canonical.len(),
            alternates = registry.alternates.len(),
            characters = registry.order.len(),
            "loaded name registry"
        );
        Ok(registry)
    }

    /// Register `alias` as a name for `canonical`.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        if is_alternate_identity(alias) {
            self.alternates.insert(alias.to_string());
        }
        if !self.order.iter().any(|name| name == canonical) {
            self.order.push(canonical.to_string());
        }
        let previous = self
            .canonical
            .insert(alias.to_string(), canonical.to_string());
        if let Some(previous) = previous.filter(|p| p != canonical) {
            tracing::warn!(alias, previous = %previous, canonical, "alias redefined");
        }
    }

    /// Resolve an alias to its canonical name.
    pub fn resolve(&self, alias: &str) -> PovResult<&str> {
        self.canonical
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| PovError::UnknownAlias {
                alias: alias.to_string(),
                location: None,
            })
    }

    /// Aliases that denote an alternate identity, sorted.
    pub fn alternate_identities(&self) -> impl Iterator<Item = &str> {
        self.alternates.iter().map(String::as_str)
    }

    /// Canonical names in the order they first appear in the table.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every name a scene can be attributed to: alternate identities plus
    /// canonical names.
    pub fn known_names(&self) -> BTreeSet<&str> {
        self.alternate_identities()
            .chain(self.canonical_names())
            .collect()
    }

    /// Returns `true` if `name` is a canonical name or an alternate identity.
    pub fn contains_name(&self, name: &str) -> bool {
        self.alternates.contains(name) || self.order.iter().any(|n| n == name)
    }

    /// All aliases mapping to `canonical`, sorted.
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        self.canonical
            .iter()
            .filter(|(_, c)| c.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    /// Number of aliases.
    pub fn alias_count(&self) -> usize {
        self.canonical.len()
    }

    /// Number of distinct canonical names.
    pub fn character_count(&self) -> usize {
        self.order.len()
    }
}
