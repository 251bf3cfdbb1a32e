//! Externally-published field name mapping

/// Ordered mapping from internal field identifiers to the field names
/// published to API consumers.
///
/// Each entity type owns one statically declared table; lookups are plain
/// linear scans over a handful of entries. When no mapping exists for an
/// identifier the internal name is returned unchanged, so a gap in the
/// table degrades an error message rather than failing a write that
/// already carries user-facing violations. `is_complete` lets wiring code
/// turn coverage into a construction-time assertion instead.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    /// Build a map over a static table of `(internal, external)` pairs.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        FieldMap { entries }
    }

    /// Externally-published name for an internal field identifier,
    /// falling back to the internal identifier when unmapped.
    pub fn external_name<'a>(&self, internal: &'a str) -> &'a str {
        for (known, external) in self.entries {
            if *known == internal {
                return external;
            }
        }
        tracing::debug!(field = internal, "no external mapping for field, using internal name");
        internal
    }

    /// Whether an explicit mapping exists for the identifier.
    pub fn contains(&self, internal: &str) -> bool {
        self.entries.iter().any(|(known, _)| *known == internal)
    }

    /// True when every given internal identifier has an explicit mapping.
    pub fn is_complete(&self, internals: &[&str]) -> bool {
        internals.iter().all(|internal| self.contains(internal))
    }

    /// Number of declared mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table declares no mappings at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
