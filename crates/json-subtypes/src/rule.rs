//! Subtype rules declared on a base type.
//!
//! A rule is either discriminator-value based (a named property whose value is
//! mapped to a subtype, or read as a type name when no mapping is declared) or
//! property-presence based (ordered probes, first present property wins).
//! Rules are built once through [`RuleBuilder`] and are immutable afterwards.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::match_value::{MatchKind, MatchValue};
use crate::type_desc::TypeDescriptor;

/// `value -> target` pair of a discriminator mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub value: MatchValue,
    pub target: TypeDescriptor,
}

/// `property path -> target` pair of a presence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEntry {
    /// Property name or dotted path.
    pub path: String,
    pub target: TypeDescriptor,
    /// In strict mode, a match on this probe ends the scan immediately.
    pub stop_on_match: bool,
}

/// Discriminator-value rule body.
#[derive(Debug, Clone)]
pub struct DiscriminatorRule {
    pub(crate) property: String,
    pub(crate) entries: Vec<MappingEntry>,
    pub(crate) index: HashMap<MatchValue, usize>,
    /// Comparison type, fixed by the first non-null entry.
    pub(crate) key_kind: Option<MatchKind>,
}

impl DiscriminatorRule {
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Without entries the discriminator value is read as a type name.
    pub fn is_by_name(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_kind(&self) -> Option<&MatchKind> {
        self.key_kind.as_ref()
    }

    pub fn lookup(&self, value: &MatchValue) -> Option<&TypeDescriptor> {
        self.index.get(value).map(|&i| &self.entries[i].target)
    }
}

/// Property-presence rule body.
#[derive(Debug, Clone)]
pub struct PresenceRule {
    pub(crate) probes: Vec<ProbeEntry>,
    pub(crate) strict: bool,
}

impl PresenceRule {
    /// Probes in declaration order; the order is the tie-break.
    pub fn probes(&self) -> &[ProbeEntry] {
        &self.probes
    }

    /// Strict rules reject documents matching probes of different targets.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    Discriminator(DiscriminatorRule),
    Presence(PresenceRule),
}

/// The subtype rule of one base type.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) base: TypeDescriptor,
    pub(crate) kind: RuleKind,
    pub(crate) fallback: Option<TypeDescriptor>,
}

impl Rule {
    /// Starts a discriminator-value rule reading `property`.
    pub fn discriminator(base: &TypeDescriptor, property: impl Into<String>) -> RuleBuilder {
        RuleBuilder::new(base, Some(property.into()))
    }

    /// Starts a property-presence rule.
    pub fn presence(base: &TypeDescriptor) -> RuleBuilder {
        RuleBuilder::new(base, None)
    }

    pub fn base(&self) -> &TypeDescriptor {
        &self.base
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn fallback(&self) -> Option<&TypeDescriptor> {
        self.fallback.as_ref()
    }

    /// Every type this rule can produce, fallback included.
    pub fn targets(&self) -> Vec<&TypeDescriptor> {
        let mut out: Vec<&TypeDescriptor> = match &self.kind {
            RuleKind::Discriminator(d) => d.entries.iter().map(|e| &e.target).collect(),
            RuleKind::Presence(p) => p.probes.iter().map(|e| &e.target).collect(),
        };
        out.extend(self.fallback.as_ref());
        out
    }
}

/// Builder for [`Rule`]. Validation happens in [`RuleBuilder::build`].
///
/// ```
/// use json_subtypes::{Rule, TypeDescriptor};
///
/// let animal = TypeDescriptor::object("Animal").abstract_().build();
/// let dog = TypeDescriptor::object("Dog").extends(&animal).build();
/// let cat = TypeDescriptor::object("Cat").extends(&animal).build();
///
/// let rule = Rule::discriminator(&animal, "kind")
///     .map("dog", &dog)
///     .map("cat", &cat)
///     .build()
///     .unwrap();
/// assert_eq!(rule.targets().len(), 2);
/// ```
#[derive(Debug)]
pub struct RuleBuilder {
    base: TypeDescriptor,
    property: Option<String>,
    mappings: Vec<MappingEntry>,
    probes: Vec<ProbeEntry>,
    strict: bool,
    fallback: Option<TypeDescriptor>,
}

impl RuleBuilder {
    fn new(base: &TypeDescriptor, property: Option<String>) -> Self {
        Self {
            base: base.clone(),
            property,
            mappings: Vec::new(),
            probes: Vec::new(),
            strict: false,
            fallback: None,
        }
    }

    /// Maps a discriminator value to `target`.
    pub fn map(mut self, value: impl Into<MatchValue>, target: &TypeDescriptor) -> Self {
        self.mappings.push(MappingEntry {
            value: value.into(),
            target: target.clone(),
        });
        self
    }

    /// Maps an explicit JSON `null` discriminator to `target`.
    pub fn map_null(self, target: &TypeDescriptor) -> Self {
        self.map(MatchValue::Null, target)
    }

    /// Adds a presence probe: `target` is chosen when `path` is present.
    pub fn probe(mut self, path: impl Into<String>, target: &TypeDescriptor) -> Self {
        self.probes.push(ProbeEntry {
            path: path.into(),
            target: target.clone(),
            stop_on_match: false,
        });
        self
    }

    /// Adds a presence probe that ends a strict scan when it matches.
    pub fn probe_stop(mut self, path: impl Into<String>, target: &TypeDescriptor) -> Self {
        self.probes.push(ProbeEntry {
            path: path.into(),
            target: target.clone(),
            stop_on_match: true,
        });
        self
    }

    /// Collect every matching probe and reject ambiguous documents.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Type used when no entry matches.
    pub fn fallback(mut self, fallback: &TypeDescriptor) -> Self {
        self.fallback = Some(fallback.clone());
        self
    }

    pub fn build(self) -> Result<Rule, ConfigError> {
        let base_name = self.base.name().to_string();
        let kind = match self.property {
            Some(property) => {
                if !self.probes.is_empty() {
                    return Err(ConfigError::MixedProbeAndMapping { base: base_name });
                }
                if property.is_empty() {
                    return Err(ConfigError::EmptyDiscriminatorProperty { base: base_name });
                }
                let mut index = HashMap::with_capacity(self.mappings.len());
                for (i, entry) in self.mappings.iter().enumerate() {
                    if index.insert(entry.value.clone(), i).is_some() {
                        return Err(ConfigError::DuplicateMatchValue {
                            base: base_name,
                            value: entry.value.to_string(),
                        });
                    }
                }
                let key_kind = self.mappings.iter().find_map(|e| e.value.kind());
                RuleKind::Discriminator(DiscriminatorRule {
                    property,
                    entries: self.mappings,
                    index,
                    key_kind,
                })
            }
            None => {
                if !self.mappings.is_empty() {
                    return Err(ConfigError::MixedProbeAndMapping { base: base_name });
                }
                for (i, probe) in self.probes.iter().enumerate() {
                    if probe.path.is_empty() {
                        return Err(ConfigError::EmptyProbePath { base: base_name });
                    }
                    let repeated = self.probes[..i]
                        .iter()
                        .any(|p| p.path == probe.path && p.target == probe.target);
                    if repeated {
                        return Err(ConfigError::DuplicateProbe {
                            base: base_name,
                            path: probe.path.clone(),
                            target: probe.target.name().to_string(),
                        });
                    }
                }
                RuleKind::Presence(PresenceRule {
                    probes: self.probes,
                    strict: self.strict,
                })
            }
        };
        Ok(Rule {
            base: self.base,
            kind,
            fallback: self.fallback,
        })
    }
}
