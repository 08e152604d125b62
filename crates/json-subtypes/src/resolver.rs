//! Single resolution step: one rule applied to one document.
//!
//! `Ok(None)` means "no resolution"; the chain driver then falls back to the
//! rule's fallback type or stops on the current type.

use tracing::debug;

use crate::config::HostConfig;
use crate::error::ResolveError;
use crate::locator::locate_property;
use crate::match_value::MatchValue;
use crate::registry::TypeRegistry;
use crate::rule::{DiscriminatorRule, PresenceRule, ProbeEntry, RuleKind};
use crate::type_desc::TypeDescriptor;
use crate::view::JsonView;

/// Per-call context handed down through one resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveCtx<'a> {
    pub config: &'a HostConfig,
    pub types: &'a TypeRegistry,
}

/// A resolver kind. Implemented by the two rule bodies and dispatched through
/// [`RuleKind`].
pub trait ResolveStep {
    fn resolve_step<V: JsonView>(
        &self,
        base: &TypeDescriptor,
        object: &V,
        ctx: ResolveCtx<'_>,
    ) -> Result<Option<TypeDescriptor>, ResolveError>;
}

impl ResolveStep for RuleKind {
    fn resolve_step<V: JsonView>(
        &self,
        base: &TypeDescriptor,
        object: &V,
        ctx: ResolveCtx<'_>,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        match self {
            RuleKind::Discriminator(rule) => rule.resolve_step(base, object, ctx),
            RuleKind::Presence(rule) => rule.resolve_step(base, object, ctx),
        }
    }
}

impl ResolveStep for DiscriminatorRule {
    fn resolve_step<V: JsonView>(
        &self,
        base: &TypeDescriptor,
        object: &V,
        ctx: ResolveCtx<'_>,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        let Some(found) = locate_property(object, &self.property, ctx.config) else {
            return Ok(None);
        };
        if found.is_null() {
            return Ok(self.lookup(&MatchValue::Null).cloned());
        }

        if self.is_by_name() {
            let Some(name) = found.as_str() else {
                return Err(ResolveError::UnsupportedDiscriminatorShape {
                    base: base.name().to_string(),
                    property: self.property.clone(),
                    kind: found.kind(),
                });
            };
            let resolved = ctx.types.resolve_subtype_name(base, name);
            if resolved.is_none() {
                debug!(base = %base, name, "unknown type name in discriminator");
            }
            return Ok(resolved);
        }

        // A table holding only a null entry has no comparison type.
        let Some(kind) = &self.key_kind else {
            return Ok(None);
        };
        let Some(key) = kind.convert(found, ctx.config) else {
            debug!(
                base = %base,
                property = %self.property,
                kind = %found.kind(),
                "discriminator value does not convert"
            );
            return Ok(None);
        };
        let target = self.lookup(&key).cloned();
        if target.is_none() {
            debug!(base = %base, value = %key, "unmapped discriminator value");
        }
        Ok(target)
    }
}

impl PresenceRule {
    /// All probes whose property is present, in declaration order.
    pub fn matching_probes<'r, V: JsonView>(
        &'r self,
        object: &V,
        config: &HostConfig,
    ) -> Vec<&'r ProbeEntry> {
        self.probes
            .iter()
            .filter(|probe| locate_property(object, &probe.path, config).is_some())
            .collect()
    }

    /// Distinct targets of all matching probes, in declaration order.
    pub fn matching_targets<V: JsonView>(
        &self,
        object: &V,
        config: &HostConfig,
    ) -> Vec<TypeDescriptor> {
        let mut targets: Vec<TypeDescriptor> = Vec::new();
        for probe in self.matching_probes(object, config) {
            if !targets.contains(&probe.target) {
                targets.push(probe.target.clone());
            }
        }
        targets
    }

    fn first_match<V: JsonView>(&self, object: &V, config: &HostConfig) -> Option<TypeDescriptor> {
        self.probes
            .iter()
            .find(|probe| locate_property(object, &probe.path, config).is_some())
            .map(|probe| probe.target.clone())
    }

    fn unambiguous_match<V: JsonView>(
        &self,
        base: &TypeDescriptor,
        object: &V,
        config: &HostConfig,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        let mut targets: Vec<TypeDescriptor> = Vec::new();
        for probe in &self.probes {
            if locate_property(object, &probe.path, config).is_none() {
                continue;
            }
            if probe.stop_on_match {
                return Ok(Some(probe.target.clone()));
            }
            if !targets.contains(&probe.target) {
                targets.push(probe.target.clone());
            }
        }
        match targets.len() {
            0 | 1 => Ok(targets.pop()),
            _ => {
                debug!(base = %base, candidates = targets.len(), "ambiguous property probes");
                Err(ResolveError::AmbiguousTypeResolution {
                    base: base.name().to_string(),
                    candidates: targets.iter().map(|t| t.name().to_string()).collect(),
                })
            }
        }
    }
}

impl ResolveStep for PresenceRule {
    fn resolve_step<V: JsonView>(
        &self,
        base: &TypeDescriptor,
        object: &V,
        ctx: ResolveCtx<'_>,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        if !object.is_object() {
            return Ok(None);
        }
        if self.strict {
            self.unambiguous_match(base, object, ctx.config)
        } else {
            Ok(self.first_match(object, ctx.config))
        }
    }
}
