//! Resolution chain driver and the frozen subtype registry.
//!
//! Resolving a base type may produce a type that declares a rule of its own
//! (`Payload` -> `Game` -> `Run`). The driver keeps applying rules until it
//! reaches a type without a rule, a step that changes nothing, or a type it
//! has already produced in this call.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::config::HostConfig;
use crate::error::{ConfigError, ResolveError};
use crate::registry::TypeRegistry;
use crate::resolver::{ResolveCtx, ResolveStep};
use crate::rule::Rule;
use crate::type_desc::TypeDescriptor;
use crate::view::JsonView;

/// Outcome of a chain walk, before any instantiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Last type reached.
    pub ty: TypeDescriptor,
    /// Every type produced, starting with the requested base.
    pub path: Vec<TypeDescriptor>,
    /// The walk stopped because a rule produced an already visited type.
    pub cyclic: bool,
}

impl Resolution {
    /// Whether the final type can be handed to the host deserializer.
    pub fn is_instantiable(&self) -> bool {
        !self.ty.is_abstract()
    }
}

/// Immutable `type -> rule` table plus the by-name type registry.
///
/// Built once through [`SubtypesBuilder`]; resolution only reads it, so one
/// instance can be shared across threads (`Arc<Subtypes>`).
#[derive(Debug, Clone, Default)]
pub struct Subtypes {
    types: TypeRegistry,
    rules: HashMap<TypeDescriptor, Rule>,
}

impl Subtypes {
    pub fn builder() -> SubtypesBuilder {
        SubtypesBuilder::default()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The rule declared on `ty`, if any.
    pub fn rule_for(&self, ty: &TypeDescriptor) -> Option<&Rule> {
        self.rules.get(ty)
    }

    pub fn has_rule(&self, ty: &TypeDescriptor) -> bool {
        self.rules.contains_key(ty)
    }

    /// Walks the rule chain from `base` without judging the final type.
    ///
    /// Only configuration-shape errors (ambiguous probes in strict rules,
    /// unreadable by-name discriminators) are returned as errors; "no match"
    /// ends the walk on the current type.
    pub fn resolve_type<V: JsonView>(
        &self,
        document: &V,
        base: &TypeDescriptor,
        config: &HostConfig,
    ) -> Result<Resolution, ResolveError> {
        let ctx = ResolveCtx {
            config,
            types: &self.types,
        };
        let mut current = base.clone();
        let mut visited: HashSet<TypeDescriptor> = HashSet::from([base.clone()]);
        let mut path = vec![base.clone()];
        let mut cyclic = false;

        while let Some(rule) = self.rules.get(&current) {
            let next = match rule.kind.resolve_step(&current, document, ctx)? {
                Some(next) => next,
                None => match &rule.fallback {
                    Some(fallback) => {
                        debug!(
                            base = %current,
                            fallback = %fallback,
                            "no subtype matched, using fallback"
                        );
                        fallback.clone()
                    }
                    None => break,
                },
            };
            if next == current {
                break;
            }
            if !visited.insert(next.clone()) {
                debug!(from = %current, to = %next, "subtype cycle detected");
                cyclic = true;
                break;
            }
            trace!(from = %current, to = %next, "subtype step");
            path.push(next.clone());
            current = next;
        }

        Ok(Resolution {
            ty: current,
            path,
            cyclic,
        })
    }

    /// Resolves the most specific instantiable type for `document`.
    ///
    /// A chain ending on an abstract type (no matching rule under an abstract
    /// base, or a circular mapping) fails with
    /// [`ResolveError::NoInstantiableSubtype`] naming `base`.
    pub fn resolve<V: JsonView>(
        &self,
        document: &V,
        base: &TypeDescriptor,
        config: &HostConfig,
    ) -> Result<TypeDescriptor, ResolveError> {
        let resolution = self.resolve_type(document, base, config)?;
        if !resolution.is_instantiable() {
            return Err(ResolveError::NoInstantiableSubtype {
                base: base.name().to_string(),
                cyclic: resolution.cyclic,
            });
        }
        Ok(resolution.ty)
    }
}

/// Single-threaded registration phase for [`Subtypes`].
///
/// ```
/// use json_subtypes::{HostConfig, Rule, Subtypes, TypeDescriptor};
/// use serde_json::json;
///
/// let animal = TypeDescriptor::object("Animal").abstract_().build();
/// let dog = TypeDescriptor::object("Dog").extends(&animal).build();
///
/// let subtypes = Subtypes::builder()
///     .rule(Rule::discriminator(&animal, "kind").map("dog", &dog).build()?)?
///     .build();
///
/// let ty = subtypes.resolve(&json!({"kind": "dog"}), &animal, &HostConfig::default())?;
/// assert_eq!(ty, dog);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct SubtypesBuilder {
    types: TypeRegistry,
    rules: HashMap<TypeDescriptor, Rule>,
}

impl SubtypesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type for by-name discriminators.
    pub fn register(mut self, ty: &TypeDescriptor) -> Result<Self, ConfigError> {
        self.types.register(ty)?;
        Ok(self)
    }

    /// Registers several types.
    pub fn register_all<'a, I>(mut self, types: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a TypeDescriptor>,
    {
        for ty in types {
            self.types.register(ty)?;
        }
        Ok(self)
    }

    /// Adds the rule of one base type. The base, its targets and its fallback
    /// are registered as types as well.
    pub fn rule(mut self, rule: Rule) -> Result<Self, ConfigError> {
        if self.rules.contains_key(rule.base()) {
            return Err(ConfigError::DuplicateRule {
                base: rule.base().name().to_string(),
            });
        }
        self.types.register(rule.base())?;
        for target in rule.targets() {
            self.types.register(target)?;
        }
        self.rules.insert(rule.base().clone(), rule);
        Ok(self)
    }

    pub fn build(self) -> Subtypes {
        Subtypes {
            types: self.types,
            rules: self.rules,
        }
    }
}
