//! Name -> type registry used for by-name discriminators.
//!
//! Populated once at startup from the same declarations used for explicit
//! mappings; resolution only reads it.

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::naming::eq_ignore_case;
use crate::type_desc::TypeDescriptor;

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ty` under its full name. Registering the same handle twice
    /// is a no-op; a different descriptor under a taken name is an error.
    pub fn register(&mut self, ty: &TypeDescriptor) -> Result<(), ConfigError> {
        if let Some(existing) = self.types.get(ty.name()) {
            if existing.ptr_eq(ty) {
                return Ok(());
            }
            return Err(ConfigError::DuplicateTypeName {
                name: ty.name().to_string(),
            });
        }
        self.types.insert(ty.name().to_string(), ty.clone());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Resolves a discriminator type name against `base`.
    ///
    /// The name is first taken as a full name within the base's module, then
    /// as a name relative to the base's namespace (compared case-insensitively).
    /// Only subtypes of `base` qualify.
    pub fn resolve_subtype_name(
        &self,
        base: &TypeDescriptor,
        name: &str,
    ) -> Option<TypeDescriptor> {
        let direct = self
            .types
            .get(name)
            .filter(|ty| ty.module() == base.module());
        let candidate = match direct {
            Some(ty) => ty,
            None => {
                let qualified = if base.namespace().is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{}", base.namespace(), name)
                };
                self.types.values().find(|ty| {
                    ty.module() == base.module() && eq_ignore_case(ty.name(), &qualified)
                })?
            }
        };
        if candidate.is_assignable_to(base) {
            Some(candidate.clone())
        } else {
            tracing::debug!(base = %base, candidate = %candidate, "named type is not a subtype");
            None
        }
    }
}
