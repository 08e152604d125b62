//! Hand-off from a resolved type to serde.
//!
//! A [`Materializer`] maps concrete type descriptors to functions building the
//! host value from the raw JSON. Nested polymorphic values re-enter through
//! the [`MaterializeCtx`] passed to those functions, which carries the call's
//! depth; nothing is kept in shared or global state.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use json_subtypes::{locate_property, HostConfig, Subtypes, TypeDescriptor};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::error::DeError;
use crate::seed::{PolymorphicSeed, PolymorphicSeqSeed};

/// Builds a `T` from the raw JSON of one concrete type.
pub type MaterializeFn<T> =
    Arc<dyn Fn(&Value, &MaterializeCtx<'_, T>) -> Result<T, DeError> + Send + Sync>;

/// Concrete type -> constructor table over a frozen [`Subtypes`] registry.
pub struct Materializer<T> {
    subtypes: Arc<Subtypes>,
    config: HostConfig,
    table: HashMap<TypeDescriptor, MaterializeFn<T>>,
}

impl<T> fmt::Debug for Materializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.table.keys().map(|t| t.name()).collect();
        types.sort_unstable();
        f.debug_struct("Materializer")
            .field("config", &self.config)
            .field("types", &types)
            .finish()
    }
}

impl<T> Materializer<T> {
    pub fn new(subtypes: Arc<Subtypes>, config: HostConfig) -> Self {
        Self {
            subtypes,
            config,
            table: HashMap::new(),
        }
    }

    /// Registers a constructor for the concrete type `ty`.
    pub fn register<F>(mut self, ty: &TypeDescriptor, f: F) -> Self
    where
        F: Fn(&Value, &MaterializeCtx<'_, T>) -> Result<T, DeError> + Send + Sync + 'static,
    {
        self.table.insert(ty.clone(), Arc::new(f));
        self
    }

    /// Registers `S`'s serde implementation for `ty`.
    pub fn register_serde<S>(self, ty: &TypeDescriptor) -> Self
    where
        S: DeserializeOwned + Into<T> + 'static,
    {
        self.register(ty, |value, _| Ok(S::deserialize(value)?.into()))
    }

    pub fn subtypes(&self) -> &Subtypes {
        &self.subtypes
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn is_materializable(&self, ty: &TypeDescriptor) -> bool {
        self.table.contains_key(ty)
    }

    /// Fresh context for one top-level call.
    pub fn ctx(&self) -> MaterializeCtx<'_, T> {
        MaterializeCtx {
            materializer: self,
            depth: 0,
        }
    }

    /// Resolves the concrete type of `value` under `base` and builds it.
    pub fn deserialize(&self, value: &Value, base: &TypeDescriptor) -> Result<T, DeError> {
        self.ctx().deserialize(value, base)
    }

    /// Builds every element of a JSON array declared as `container`.
    pub fn deserialize_seq(
        &self,
        value: &Value,
        container: &TypeDescriptor,
    ) -> Result<Option<Vec<Option<T>>>, DeError> {
        self.ctx().deserialize_seq(value, container)
    }

    pub fn from_str(&self, text: &str, base: &TypeDescriptor) -> Result<T, DeError> {
        let value: Value = serde_json::from_str(text)?;
        self.deserialize(&value, base)
    }

    /// Reads one JSON value from `reader`, then resolves and builds it.
    pub fn from_reader<R: Read>(&self, reader: R, base: &TypeDescriptor) -> Result<T, DeError> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let value = Value::deserialize(&mut de)?;
        de.end()?;
        self.deserialize(&value, base)
    }

    /// A `DeserializeSeed` producing `T` from any serde deserializer.
    pub fn seed(&self, base: &TypeDescriptor) -> PolymorphicSeed<'_, T> {
        PolymorphicSeed::new(self.ctx(), base.clone())
    }

    /// A `DeserializeSeed` producing the elements of a polymorphic container.
    pub fn seq_seed(&self, container: &TypeDescriptor) -> PolymorphicSeqSeed<'_, T> {
        PolymorphicSeqSeed::new(self.ctx(), container.clone())
    }

    fn constructor(&self, ty: &TypeDescriptor) -> Result<&MaterializeFn<T>, DeError> {
        self.table.get(ty).ok_or_else(|| DeError::NotMaterializable {
            ty: ty.name().to_string(),
        })
    }
}

/// Call-scoped state threaded through nested hand-offs.
pub struct MaterializeCtx<'m, T> {
    materializer: &'m Materializer<T>,
    depth: usize,
}

impl<T> Clone for MaterializeCtx<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MaterializeCtx<'_, T> {}

impl<T> fmt::Debug for MaterializeCtx<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializeCtx")
            .field("depth", &self.depth)
            .finish()
    }
}

impl<'m, T> MaterializeCtx<'m, T> {
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn config(&self) -> &'m HostConfig {
        &self.materializer.config
    }

    pub fn materializer(&self) -> &'m Materializer<T> {
        self.materializer
    }

    fn nested(&self) -> Result<Self, DeError> {
        let limit = self.materializer.config.max_depth;
        if self.depth >= limit {
            return Err(DeError::DepthExceeded { limit });
        }
        Ok(Self {
            materializer: self.materializer,
            depth: self.depth + 1,
        })
    }

    /// Resolves and builds `value` declared as `base`.
    pub fn deserialize(&self, value: &Value, base: &TypeDescriptor) -> Result<T, DeError> {
        let inner = self.nested()?;
        let m = self.materializer;
        let ty = m.subtypes.resolve(value, base, &m.config)?;
        trace!(base = %base, ty = %ty, depth = self.depth, "materializing");
        let construct = m.constructor(&ty)?;
        construct(value, &inner)
    }

    /// Builds an optional polymorphic field of `object`. Absent and `null`
    /// fields yield `None`. `key` is matched with the host's case and naming
    /// settings, dotted paths included.
    pub fn deserialize_field(
        &self,
        object: &Value,
        key: &str,
        base: &TypeDescriptor,
    ) -> Result<Option<T>, DeError> {
        match locate_property(object, key, self.config()) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.deserialize(value, base).map(Some),
        }
    }

    /// Builds each element of a JSON array declared as `container`.
    ///
    /// `null` elements and elements without an instantiable type stay `None`.
    /// Scalar elements are built like any other once their type resolves.
    pub fn deserialize_seq(
        &self,
        value: &Value,
        container: &TypeDescriptor,
    ) -> Result<Option<Vec<Option<T>>>, DeError> {
        let inner = self.nested()?;
        let m = self.materializer;
        let Some(resolved) = m.subtypes.resolve_elements(value, container, &m.config)? else {
            return Ok(None);
        };
        let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for (item, ty) in items.iter().zip(resolved.elements) {
            match ty {
                Some(ty) => {
                    let construct = m.constructor(&ty)?;
                    out.push(Some(construct(item, &inner)?));
                }
                None => out.push(None),
            }
        }
        Ok(Some(out))
    }
}
