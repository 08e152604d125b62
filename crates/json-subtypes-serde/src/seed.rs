//! `DeserializeSeed` adapters, for plugging polymorphic values into a host's
//! own `Deserialize` impls or into a streaming deserializer.

use std::fmt;

use json_subtypes::TypeDescriptor;
use serde::de::{DeserializeSeed, Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;

use crate::materializer::MaterializeCtx;

/// Buffers one value, then resolves and builds it as `base`.
pub struct PolymorphicSeed<'m, T> {
    ctx: MaterializeCtx<'m, T>,
    base: TypeDescriptor,
}

impl<'m, T> PolymorphicSeed<'m, T> {
    /// Seed continuing an existing call, e.g. from inside a constructor.
    pub fn new(ctx: MaterializeCtx<'m, T>, base: TypeDescriptor) -> Self {
        Self { ctx, base }
    }
}

impl<T> fmt::Debug for PolymorphicSeed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicSeed")
            .field("base", &self.base)
            .field("depth", &self.ctx.depth())
            .finish()
    }
}

impl<'de, T> DeserializeSeed<'de> for PolymorphicSeed<'_, T> {
    type Value = T;

    fn deserialize<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        self.ctx.deserialize(&value, &self.base).map_err(D::Error::custom)
    }
}

/// Buffers one array, then resolves and builds each element.
pub struct PolymorphicSeqSeed<'m, T> {
    ctx: MaterializeCtx<'m, T>,
    container: TypeDescriptor,
}

impl<'m, T> PolymorphicSeqSeed<'m, T> {
    pub fn new(ctx: MaterializeCtx<'m, T>, container: TypeDescriptor) -> Self {
        Self { ctx, container }
    }
}

impl<T> fmt::Debug for PolymorphicSeqSeed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicSeqSeed")
            .field("container", &self.container)
            .field("depth", &self.ctx.depth())
            .finish()
    }
}

impl<'de, T> DeserializeSeed<'de> for PolymorphicSeqSeed<'_, T> {
    type Value = Option<Vec<Option<T>>>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        self.ctx
            .deserialize_seq(&value, &self.container)
            .map_err(D::Error::custom)
    }
}
