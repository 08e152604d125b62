//! Registration-time and resolution-time errors.

use thiserror::Error;

use crate::view::ValueKind;

/// Errors raised while building rules or the subtype registry.
///
/// These are configuration mistakes; they never depend on a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate discriminator value {value} for base type `{base}`")]
    DuplicateMatchValue { base: String, value: String },
    #[error("probe `{path}` -> `{target}` declared twice for base type `{base}`")]
    DuplicateProbe {
        base: String,
        path: String,
        target: String,
    },
    #[error("empty probe property path for base type `{base}`")]
    EmptyProbePath { base: String },
    #[error("empty discriminator property name for base type `{base}`")]
    EmptyDiscriminatorProperty { base: String },
    #[error("base type `{base}` mixes discriminator mappings with property probes")]
    MixedProbeAndMapping { base: String },
    #[error("base type `{base}` already declares a subtype rule")]
    DuplicateRule { base: String },
    #[error("type name `{name}` registered twice with different descriptors")]
    DuplicateTypeName { name: String },
}

/// Errors raised by a resolve call.
///
/// Absent discriminators, unmapped values and unmatched probes are not errors:
/// they fall through to the fallback or the base type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no instantiable subtype of `{base}`{}", cycle_note(.cyclic))]
    NoInstantiableSubtype { base: String, cyclic: bool },
    #[error("ambiguous subtype for `{base}`: {}", join_names(.candidates))]
    AmbiguousTypeResolution {
        base: String,
        candidates: Vec<String>,
    },
    #[error("discriminator `{property}` of `{base}` cannot be read from a JSON {kind}")]
    UnsupportedDiscriminatorShape {
        base: String,
        property: String,
        kind: ValueKind,
    },
    #[error("`{ty}` is not an array or list type")]
    NotAContainer { ty: String },
    #[error("expected a JSON array for `{ty}`, found {kind}")]
    ExpectedArray { ty: String, kind: ValueKind },
}

fn cycle_note(cyclic: &bool) -> &'static str {
    if *cyclic {
        " (circular subtype mapping)"
    } else {
        ""
    }
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}
