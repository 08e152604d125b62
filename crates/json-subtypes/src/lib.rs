//! Polymorphic subtype resolution for JSON documents.
//!
//! Given a parsed JSON object and a statically known base type, decide which
//! concrete subtype to materialize. The actual field-by-field decoding is left
//! to the host serializer (see the `json-subtypes-serde` crate).
//!
//! Two rule kinds exist, one per base type:
//! - discriminator value: a named property (`"kind"`, `"a.b"`) is read and
//!   mapped through a value table, or read as a type name when no table is
//!   declared;
//! - property presence: ordered `(path, subtype)` probes, first present
//!   property wins (strict rules reject ambiguous documents instead).
//!
//! Results are followed through further rules until a fixed point, so
//! multi-level hierarchies resolve in one call.

pub mod chain;
pub mod config;
pub mod container;
pub mod error;
pub mod locator;
pub mod match_value;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod type_desc;
pub mod view;

pub use chain::{Resolution, Subtypes, SubtypesBuilder};
pub use config::HostConfig;
pub use container::{concrete_container, ResolvedSequence};
pub use error::{ConfigError, ResolveError};
pub use locator::{locate, locate_property};
pub use match_value::{MatchKind, MatchValue};
pub use naming::NamingPolicy;
pub use registry::TypeRegistry;
pub use resolver::{ResolveCtx, ResolveStep};
pub use rule::{MappingEntry, ProbeEntry, Rule, RuleBuilder, RuleKind};
pub use type_desc::{EnumDescriptor, EnumMember, TypeDescriptor, TypeShape};
pub use view::{JsonView, ValueKind};
