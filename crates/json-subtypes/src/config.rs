//! Host configuration consulted during resolution.

use serde::Deserialize;

use crate::naming::NamingPolicy;

/// Default bound on nested hand-off depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Name-matching settings taken from the host serializer.
///
/// ```
/// use json_subtypes::{HostConfig, NamingPolicy};
///
/// let config = HostConfig {
///     case_insensitive: true,
///     enum_naming: Some(NamingPolicy::SnakeCaseLower),
///     ..Default::default()
/// };
/// assert_eq!(config.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    /// Compare property names with ordinal case-insensitive equality.
    pub case_insensitive: bool,
    /// Property naming policy. Configured names that are not found verbatim
    /// are retried in this spelling.
    pub property_naming: Option<NamingPolicy>,
    /// Naming policy applied to enum member names when a string discriminator
    /// is converted to an enum key.
    pub enum_naming: Option<NamingPolicy>,
    /// Maximum nesting of polymorphic hand-offs within one call.
    pub max_depth: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            property_naming: None,
            enum_naming: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HostConfig {
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Default::default()
        }
    }
}
