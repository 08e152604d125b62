//! Property lookup inside a JSON object, including dotted paths.
//!
//! A name such as `"nested.property"` is first tried as one literal key, then
//! as a path: `nested` must hold an object in which `property` is looked up
//! the same way. Lookups never fail loudly: anything unreachable is simply
//! not found. An explicit JSON `null` is found.

use crate::config::HostConfig;
use crate::naming::eq_ignore_case;
use crate::view::JsonView;

/// Finds `path` in `object` honoring the host's case sensitivity.
pub fn locate<'v, V: JsonView>(object: &'v V, path: &str, case_insensitive: bool) -> Option<&'v V> {
    if let Some(value) = lookup_key(object, path, case_insensitive) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    let nested = lookup_key(object, head, case_insensitive)?;
    if !nested.is_object() {
        return None;
    }
    locate(nested, rest, case_insensitive)
}

/// Finds a configured property name, retrying in the host's property naming
/// policy when the declared spelling is absent.
pub fn locate_property<'v, V: JsonView>(
    object: &'v V,
    name: &str,
    config: &HostConfig,
) -> Option<&'v V> {
    if let Some(value) = locate(object, name, config.case_insensitive) {
        return Some(value);
    }
    let policy = config.property_naming?;
    let renamed = policy.convert_path(name);
    if renamed == name {
        return None;
    }
    locate(object, &renamed, config.case_insensitive)
}

/// Single-level lookup of `key`. Case-insensitive lookups take the first
/// matching key in document order.
fn lookup_key<'v, V: JsonView>(object: &'v V, key: &str, case_insensitive: bool) -> Option<&'v V> {
    if !case_insensitive {
        return object.get(key);
    }
    object
        .entries()
        .find(|(k, _)| eq_ignore_case(k, key))
        .map(|(_, v)| v)
}
