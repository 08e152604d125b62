//! Arrays and lists of polymorphic elements.
//!
//! Every element is resolved on its own against the container's declared
//! element type. The output container keeps the declared shape: an array stays
//! an array, a concrete list stays that list, and an abstract list interface
//! becomes a concrete list of the same element type.

use tracing::debug;

use crate::chain::Subtypes;
use crate::config::HostConfig;
use crate::error::ResolveError;
use crate::type_desc::{TypeDescriptor, TypeShape};
use crate::view::{JsonView, ValueKind};

/// Resolved element types of one JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    /// Concrete container type to build.
    pub container: TypeDescriptor,
    pub element: TypeDescriptor,
    /// One entry per array element, in order. `None` for JSON `null` and for
    /// elements with no instantiable type.
    pub elements: Vec<Option<TypeDescriptor>>,
}

/// Concrete container type to materialize for a declared container type.
pub fn concrete_container(declared: &TypeDescriptor) -> Option<TypeDescriptor> {
    match declared.shape() {
        TypeShape::Array(_) => Some(declared.clone()),
        TypeShape::List { concrete: true, .. } => Some(declared.clone()),
        TypeShape::List { elem, concrete: false } => Some(TypeDescriptor::list_of(elem)),
        TypeShape::Object | TypeShape::Scalar => None,
    }
}

impl Subtypes {
    /// Resolves every element of `value` against `declared`'s element type.
    ///
    /// A JSON `null` container yields `Ok(None)`. Elements that are `null` or
    /// end on a non-instantiable type become `None` without affecting their
    /// siblings; ambiguity and unreadable discriminators still fail the call.
    /// Scalars go through the chain like objects, so an element type without
    /// a rule resolves to itself.
    pub fn resolve_elements<V: JsonView>(
        &self,
        value: &V,
        declared: &TypeDescriptor,
        config: &HostConfig,
    ) -> Result<Option<ResolvedSequence>, ResolveError> {
        let (Some(element), Some(container)) =
            (declared.element_type(), concrete_container(declared))
        else {
            return Err(ResolveError::NotAContainer {
                ty: declared.name().to_string(),
            });
        };
        match value.kind() {
            ValueKind::Null => return Ok(None),
            ValueKind::Array => {}
            kind => {
                return Err(ResolveError::ExpectedArray {
                    ty: declared.name().to_string(),
                    kind,
                })
            }
        }

        let mut elements = Vec::new();
        for (index, item) in value.elements().enumerate() {
            if item.is_null() {
                elements.push(None);
                continue;
            }
            let resolution = self.resolve_type(item, element, config)?;
            if resolution.is_instantiable() {
                elements.push(Some(resolution.ty));
            } else {
                debug!(
                    index,
                    element = %element,
                    reached = %resolution.ty,
                    "element has no instantiable type"
                );
                elements.push(None);
            }
        }

        Ok(Some(ResolvedSequence {
            container,
            element: element.clone(),
            elements,
        }))
    }
}
