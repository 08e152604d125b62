//! Type descriptors: opaque handles to host types.
//!
//! A [`TypeDescriptor`] is a cheap `Arc` handle. Two descriptors are equal when
//! their full names are equal, so a name is expected to identify one type
//! across the whole registry.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Structural shape of a type, as far as resolution cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A JSON object. Only objects carry discriminators.
    Object,
    Scalar,
    /// Fixed array of `elem`. Resolves into an array.
    Array(TypeDescriptor),
    /// Generic list-like container. An abstract (interface) list resolves into
    /// a concrete list of the same element type.
    List {
        elem: TypeDescriptor,
        concrete: bool,
    },
}

#[derive(Debug)]
struct TypeInfo {
    name: String,
    module: String,
    is_abstract: bool,
    supertypes: Vec<TypeDescriptor>,
    shape: TypeShape,
}

#[derive(Clone)]
pub struct TypeDescriptor(Arc<TypeInfo>);

impl TypeDescriptor {
    /// Starts building an object type named `name` (dotted namespace allowed).
    pub fn object(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into(), TypeShape::Object)
    }

    pub fn scalar(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptorBuilder::new(name.into(), TypeShape::Scalar).build()
    }

    /// `Elem[]`.
    pub fn array_of(elem: &TypeDescriptor) -> TypeDescriptor {
        TypeDescriptorBuilder::new(format!("{}[]", elem.name()), TypeShape::Array(elem.clone()))
            .module(elem.module())
            .build()
    }

    /// Concrete ordered list, `List<Elem>`.
    pub fn list_of(elem: &TypeDescriptor) -> TypeDescriptor {
        TypeDescriptorBuilder::new(
            format!("List<{}>", elem.name()),
            TypeShape::List {
                elem: elem.clone(),
                concrete: true,
            },
        )
        .module(elem.module())
        .build()
    }

    /// Abstract list-like interface, `Seq<Elem>`.
    pub fn seq_of(elem: &TypeDescriptor) -> TypeDescriptor {
        TypeDescriptorBuilder::new(
            format!("Seq<{}>", elem.name()),
            TypeShape::List {
                elem: elem.clone(),
                concrete: false,
            },
        )
        .module(elem.module())
        .abstract_()
        .build()
    }

    /// Full, dotted name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name without its namespace prefix.
    pub fn simple_name(&self) -> &str {
        match self.0.name.rsplit_once('.') {
            Some((_, simple)) => simple,
            None => &self.0.name,
        }
    }

    /// Enclosing namespace, empty for top-level names.
    pub fn namespace(&self) -> &str {
        match self.0.name.rsplit_once('.') {
            Some((ns, _)) => ns,
            None => "",
        }
    }

    /// Defining module.
    pub fn module(&self) -> &str {
        &self.0.module
    }

    pub fn is_abstract(&self) -> bool {
        self.0.is_abstract
    }

    pub fn shape(&self) -> &TypeShape {
        &self.0.shape
    }

    pub fn supertypes(&self) -> &[TypeDescriptor] {
        &self.0.supertypes
    }

    /// Element type of arrays and lists.
    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match &self.0.shape {
            TypeShape::Array(elem) => Some(elem),
            TypeShape::List { elem, .. } => Some(elem),
            TypeShape::Object | TypeShape::Scalar => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.element_type().is_some()
    }

    /// Whether a value of `self` can stand where `target` is declared.
    pub fn is_assignable_to(&self, target: &TypeDescriptor) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&TypeDescriptor> = vec![self];
        while let Some(ty) = stack.pop() {
            if ty == target {
                return true;
            }
            if !seen.insert(ty.name()) {
                continue;
            }
            stack.extend(ty.supertypes());
        }
        false
    }

    pub fn ptr_eq(&self, other: &TypeDescriptor) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.0.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    module: String,
    is_abstract: bool,
    supertypes: Vec<TypeDescriptor>,
    shape: TypeShape,
}

impl TypeDescriptorBuilder {
    fn new(name: String, shape: TypeShape) -> Self {
        Self {
            name,
            module: String::new(),
            is_abstract: false,
            supertypes: Vec::new(),
            shape,
        }
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Marks the type abstract (not instantiable).
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declares a direct supertype (base class or implemented interface).
    pub fn extends(mut self, parent: &TypeDescriptor) -> Self {
        self.supertypes.push(parent.clone());
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor(Arc::new(TypeInfo {
            name: self.name,
            module: self.module,
            is_abstract: self.is_abstract,
            supertypes: self.supertypes,
            shape: self.shape,
        }))
    }
}

#[derive(Debug)]
struct EnumInfo {
    name: String,
    members: Vec<(String, i64)>,
}

/// An enum type usable as a discriminator key type.
#[derive(Clone)]
pub struct EnumDescriptor(Arc<EnumInfo>);

impl EnumDescriptor {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self(Arc::new(EnumInfo {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(member, number)| (member.into(), number))
                .collect(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Member names with their numbers, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.members.iter().map(|(m, n)| (m.as_str(), *n))
    }

    /// Looks a member up by its declared name.
    pub fn member(&self, name: &str) -> Option<EnumMember> {
        self.0
            .members
            .iter()
            .position(|(m, _)| m == name)
            .map(|index| EnumMember {
                ty: self.clone(),
                index,
            })
    }

    /// First member carrying `number`.
    pub fn member_by_number(&self, number: i64) -> Option<EnumMember> {
        self.0
            .members
            .iter()
            .position(|(_, n)| *n == number)
            .map(|index| EnumMember {
                ty: self.clone(),
                index,
            })
    }

    pub(crate) fn member_at(&self, index: usize) -> EnumMember {
        EnumMember {
            ty: self.clone(),
            index,
        }
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for EnumDescriptor {}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumDescriptor({})", self.0.name)
    }
}

/// One member of an [`EnumDescriptor`].
///
/// Members compare by enum name and number, so aliases sharing a number are
/// the same key.
#[derive(Clone)]
pub struct EnumMember {
    ty: EnumDescriptor,
    index: usize,
}

impl EnumMember {
    pub fn enum_type(&self) -> &EnumDescriptor {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.ty.0.members[self.index].0
    }

    pub fn number(&self) -> i64 {
        self.ty.0.members[self.index].1
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.number() == other.number()
    }
}

impl Eq for EnumMember {}

impl Hash for EnumMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.name().hash(state);
        self.number().hash(state);
    }
}

impl fmt::Debug for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.ty.name(), self.name())
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.ty.name(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_split_on_last_dot() {
        let dog = TypeDescriptor::object("Zoo.Animals.Dog").build();
        assert_eq!(dog.name(), "Zoo.Animals.Dog");
        assert_eq!(dog.simple_name(), "Dog");
        assert_eq!(dog.namespace(), "Zoo.Animals");

        let top = TypeDescriptor::object("Top").build();
        assert_eq!(top.simple_name(), "Top");
        assert_eq!(top.namespace(), "");
    }

    #[test]
    fn equality_is_by_name() {
        let a = TypeDescriptor::object("A").build();
        let a2 = TypeDescriptor::object("A").abstract_().build();
        assert_eq!(a, a2);
        assert!(!a.ptr_eq(&a2));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn assignability_walks_supertypes() {
        let animal = TypeDescriptor::object("Animal").abstract_().build();
        let pet = TypeDescriptor::object("Pet").abstract_().build();
        let dog = TypeDescriptor::object("Dog")
            .extends(&animal)
            .extends(&pet)
            .build();
        let puppy = TypeDescriptor::object("Puppy").extends(&dog).build();
        let cat = TypeDescriptor::object("Cat").extends(&animal).build();

        assert!(puppy.is_assignable_to(&animal));
        assert!(puppy.is_assignable_to(&pet));
        assert!(dog.is_assignable_to(&dog));
        assert!(!cat.is_assignable_to(&pet));
        assert!(!animal.is_assignable_to(&dog));
    }

    #[test]
    fn container_shapes() {
        let node = TypeDescriptor::object("Node").abstract_().module("graph").build();
        let arr = TypeDescriptor::array_of(&node);
        let list = TypeDescriptor::list_of(&node);
        let seq = TypeDescriptor::seq_of(&node);

        assert_eq!(arr.name(), "Node[]");
        assert_eq!(arr.element_type(), Some(&node));
        assert_eq!(arr.module(), "graph");
        assert!(!arr.is_abstract());
        assert_eq!(list.name(), "List<Node>");
        assert!(seq.is_abstract());
        assert!(seq.is_container());
        assert!(!node.is_container());
    }

    #[test]
    fn enum_members() {
        let kind = EnumDescriptor::new("GameKind", [("Run", 0), ("Walk", 1), ("Stroll", 1)]);
        let run = kind.member("Run").unwrap();
        assert_eq!(run.number(), 0);
        assert_eq!(run.to_string(), "GameKind::Run");
        assert_eq!(kind.member_by_number(1).unwrap().name(), "Walk");
        assert_eq!(kind.member("Stroll").unwrap(), kind.member("Walk").unwrap());
        assert!(kind.member("Fly").is_none());
        assert_eq!(kind.members().count(), 3);
    }
}
