//! Serde hand-off for [`json_subtypes`].
//!
//! The resolver decides the concrete type; a [`Materializer`] then builds the
//! host value for it, usually through that type's own `Deserialize` impl.
//!
//! ```
//! use std::sync::Arc;
//! use json_subtypes::{HostConfig, Rule, Subtypes, TypeDescriptor};
//! use json_subtypes_serde::Materializer;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Dog { name: String }
//!
//! #[derive(Deserialize)]
//! struct Cat { lives: u8 }
//!
//! enum Pet { Dog(Dog), Cat(Cat) }
//! impl From<Dog> for Pet { fn from(d: Dog) -> Self { Pet::Dog(d) } }
//! impl From<Cat> for Pet { fn from(c: Cat) -> Self { Pet::Cat(c) } }
//!
//! let pet = TypeDescriptor::object("Pet").abstract_().build();
//! let dog = TypeDescriptor::object("Dog").extends(&pet).build();
//! let cat = TypeDescriptor::object("Cat").extends(&pet).build();
//! let subtypes = Subtypes::builder()
//!     .rule(Rule::presence(&pet).probe("name", &dog).probe("lives", &cat).build()?)?
//!     .build();
//!
//! let pets = Materializer::<Pet>::new(Arc::new(subtypes), HostConfig::default())
//!     .register_serde::<Dog>(&dog)
//!     .register_serde::<Cat>(&cat);
//!
//! match pets.from_str(r#"{"lives": 9}"#, &pet)? {
//!     Pet::Cat(c) => assert_eq!(c.lives, 9),
//!     Pet::Dog(d) => panic!("unexpected dog {}", d.name),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod materializer;
pub mod seed;

pub use error::DeError;
pub use materializer::{MaterializeCtx, MaterializeFn, Materializer};
pub use seed::{PolymorphicSeed, PolymorphicSeqSeed};
