//! Mira Declaration Mirrors
//!
//! A staged, mutable reflection layer over class declarations:
//! - **Mirror contract**: fixed kind plus lifecycle state (`mirror` module)
//! - **Class mirrors**: constructor, parameters, and two member tables,
//!   with the irreversible freeze transition (`class` module)
//! - **Member mirrors**: the method / data / accessor variants (`property`
//!   module) and their positional parameters (`parameter` module)
//! - **Registry**: lazy, identity-stable constructor-to-mirror association
//!   (`registry` module)
//! - **Decorators**: request classification, dispatch, and the ordered
//!   application pipeline (`decorator` module)
//! - **Metadata**: session-scoped key/value metadata on declarations
//!   (`metadata` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use mira_mirrors::{decorate, Decoration, MirrorRegistry};
//! use mira_object::Value;
//!
//! let mut registry = MirrorRegistry::new();
//! let exported = decorate(
//!     &mut registry,
//!     &class,
//!     &[Decoration::class(|mirror| {
//!         let class = mirror.as_class().unwrap();
//!         class.set_construct(replacement.clone())
//!     })],
//! )?;
//! ```
//!
//! A mirror is mutable only while its class is `initializing`; the
//! `finalize` step freezes the declaration, writes the accumulated member
//! tables back onto the live constructor, and returns it. Every mutation
//! afterward fails with an `InvalidState` error.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod decorator;
pub mod error;
pub mod metadata;
pub mod mirror;
pub mod parameter;
pub mod property;
pub mod registry;

pub use class::ClassMirror;
pub use decorator::{
    apply_decorator, decorate, finalize, Decoration, DecorationRequest, MemberKey, MirrorRef,
};
pub use error::{MirrorError, MirrorResult};
pub use metadata::{MetadataKey, MetadataStore};
pub use mirror::{Mirror, MirrorKind, MirrorState};
pub use parameter::{ParameterMirror, ParameterOwner};
pub use property::{AccessorMirror, DataPropertyMirror, MethodMirror, PropertyMirror};
pub use registry::MirrorRegistry;
