//! Mira Host Object Model
//!
//! The runtime surface the mirror layer reflects over:
//! - **Values**: dynamic host values (`value` module)
//! - **Functions**: callable objects with an arity signal, own properties,
//!   and a `prototype` object (`function` module)
//! - **Objects**: plain objects with native property tables (`object` module)
//! - **Descriptors**: the partial property-descriptor exchange type
//!   (`descriptor` module)
//!
//! A constructor is an ordinary [`Function`]: its own property table is the
//! static side of the class and its `prototype` carries the instance side.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod descriptor;
pub mod function;
pub mod object;
pub mod value;

pub use descriptor::PropertyDescriptor;
pub use function::{Function, FunctionBehavior, FunctionRef, NativeFn};
pub use object::{ObjectRef, PlainObject, PropertySlot, SlotPayload};
pub use value::Value;
