//! Callable function objects
//!
//! A `Function` is the host's function-object: it carries a name, a
//! positional-arity signal, an own property table (the static side when the
//! function is used as a constructor), and a `prototype` object (the
//! instance side). Behavior is either a native implementation or an
//! explicit forwarding wrapper that keeps this function's identity surface
//! while delegating call and construct to a replacement.

use crate::object::{ObjectRef, PlainObject, PropertySlot, SlotPayload};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique function IDs
static NEXT_FUNCTION_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique function ID
fn generate_function_id() -> u64 {
    NEXT_FUNCTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Native implementation of a function, invoked with `(this, args)`
pub type NativeFn = Rc<dyn Fn(Value, &[Value]) -> Value>;

/// Shared handle to a function object
pub type FunctionRef = Rc<Function>;

/// How invocations of a function are carried out
#[derive(Clone)]
pub enum FunctionBehavior {
    /// A host-provided implementation
    Native(NativeFn),
    /// Delegate both call and construct to the replacement. The wrapper
    /// keeps its own identity surface: name, arity, prototype, and own
    /// property table are shared with the function it stands in for.
    Forward(FunctionRef),
}

impl fmt::Debug for FunctionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBehavior::Native(_) => f.write_str("Native"),
            FunctionBehavior::Forward(target) => {
                f.debug_tuple("Forward").field(&target.name()).finish()
            }
        }
    }
}

/// A callable function object with a prototype and own properties
pub struct Function {
    id: u64,
    name: String,
    arity: usize,
    prototype: ObjectRef,
    properties: ObjectRef,
    behavior: FunctionBehavior,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("behavior", &self.behavior)
            .finish()
    }
}

impl Function {
    /// Create a native function with a fresh prototype object
    pub fn native(
        name: &str,
        arity: usize,
        body: impl Fn(Value, &[Value]) -> Value + 'static,
    ) -> FunctionRef {
        Rc::new(Self {
            id: generate_function_id(),
            name: name.to_string(),
            arity,
            prototype: PlainObject::new(),
            properties: PlainObject::new(),
            behavior: FunctionBehavior::Native(Rc::new(body)),
        })
    }

    /// Create a forwarding wrapper over `target`: same name, arity,
    /// prototype, and own-property surface, but call and construct run
    /// `replacement` instead.
    pub fn forwarding(target: &FunctionRef, replacement: FunctionRef) -> FunctionRef {
        Rc::new(Self {
            id: generate_function_id(),
            name: target.name.clone(),
            arity: target.arity,
            prototype: Rc::clone(&target.prototype),
            properties: Rc::clone(&target.properties),
            behavior: FunctionBehavior::Forward(replacement),
        })
    }

    /// Unique function ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared positional parameter count
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The prototype object (instance side of a constructor)
    pub fn prototype(&self) -> ObjectRef {
        Rc::clone(&self.prototype)
    }

    /// How this function dispatches invocations
    pub fn behavior(&self) -> &FunctionBehavior {
        &self.behavior
    }

    /// Call as a function
    pub fn call(&self, this: Value, args: &[Value]) -> Value {
        match &self.behavior {
            FunctionBehavior::Native(body) => body(this, args),
            FunctionBehavior::Forward(target) => target.call(this, args),
        }
    }

    /// Call as a constructor: create an instance backed by this function's
    /// prototype, run the (possibly forwarded) body with it as `this`, and
    /// return the instance — or the body's return value when that value is
    /// itself an object.
    pub fn construct(&self, args: &[Value]) -> Value {
        let instance = PlainObject::with_proto(Rc::clone(&self.prototype));
        let this = Value::Object(Rc::clone(&instance));
        match self.call(this.clone(), args) {
            Value::Object(explicit) => Value::Object(explicit),
            _ => this,
        }
    }

    /// Define (or redefine) an own property (static side)
    pub fn define_own_property(&self, key: &str, slot: PropertySlot) {
        self.properties.define_property(key, slot);
    }

    /// Get an own property slot (static side)
    pub fn get_own_property(&self, key: &str) -> Option<PropertySlot> {
        self.properties.get_own(key)
    }

    /// Names of all own properties (static side)
    pub fn own_keys(&self) -> Vec<String> {
        self.properties.own_keys()
    }

    /// Read an own property; accessor slots run their getter with this
    /// function as `this`
    pub fn get(self: &Rc<Self>, key: &str) -> Value {
        match self.properties.get_own(key) {
            Some(slot) => match slot.payload {
                SlotPayload::Data { value, .. } => value,
                SlotPayload::Accessor { get: Some(get), .. } => {
                    get.call(Value::Function(Rc::clone(self)), &[])
                }
                _ => Value::Null,
            },
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_runs_body() {
        let double = Function::native("double", 1, |_, args| {
            match args.first() {
                Some(Value::Number(n)) => Value::Number(n * 2.0),
                _ => Value::Null,
            }
        });
        assert_eq!(double.call(Value::Null, &[Value::Number(4.0)]), Value::Number(8.0));
    }

    #[test]
    fn test_construct_creates_instance_with_prototype() {
        let ctor = Function::native("Point", 2, |this, args| {
            if let Value::Object(obj) = &this {
                obj.set("x", args.first().cloned().unwrap_or(Value::Null));
            }
            Value::Null
        });
        ctor.prototype()
            .define_property("origin", PropertySlot::data(Value::Bool(false)));

        let instance = ctor.construct(&[Value::Number(5.0)]);
        let Value::Object(obj) = instance else {
            panic!("expected an object instance");
        };
        assert_eq!(obj.get("x"), Value::Number(5.0));
        assert_eq!(obj.get("origin"), Value::Bool(false));
    }

    #[test]
    fn test_construct_honors_explicit_object_return() {
        let other = PlainObject::new();
        other.define_property("marker", PropertySlot::data(Value::Bool(true)));
        let other_value = Value::Object(other);
        let returned = other_value.clone();
        let ctor = Function::native("Weird", 0, move |_, _| returned.clone());

        assert_eq!(ctor.construct(&[]), other_value);
    }

    #[test]
    fn test_forwarding_redirects_behavior_keeps_surface() {
        let original = Function::native("Original", 1, |_, _| Value::str("original"));
        original.define_own_property("tag", PropertySlot::data(Value::str("static")));
        let replacement = Function::native("Replacement", 1, |_, _| Value::str("replacement"));

        let wrapped = Function::forwarding(&original, replacement);
        assert!(matches!(wrapped.behavior(), FunctionBehavior::Forward(_)));
        assert_eq!(wrapped.name(), "Original");
        assert_eq!(wrapped.arity(), 1);
        assert!(Rc::ptr_eq(&wrapped.prototype(), &original.prototype()));
        assert_eq!(wrapped.call(Value::Null, &[]), Value::str("replacement"));
        assert_eq!(wrapped.get("tag"), Value::str("static"));
    }

    #[test]
    fn test_static_writes_through_wrapper_reach_original() {
        let original = Function::native("C", 0, |_, _| Value::Null);
        let replacement = Function::native("D", 0, |_, _| Value::Null);
        let wrapped = Function::forwarding(&original, replacement);

        wrapped.define_own_property("late", PropertySlot::data(Value::Number(1.0)));
        assert_eq!(original.get("late"), Value::Number(1.0));
    }
}
