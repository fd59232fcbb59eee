//! Plain objects and realized property slots
//!
//! A `PlainObject` holds a native property table keyed by name. Each entry
//! is a realized [`PropertySlot`]: the attribute bits plus either a data
//! payload (value + writable) or an accessor payload (get/set). Instances
//! carry a proto link to their constructor's prototype object; reads walk
//! that link, writes do not.

use crate::function::FunctionRef;
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Kind-specific payload of a property slot
#[derive(Debug, Clone)]
pub enum SlotPayload {
    /// A data property; methods are data properties whose value is callable
    Data {
        /// The stored value
        value: Value,
        /// Whether plain assignment may replace the value
        writable: bool,
    },
    /// An accessor property
    Accessor {
        /// The getter, if any
        get: Option<FunctionRef>,
        /// The setter, if any
        set: Option<FunctionRef>,
    },
}

/// Realized attributes of one named property
#[derive(Debug, Clone)]
pub struct PropertySlot {
    /// Whether the property shows up in enumeration
    pub enumerable: bool,
    /// Whether the property's shape may be redefined
    pub configurable: bool,
    /// Data or accessor payload
    pub payload: SlotPayload,
}

impl PropertySlot {
    /// A data slot with class-member default attributes
    /// (writable, non-enumerable, configurable)
    pub fn data(value: Value) -> Self {
        Self {
            enumerable: false,
            configurable: true,
            payload: SlotPayload::Data {
                value,
                writable: true,
            },
        }
    }

    /// An accessor slot with class-member default attributes
    pub fn accessor(get: Option<FunctionRef>, set: Option<FunctionRef>) -> Self {
        Self {
            enumerable: false,
            configurable: true,
            payload: SlotPayload::Accessor { get, set },
        }
    }

    /// Set the enumerable bit
    pub fn enumerable(mut self, value: bool) -> Self {
        self.enumerable = value;
        self
    }

    /// Set the configurable bit
    pub fn configurable(mut self, value: bool) -> Self {
        self.configurable = value;
        self
    }

    /// Set the writable bit (data payloads only; no effect on accessors)
    pub fn writable(mut self, value: bool) -> Self {
        if let SlotPayload::Data { writable, .. } = &mut self.payload {
            *writable = value;
        }
        self
    }
}

/// Shared handle to a plain object
pub type ObjectRef = Rc<PlainObject>;

/// A heap object with a native property table and an optional proto link
#[derive(Debug)]
pub struct PlainObject {
    id: u64,
    proto: Option<ObjectRef>,
    properties: RefCell<FxHashMap<String, PropertySlot>>,
}

impl PlainObject {
    /// Create a new empty object with no proto link
    pub fn new() -> ObjectRef {
        Rc::new(Self {
            id: generate_object_id(),
            proto: None,
            properties: RefCell::new(FxHashMap::default()),
        })
    }

    /// Create a new empty object whose reads fall back to `proto`
    pub fn with_proto(proto: ObjectRef) -> ObjectRef {
        Rc::new(Self {
            id: generate_object_id(),
            proto: Some(proto),
            properties: RefCell::new(FxHashMap::default()),
        })
    }

    /// Unique object ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The proto link, if any
    pub fn proto(&self) -> Option<ObjectRef> {
        self.proto.clone()
    }

    /// Define (or redefine) an own property
    pub fn define_property(&self, key: &str, slot: PropertySlot) {
        self.properties.borrow_mut().insert(key.to_string(), slot);
    }

    /// Get an own property slot
    pub fn get_own(&self, key: &str) -> Option<PropertySlot> {
        self.properties.borrow().get(key).cloned()
    }

    /// Check if an own property exists
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.borrow().contains_key(key)
    }

    /// Remove an own property; returns whether it existed
    pub fn delete_property(&self, key: &str) -> bool {
        self.properties.borrow_mut().remove(key).is_some()
    }

    /// Names of all own properties
    pub fn own_keys(&self) -> Vec<String> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Find a slot on this object or along the proto chain
    fn lookup(&self, key: &str) -> Option<PropertySlot> {
        if let Some(slot) = self.get_own(key) {
            return Some(slot);
        }
        self.proto.as_ref().and_then(|proto| proto.lookup(key))
    }

    /// Read a property: data values directly, accessors via their getter.
    /// Missing properties read as null.
    pub fn get(self: &Rc<Self>, key: &str) -> Value {
        let this = Value::Object(Rc::clone(self));
        match self.lookup(key) {
            Some(PropertySlot {
                payload: SlotPayload::Data { value, .. },
                ..
            }) => value,
            Some(PropertySlot {
                payload: SlotPayload::Accessor { get: Some(get), .. },
                ..
            }) => get.call(this, &[]),
            _ => Value::Null,
        }
    }

    /// Write a property. Returns false when the write is rejected: a
    /// non-writable data slot (own or inherited), or an accessor without a
    /// setter.
    pub fn set(self: &Rc<Self>, key: &str, value: Value) -> bool {
        let this = Value::Object(Rc::clone(self));
        match self.lookup(key) {
            Some(PropertySlot {
                payload: SlotPayload::Accessor { set, .. },
                ..
            }) => match set {
                Some(set) => {
                    set.call(this, &[value]);
                    true
                }
                None => false,
            },
            Some(PropertySlot {
                payload: SlotPayload::Data { writable, .. },
                ..
            }) => {
                if !writable {
                    return false;
                }
                if self.has_own(key) {
                    if let Some(PropertySlot {
                        payload: SlotPayload::Data { value: stored, .. },
                        ..
                    }) = self.properties.borrow_mut().get_mut(key)
                    {
                        *stored = value;
                    }
                } else {
                    // Writable inherited data slot: shadow with an own slot
                    self.define_property(key, PropertySlot::data(value).enumerable(true));
                }
                true
            }
            None => {
                self.define_property(key, PropertySlot::data(value).enumerable(true));
                true
            }
        }
    }

    /// Call the named property as a method with this object as `this`.
    /// Returns null when the property is not callable.
    pub fn invoke(self: &Rc<Self>, key: &str, args: &[Value]) -> Value {
        match self.get(key) {
            Value::Function(function) => function.call(Value::Object(Rc::clone(self)), args),
            _ => Value::Null,
        }
    }
}
