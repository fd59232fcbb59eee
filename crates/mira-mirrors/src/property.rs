//! Class member mirrors
//!
//! [`PropertyMirror`] is the tagged union over the three member shapes a
//! class declares: methods, data properties, and accessors. Every variant
//! embeds the shared base (name, scope, attribute bits, and a non-owning
//! back-reference to the declaring class) and enforces the lifecycle
//! guards: mutable fields may only be set while the owning class mirror is
//! still initializing. `configurable` is guarded by the opposite condition;
//! see [`PropertyMirror::set_configurable`].

use crate::class::ClassMirror;
use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{Mirror, MirrorKind, MirrorState};
use crate::parameter::{self, ParameterMirror};
use mira_object::{FunctionRef, PropertyDescriptor, PropertySlot, SlotPayload, Value};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Identity and attribute fields shared by every member mirror
#[derive(Debug)]
struct PropertyBase {
    parent: Weak<ClassMirror>,
    name: String,
    is_static: bool,
    enumerable: Cell<bool>,
    configurable: Cell<bool>,
}

impl PropertyBase {
    fn new(
        parent: Weak<ClassMirror>,
        name: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> Self {
        Self {
            parent,
            name: name.to_string(),
            is_static,
            enumerable: Cell::new(descriptor.enumerable.unwrap_or(false)),
            configurable: Cell::new(descriptor.configurable.unwrap_or(false)),
        }
    }

    fn parent_state(&self) -> MirrorState {
        match self.parent.upgrade() {
            Some(class) => class.state(),
            None => MirrorState::Initialized,
        }
    }

    fn ensure_initializing(&self) -> MirrorResult<()> {
        if self.parent_state() != MirrorState::Initializing {
            return Err(MirrorError::invalid_state(format!(
                "member '{}' is no longer mutable",
                self.name
            )));
        }
        Ok(())
    }

    fn ensure_not_initializing(&self) -> MirrorResult<()> {
        if self.parent_state() == MirrorState::Initializing {
            return Err(MirrorError::invalid_state(format!(
                "member '{}' is still initializing",
                self.name
            )));
        }
        Ok(())
    }
}

/// Validate an accessor slot value: callable, null, or nothing else
fn accessor_slot(name: &str, slot: &str, value: &Value) -> MirrorResult<Option<FunctionRef>> {
    match value {
        Value::Function(function) => Ok(Some(Rc::clone(function))),
        Value::Null => Ok(None),
        other => Err(MirrorError::invalid_argument(format!(
            "accessor '{name}' {slot} must be callable or null, got {}",
            other.type_of()
        ))),
    }
}

/// Mirror for a method member
#[derive(Debug)]
pub struct MethodMirror {
    base: PropertyBase,
    writable: Cell<bool>,
    value: RefCell<FunctionRef>,
    parameters: Vec<Rc<ParameterMirror>>,
}

impl MethodMirror {
    /// Whether plain assignment may replace the method on the live object
    pub fn writable(&self) -> bool {
        self.writable.get()
    }

    /// Set the writable bit; legal only while the class is initializing
    pub fn set_writable(&self, value: bool) -> MirrorResult<()> {
        self.base.ensure_initializing()?;
        self.writable.set(value);
        Ok(())
    }

    /// The method body
    pub fn value(&self) -> FunctionRef {
        self.value.borrow().clone()
    }

    /// Replace the method body; the value must be callable and the class
    /// must still be initializing
    pub fn set_value(&self, value: Value) -> MirrorResult<()> {
        let Value::Function(function) = value else {
            return Err(MirrorError::invalid_argument(format!(
                "method '{}' requires a callable value, got {}",
                self.base.name,
                value.type_of()
            )));
        };
        self.base.ensure_initializing()?;
        *self.value.borrow_mut() = function;
        Ok(())
    }

    /// Parameter mirrors, derived from the body's arity at construction
    /// time and fixed thereafter
    pub fn parameters(&self) -> Vec<Rc<ParameterMirror>> {
        self.parameters.clone()
    }

    fn fill_descriptor(&self) -> PropertySlot {
        PropertySlot {
            enumerable: self.base.enumerable.get(),
            configurable: self.base.configurable.get(),
            payload: SlotPayload::Data {
                value: Value::Function(self.value()),
                writable: self.writable.get(),
            },
        }
    }

    fn merge(&self, descriptor: &PropertyDescriptor) -> MirrorResult<()> {
        if let Some(writable) = descriptor.writable {
            self.set_writable(writable)?;
        }
        if let Some(value) = &descriptor.value {
            self.set_value(value.clone())?;
        }
        Ok(())
    }
}

/// Mirror for a data property member
#[derive(Debug)]
pub struct DataPropertyMirror {
    base: PropertyBase,
    writable: Cell<bool>,
    value: RefCell<Value>,
}

impl DataPropertyMirror {
    /// Whether plain assignment may replace the value on the live object
    pub fn writable(&self) -> bool {
        self.writable.get()
    }

    /// Set the writable bit; legal only while the class is initializing
    pub fn set_writable(&self, value: bool) -> MirrorResult<()> {
        self.base.ensure_initializing()?;
        self.writable.set(value);
        Ok(())
    }

    /// The stored value
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the stored value; any value is accepted but the class must
    /// still be initializing
    pub fn set_value(&self, value: Value) -> MirrorResult<()> {
        self.base.ensure_initializing()?;
        *self.value.borrow_mut() = value;
        Ok(())
    }

    fn fill_descriptor(&self) -> PropertySlot {
        PropertySlot {
            enumerable: self.base.enumerable.get(),
            configurable: self.base.configurable.get(),
            payload: SlotPayload::Data {
                value: self.value(),
                writable: self.writable.get(),
            },
        }
    }

    fn merge(&self, descriptor: &PropertyDescriptor) -> MirrorResult<()> {
        if let Some(writable) = descriptor.writable {
            self.set_writable(writable)?;
        }
        if let Some(value) = &descriptor.value {
            self.set_value(value.clone())?;
        }
        Ok(())
    }
}

/// Mirror for an accessor member
#[derive(Debug)]
pub struct AccessorMirror {
    base: PropertyBase,
    get: RefCell<Option<FunctionRef>>,
    set: RefCell<Option<FunctionRef>>,
    parameters: Vec<Rc<ParameterMirror>>,
}

impl AccessorMirror {
    /// The getter, if any
    pub fn get(&self) -> Option<FunctionRef> {
        self.get.borrow().clone()
    }

    /// Replace the getter; the value must be callable or null and the
    /// class must still be initializing
    pub fn set_get(&self, value: Value) -> MirrorResult<()> {
        let get = accessor_slot(&self.base.name, "get", &value)?;
        self.base.ensure_initializing()?;
        *self.get.borrow_mut() = get;
        Ok(())
    }

    /// The setter, if any
    pub fn set(&self) -> Option<FunctionRef> {
        self.set.borrow().clone()
    }

    /// Replace the setter; the value must be callable or null and the
    /// class must still be initializing
    pub fn set_set(&self, value: Value) -> MirrorResult<()> {
        let set = accessor_slot(&self.base.name, "set", &value)?;
        self.base.ensure_initializing()?;
        *self.set.borrow_mut() = set;
        Ok(())
    }

    /// Parameter mirrors, derived from the setter's arity at construction
    /// time (getters take none)
    pub fn parameters(&self) -> Vec<Rc<ParameterMirror>> {
        self.parameters.clone()
    }

    fn fill_descriptor(&self) -> PropertySlot {
        PropertySlot {
            enumerable: self.base.enumerable.get(),
            configurable: self.base.configurable.get(),
            payload: SlotPayload::Accessor {
                get: self.get(),
                set: self.set(),
            },
        }
    }

    fn merge(&self, descriptor: &PropertyDescriptor) -> MirrorResult<()> {
        if let Some(get) = &descriptor.get {
            self.set_get(get.clone())?;
        }
        if let Some(set) = &descriptor.set {
            self.set_set(set.clone())?;
        }
        Ok(())
    }
}

/// Mirror for one named class member
#[derive(Debug)]
pub enum PropertyMirror {
    /// A method member
    Method(MethodMirror),
    /// A data property member
    Data(DataPropertyMirror),
    /// An accessor member
    Accessor(AccessorMirror),
}

impl PropertyMirror {
    /// Classify a descriptor into the member kind it implies: a truthy
    /// get/set means accessor, a callable value means method, anything
    /// else is a data property
    pub fn descriptor_kind(descriptor: &PropertyDescriptor) -> MirrorKind {
        let truthy = |field: &Option<Value>| field.as_ref().is_some_and(Value::is_truthy);
        if truthy(&descriptor.get) || truthy(&descriptor.set) {
            MirrorKind::Accessor
        } else if descriptor.value.as_ref().is_some_and(Value::is_callable) {
            MirrorKind::Method
        } else {
            MirrorKind::Data
        }
    }

    /// Construct the mirror a descriptor implies
    pub fn from_descriptor(
        parent: Weak<ClassMirror>,
        name: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> MirrorResult<Rc<PropertyMirror>> {
        match Self::descriptor_kind(descriptor) {
            MirrorKind::Accessor => Self::accessor(parent, name, descriptor, is_static),
            MirrorKind::Method => Self::method(parent, name, descriptor, is_static),
            _ => Ok(Self::data(parent, name, descriptor, is_static)),
        }
    }

    /// Construct a method mirror; the descriptor's value must be callable
    pub fn method(
        parent: Weak<ClassMirror>,
        name: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> MirrorResult<Rc<PropertyMirror>> {
        let function = match &descriptor.value {
            Some(Value::Function(function)) => Rc::clone(function),
            _ => {
                return Err(MirrorError::invalid_argument(format!(
                    "method '{name}' requires a callable value"
                )))
            }
        };
        let arity = function.arity();
        Ok(Rc::new_cyclic(|weak: &Weak<PropertyMirror>| {
            PropertyMirror::Method(MethodMirror {
                base: PropertyBase::new(parent, name, descriptor, is_static),
                writable: Cell::new(descriptor.writable.unwrap_or(false)),
                value: RefCell::new(function),
                parameters: parameter::for_member(weak.clone(), arity),
            })
        }))
    }

    /// Construct a data property mirror; any value is accepted
    pub fn data(
        parent: Weak<ClassMirror>,
        name: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> Rc<PropertyMirror> {
        Rc::new(PropertyMirror::Data(DataPropertyMirror {
            base: PropertyBase::new(parent, name, descriptor, is_static),
            writable: Cell::new(descriptor.writable.unwrap_or(false)),
            value: RefCell::new(descriptor.value.clone().unwrap_or(Value::Null)),
        }))
    }

    /// Construct an accessor mirror. At least one of the descriptor's
    /// get/set must be callable, and a non-callable side must be exactly
    /// null or absent.
    pub fn accessor(
        parent: Weak<ClassMirror>,
        name: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> MirrorResult<Rc<PropertyMirror>> {
        let callable = |field: &Option<Value>| field.as_ref().is_some_and(Value::is_callable);
        if !callable(&descriptor.get) && !callable(&descriptor.set) {
            return Err(MirrorError::invalid_argument(format!(
                "accessor '{name}' requires at least one of get/set to be callable"
            )));
        }
        let get = match &descriptor.get {
            Some(value) => accessor_slot(name, "get", value)?,
            None => None,
        };
        let set = match &descriptor.set {
            Some(value) => accessor_slot(name, "set", value)?,
            None => None,
        };
        let setter_arity = set.as_ref().map(|f| f.arity());
        Ok(Rc::new_cyclic(|weak: &Weak<PropertyMirror>| {
            PropertyMirror::Accessor(AccessorMirror {
                base: PropertyBase::new(parent, name, descriptor, is_static),
                get: RefCell::new(get),
                set: RefCell::new(set),
                parameters: match setter_arity {
                    Some(arity) => parameter::for_member(weak.clone(), arity),
                    None => Vec::new(),
                },
            })
        }))
    }

    fn base(&self) -> &PropertyBase {
        match self {
            PropertyMirror::Method(method) => &method.base,
            PropertyMirror::Data(data) => &data.base,
            PropertyMirror::Accessor(accessor) => &accessor.base,
        }
    }

    /// Member name
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// Whether the member lives on the static side of the class
    pub fn is_static(&self) -> bool {
        self.base().is_static
    }

    /// The declaring class mirror, if still alive
    pub fn parent(&self) -> Option<Rc<ClassMirror>> {
        self.base().parent.upgrade()
    }

    /// Whether the member shows up in enumeration
    pub fn enumerable(&self) -> bool {
        self.base().enumerable.get()
    }

    /// Set the enumerable bit; legal only while the class is initializing
    pub fn set_enumerable(&self, value: bool) -> MirrorResult<()> {
        self.base().ensure_initializing()?;
        self.base().enumerable.set(value);
        Ok(())
    }

    /// Whether the member's shape may be redefined on the live object
    pub fn configurable(&self) -> bool {
        self.base().configurable.get()
    }

    /// Set the configurable bit.
    ///
    /// Guarded by the opposite condition of every sibling mutator: legal
    /// only while the owning class mirror is NOT initializing. This
    /// asymmetry is part of the modelled contract and is kept as-is.
    pub fn set_configurable(&self, value: bool) -> MirrorResult<()> {
        self.base().ensure_not_initializing()?;
        self.base().configurable.set(value);
        Ok(())
    }

    /// View as a method mirror
    pub fn as_method(&self) -> Option<&MethodMirror> {
        match self {
            PropertyMirror::Method(method) => Some(method),
            _ => None,
        }
    }

    /// View as a data property mirror
    pub fn as_data(&self) -> Option<&DataPropertyMirror> {
        match self {
            PropertyMirror::Data(data) => Some(data),
            _ => None,
        }
    }

    /// View as an accessor mirror
    pub fn as_accessor(&self) -> Option<&AccessorMirror> {
        match self {
            PropertyMirror::Accessor(accessor) => Some(accessor),
            _ => None,
        }
    }

    /// Parameter mirrors of the member, when it has a parameter list
    /// (methods and accessors)
    pub fn parameters(&self) -> Option<Vec<Rc<ParameterMirror>>> {
        match self {
            PropertyMirror::Method(method) => Some(method.parameters()),
            PropertyMirror::Accessor(accessor) => Some(accessor.parameters()),
            PropertyMirror::Data(_) => None,
        }
    }

    /// Materialize the accumulated state as a realized slot for writing
    /// onto the live object
    pub(crate) fn fill_descriptor(&self) -> PropertySlot {
        match self {
            PropertyMirror::Method(method) => method.fill_descriptor(),
            PropertyMirror::Data(data) => data.fill_descriptor(),
            PropertyMirror::Accessor(accessor) => accessor.fill_descriptor(),
        }
    }

    /// Merge the kind-specific fields present in `descriptor` into this
    /// mirror; omitted fields retain their prior values
    pub(crate) fn merge_descriptor(&self, descriptor: &PropertyDescriptor) -> MirrorResult<()> {
        match self {
            PropertyMirror::Method(method) => method.merge(descriptor),
            PropertyMirror::Data(data) => data.merge(descriptor),
            PropertyMirror::Accessor(accessor) => accessor.merge(descriptor),
        }
    }
}

impl Mirror for PropertyMirror {
    fn kind(&self) -> MirrorKind {
        match self {
            PropertyMirror::Method(_) => MirrorKind::Method,
            PropertyMirror::Data(_) => MirrorKind::Data,
            PropertyMirror::Accessor(_) => MirrorKind::Accessor,
        }
    }

    fn state(&self) -> MirrorState {
        self.base().parent_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mira_object::Function;

    fn orphan_method(name: &str, arity: usize) -> Rc<PropertyMirror> {
        let f = Function::native(name, arity, |_, _| Value::Null);
        PropertyMirror::from_descriptor(Weak::new(), name, &PropertyDescriptor::method(f), false)
            .unwrap()
    }

    #[test]
    fn test_descriptor_kind_classification() {
        let f = Function::native("f", 0, |_, _| Value::Null);
        assert_eq!(
            PropertyMirror::descriptor_kind(&PropertyDescriptor::method(f.clone())),
            MirrorKind::Method
        );
        assert_eq!(
            PropertyMirror::descriptor_kind(&PropertyDescriptor::data(Value::Number(1.0))),
            MirrorKind::Data
        );
        assert_eq!(
            PropertyMirror::descriptor_kind(&PropertyDescriptor::accessor(Some(f), None)),
            MirrorKind::Accessor
        );
        // A null get is not truthy: the descriptor stays a data property
        let null_get = PropertyDescriptor {
            get: Some(Value::Null),
            ..PropertyDescriptor::default()
        };
        assert_eq!(
            PropertyMirror::descriptor_kind(&null_get),
            MirrorKind::Data
        );
    }

    #[test]
    fn test_method_value_type_check_precedes_state_guard() {
        let method = orphan_method("m", 0);
        let m = method.as_method().unwrap();

        // A non-callable value reports InvalidArgument even though the
        // state guard would also reject the write
        let err = m.set_value(Value::Number(3.0)).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidArgument { .. }));

        // A callable value still fails the state guard
        let f = Function::native("f", 0, |_, _| Value::Null);
        let err = m.set_value(Value::Function(f)).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidState { .. }));
    }

    #[test]
    fn test_accessor_requires_a_callable_side() {
        let err = PropertyMirror::from_descriptor(
            Weak::new(),
            "a",
            &PropertyDescriptor {
                get: Some(Value::Number(1.0)),
                ..PropertyDescriptor::default()
            },
            false,
        )
        .unwrap_err();
        assert!(matches!(err, MirrorError::InvalidArgument { .. }));
    }

    #[test]
    fn test_method_parameters_follow_arity() {
        let method = orphan_method("m", 3);
        let parameters = method.parameters().unwrap();
        assert_eq!(parameters.len(), 3);
        for (i, parameter) in parameters.iter().enumerate() {
            assert_eq!(parameter.index(), i);
        }
    }

    #[test]
    fn test_orphaned_member_counts_as_initialized() {
        // The parent weak reference is dead, so mutation-phase setters fail
        let method = orphan_method("m", 0);
        assert_eq!(method.state(), MirrorState::Initialized);
        assert!(method.set_enumerable(true).is_err());
        assert!(method.set_configurable(false).is_ok());
    }
}
