//! Partial property descriptors
//!
//! The exchange type between the host surface and the mirror layer. Every
//! field is optional: only the fields present participate in member
//! classification and in merge-style updates. Realized [`PropertySlot`]s
//! convert to full descriptors for snapshotting.

use crate::function::FunctionRef;
use crate::object::{PropertySlot, SlotPayload};
use crate::value::Value;

/// A partial property descriptor
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    /// Whether the property shows up in enumeration
    pub enumerable: Option<bool>,
    /// Whether the property's shape may be redefined
    pub configurable: Option<bool>,
    /// Whether plain assignment may replace the value (data/method only)
    pub writable: Option<bool>,
    /// The property value (data/method only)
    pub value: Option<Value>,
    /// The getter: callable, null, or absent (accessor only)
    pub get: Option<Value>,
    /// The setter: callable, null, or absent (accessor only)
    pub set: Option<Value>,
}

impl PropertyDescriptor {
    /// An empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for a method
    pub fn method(value: FunctionRef) -> Self {
        Self {
            value: Some(Value::Function(value)),
            ..Self::default()
        }
    }

    /// Descriptor for a data property
    pub fn data(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Descriptor for an accessor; absent slots stay absent
    pub fn accessor(get: Option<FunctionRef>, set: Option<FunctionRef>) -> Self {
        Self {
            get: get.map(Value::Function),
            set: set.map(Value::Function),
            ..Self::default()
        }
    }

    /// Set the enumerable field
    pub fn enumerable(mut self, value: bool) -> Self {
        self.enumerable = Some(value);
        self
    }

    /// Set the configurable field
    pub fn configurable(mut self, value: bool) -> Self {
        self.configurable = Some(value);
        self
    }

    /// Set the writable field
    pub fn writable(mut self, value: bool) -> Self {
        self.writable = Some(value);
        self
    }

    /// Set the value field
    pub fn value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl From<&PropertySlot> for PropertyDescriptor {
    fn from(slot: &PropertySlot) -> Self {
        let mut descriptor = PropertyDescriptor::new()
            .enumerable(slot.enumerable)
            .configurable(slot.configurable);
        match &slot.payload {
            SlotPayload::Data { value, writable } => {
                descriptor.value = Some(value.clone());
                descriptor.writable = Some(*writable);
            }
            SlotPayload::Accessor { get, set } => {
                descriptor.get = get.clone().map(Value::Function);
                descriptor.set = set.clone().map(Value::Function);
            }
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;

    #[test]
    fn test_builders_set_only_named_fields() {
        let f = Function::native("m", 0, |_, _| Value::Null);
        let descriptor = PropertyDescriptor::method(f).enumerable(true);

        assert_eq!(descriptor.enumerable, Some(true));
        assert_eq!(descriptor.configurable, None);
        assert_eq!(descriptor.writable, None);
        assert!(descriptor.value.as_ref().is_some_and(Value::is_callable));
    }

    #[test]
    fn test_from_realized_data_slot() {
        let slot = PropertySlot::data(Value::Number(2.0)).enumerable(true);
        let descriptor = PropertyDescriptor::from(&slot);

        assert_eq!(descriptor.enumerable, Some(true));
        assert_eq!(descriptor.configurable, Some(true));
        assert_eq!(descriptor.writable, Some(true));
        assert_eq!(descriptor.value, Some(Value::Number(2.0)));
        assert!(descriptor.get.is_none() && descriptor.set.is_none());
    }

    #[test]
    fn test_from_realized_accessor_slot() {
        let get = Function::native("get", 0, |_, _| Value::Null);
        let slot = PropertySlot::accessor(Some(get), None);
        let descriptor = PropertyDescriptor::from(&slot);

        assert!(descriptor.get.as_ref().is_some_and(Value::is_callable));
        assert!(descriptor.set.is_none());
        assert!(descriptor.value.is_none());
    }
}
