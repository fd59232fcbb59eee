//! Attribute, wrapping, and memoization decorators

use mira_mirrors::{MetadataStore, MirrorError, MirrorRef, MirrorResult, PropertyMirror};
use mira_object::{Function, Value};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

fn expect_member<'a>(mirror: &'a MirrorRef, decorator: &str) -> MirrorResult<&'a Rc<PropertyMirror>> {
    mirror.as_property().ok_or_else(|| {
        MirrorError::invalid_argument(format!("{decorator} applies to class members"))
    })
}

/// Mark a method or data property as read-only
pub fn readonly() -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    |mirror| {
        let member = expect_member(mirror, "readonly")?;
        match &**member {
            PropertyMirror::Method(method) => method.set_writable(false),
            PropertyMirror::Data(data) => data.set_writable(false),
            PropertyMirror::Accessor(_) => Err(MirrorError::invalid_argument(
                "readonly applies to methods and data properties",
            )),
        }
    }
}

/// Mark a member as enumerable
pub fn enumerable() -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    |mirror| expect_member(mirror, "enumerable")?.set_enumerable(true)
}

/// Mark a member as non-configurable.
///
/// The `configurable` mutator is only legal while the owning class is NOT
/// initializing, so applying this decorator before freeze fails; it exists
/// to demonstrate exactly that contract.
pub fn nonconfigurable() -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    |mirror| expect_member(mirror, "nonconfigurable")?.set_configurable(false)
}

/// An ordered record of decorated method calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Snapshot of all entries so far
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

/// Wrap a method so every call is recorded to `log` before running
pub fn logged(log: &CallLog) -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    let log = log.clone();
    move |mirror| {
        let member = expect_member(mirror, "logged")?;
        let Some(method) = member.as_method() else {
            return Err(MirrorError::invalid_argument("logged applies to methods"));
        };

        let name = member.name().to_string();
        let inner = method.value();
        let arity = inner.arity();
        let log = log.clone();
        let label = name.clone();
        let wrapper = Function::native(&name, arity, move |this, args| {
            log.record(format!("call {label}"));
            inner.call(this, args)
        });
        method.set_value(Value::Function(wrapper))
    }
}

/// Memoize an accessor's getter per instance; a setter, when present,
/// refreshes the cached value
pub fn memoized() -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    |mirror| {
        let member = expect_member(mirror, "memoized")?;
        let Some(accessor) = member.as_accessor() else {
            return Err(MirrorError::invalid_argument("memoized applies to accessors"));
        };

        let cache: Rc<RefCell<FxHashMap<u64, Value>>> = Rc::new(RefCell::new(FxHashMap::default()));

        if let Some(getter) = accessor.get() {
            let cache = Rc::clone(&cache);
            let wrapper = Function::native("get", 0, move |this, args| {
                let Some(id) = this.identity() else {
                    return getter.call(this, args);
                };
                if let Some(value) = cache.borrow().get(&id) {
                    return value.clone();
                }
                let value = getter.call(this, args);
                cache.borrow_mut().insert(id, value.clone());
                value
            });
            accessor.set_get(Value::Function(wrapper))?;
        }

        if let Some(setter) = accessor.set() {
            let cache = Rc::clone(&cache);
            let wrapper = Function::native("set", setter.arity(), move |this, args| {
                let result = setter.call(this.clone(), args);
                if let Some(id) = this.identity() {
                    let value = args.first().cloned().unwrap_or(Value::Null);
                    cache.borrow_mut().insert(id, value);
                }
                result
            });
            accessor.set_set(Value::Function(wrapper))?;
        }

        Ok(())
    }
}

/// Record `key`/`value` metadata for the decorated class in `store`
pub fn tagged(
    store: &Rc<RefCell<MetadataStore>>,
    key: &str,
    value: Value,
) -> impl Fn(&MirrorRef) -> MirrorResult<()> {
    let store = Rc::clone(store);
    let key = key.to_string();
    move |mirror| {
        let class = mirror.as_class().ok_or_else(|| {
            MirrorError::invalid_argument("tagged applies to classes")
        })?;
        let target = Value::Function(class.original_construct());
        store
            .borrow_mut()
            .define_metadata(&key, value.clone(), &target);
        Ok(())
    }
}
