//! Class declaration mirrors
//!
//! A `ClassMirror` aggregates the constructor, its parameter list, and the
//! two member tables (instance side and static side) of one class
//! declaration. It is created in the `initializing` stage by snapshotting
//! the constructor's existing own members, mutated in place by decorators,
//! and committed exactly once by [`ClassMirror::freeze`] — the single
//! irreversible transition of the component.

use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{Mirror, MirrorKind, MirrorState};
use crate::parameter::{self, ParameterMirror};
use crate::property::PropertyMirror;
use mira_object::{Function, FunctionRef, PropertyDescriptor, Value};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Mirror for one class declaration
#[derive(Debug)]
pub struct ClassMirror {
    name: String,
    original_construct: FunctionRef,
    construct: RefCell<FunctionRef>,
    initialized: Cell<bool>,
    parameters: Vec<Rc<ParameterMirror>>,
    instance_members: RefCell<FxHashMap<String, Rc<PropertyMirror>>>,
    static_members: RefCell<FxHashMap<String, Rc<PropertyMirror>>>,
}

impl ClassMirror {
    /// Construct a mirror over `constructor`, snapshotting its existing
    /// own members on both sides and deriving constructor parameters from
    /// its arity. Fails when `constructor` is not callable.
    pub fn new(constructor: &Value) -> MirrorResult<Rc<ClassMirror>> {
        let Value::Function(function) = constructor else {
            return Err(MirrorError::invalid_argument(format!(
                "a class mirror requires a callable constructor, got {}",
                constructor.type_of()
            )));
        };
        let function = Rc::clone(function);
        let mirror = Rc::new_cyclic(|weak| ClassMirror {
            name: function.name().to_string(),
            original_construct: Rc::clone(&function),
            construct: RefCell::new(Rc::clone(&function)),
            initialized: Cell::new(false),
            parameters: parameter::for_class(weak.clone(), function.arity()),
            instance_members: RefCell::new(FxHashMap::default()),
            static_members: RefCell::new(FxHashMap::default()),
        });
        mirror.snapshot_members(&function)?;
        Ok(mirror)
    }

    /// Class name, taken from the constructor as first registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constructor as first registered; never changes
    pub fn original_construct(&self) -> FunctionRef {
        Rc::clone(&self.original_construct)
    }

    /// The current constructor: the original, a decorator-supplied
    /// replacement, or (after freeze) the forwarding wrapper
    pub fn construct(&self) -> FunctionRef {
        self.construct.borrow().clone()
    }

    /// Replace the constructor. The value must be callable and the mirror
    /// must still be initializing.
    pub fn set_construct(&self, value: Value) -> MirrorResult<()> {
        let Value::Function(function) = value else {
            return Err(MirrorError::invalid_argument(format!(
                "construct for class '{}' must be callable, got {}",
                self.name,
                value.type_of()
            )));
        };
        self.ensure_initializing()?;
        *self.construct.borrow_mut() = function;
        Ok(())
    }

    /// Constructor parameter mirrors, derived from the registered
    /// constructor's arity and fixed thereafter
    pub fn parameters(&self) -> Vec<Rc<ParameterMirror>> {
        self.parameters.clone()
    }

    /// Define a member or update an existing one.
    ///
    /// An existing member of the same implied kind receives a partial
    /// update (only the fields present in `descriptor`) and keeps its
    /// identity; a kind mismatch replaces the member wholesale with a
    /// freshly constructed mirror.
    pub fn define_property(
        self: &Rc<Self>,
        key: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> MirrorResult<Rc<PropertyMirror>> {
        self.ensure_initializing()?;
        if let Some(member) = self.get_own_property(key, is_static) {
            if member.kind() == PropertyMirror::descriptor_kind(descriptor) {
                member.merge_descriptor(descriptor)?;
                return Ok(member);
            }
        }
        self.create_member(key, descriptor, is_static)
    }

    /// Remove a member. Returns false without effect once the mirror is
    /// initialized; otherwise reports whether the member existed.
    pub fn delete_property(&self, key: &str, is_static: bool) -> bool {
        if self.initialized.get() {
            return false;
        }
        self.members(is_static).borrow_mut().remove(key).is_some()
    }

    /// Check whether a member exists in the given scope
    pub fn has_own_property(&self, key: &str, is_static: bool) -> bool {
        self.members(is_static).borrow().contains_key(key)
    }

    /// Look up a member in the given scope
    pub fn get_own_property(&self, key: &str, is_static: bool) -> Option<Rc<PropertyMirror>> {
        self.members(is_static).borrow().get(key).cloned()
    }

    /// All members of the given scope
    pub fn get_own_properties(&self, is_static: bool) -> Vec<Rc<PropertyMirror>> {
        self.members(is_static).borrow().values().cloned().collect()
    }

    /// Commit the accumulated declaration onto the live constructor and
    /// end the mutation phase. Idempotent: a second call is a no-op.
    ///
    /// When a decorator replaced the constructor, the replacement is put
    /// behind a forwarding wrapper that keeps the original's identity
    /// surface, so callers holding the exported constructor observe the
    /// original shape with the replacement's behavior.
    pub fn freeze(&self) {
        if self.initialized.get() {
            return;
        }

        if !Rc::ptr_eq(&self.construct.borrow(), &self.original_construct) {
            let replacement = self.construct.borrow().clone();
            *self.construct.borrow_mut() =
                Function::forwarding(&self.original_construct, replacement);
        }

        let constructor = self.construct.borrow().clone();
        let prototype = constructor.prototype();
        for member in self.get_own_properties(false) {
            prototype.define_property(member.name(), member.fill_descriptor());
        }
        for member in self.get_own_properties(true) {
            constructor.define_own_property(member.name(), member.fill_descriptor());
        }

        self.initialized.set(true);
    }

    fn members(&self, is_static: bool) -> &RefCell<FxHashMap<String, Rc<PropertyMirror>>> {
        if is_static {
            &self.static_members
        } else {
            &self.instance_members
        }
    }

    fn snapshot_members(self: &Rc<Self>, function: &FunctionRef) -> MirrorResult<()> {
        let prototype = function.prototype();
        for key in prototype.own_keys() {
            if key == "constructor" {
                continue;
            }
            if let Some(slot) = prototype.get_own(&key) {
                self.create_member(&key, &PropertyDescriptor::from(&slot), false)?;
            }
        }
        for key in function.own_keys() {
            if let Some(slot) = function.get_own_property(&key) {
                self.create_member(&key, &PropertyDescriptor::from(&slot), true)?;
            }
        }
        Ok(())
    }

    fn create_member(
        self: &Rc<Self>,
        key: &str,
        descriptor: &PropertyDescriptor,
        is_static: bool,
    ) -> MirrorResult<Rc<PropertyMirror>> {
        let member =
            PropertyMirror::from_descriptor(Rc::downgrade(self), key, descriptor, is_static)?;
        self.members(is_static)
            .borrow_mut()
            .insert(key.to_string(), Rc::clone(&member));
        Ok(member)
    }

    fn ensure_initializing(&self) -> MirrorResult<()> {
        if self.initialized.get() {
            return Err(MirrorError::invalid_state(format!(
                "class '{}' is already initialized",
                self.name
            )));
        }
        Ok(())
    }
}

impl Mirror for ClassMirror {
    fn kind(&self) -> MirrorKind {
        MirrorKind::Class
    }

    fn state(&self) -> MirrorState {
        if self.initialized.get() {
            MirrorState::Initialized
        } else {
            MirrorState::Initializing
        }
    }
}
