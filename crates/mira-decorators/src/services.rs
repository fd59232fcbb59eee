//! Service provision
//!
//! A class decorator that registers decorated classes as named services,
//! plus a lookup that constructs instances on demand. The table is an
//! explicit session object shared by the decorator closures it hands out.

use mira_mirrors::{ClassMirror, MirrorError, MirrorRef, MirrorResult};
use mira_object::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Registry of classes provided as named services
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Rc<RefCell<FxHashMap<String, Rc<ClassMirror>>>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Class decorator that registers the decorated class under `name`,
    /// or under its own name when `name` is None
    pub fn provide(&self, name: Option<&str>) -> impl Fn(&MirrorRef) -> MirrorResult<()> {
        let registry = self.clone();
        let name = name.map(String::from);
        move |mirror| {
            let class = mirror.as_class().ok_or_else(|| {
                MirrorError::invalid_argument("provide applies to classes")
            })?;
            let key = name.clone().unwrap_or_else(|| class.name().to_string());
            registry
                .services
                .borrow_mut()
                .insert(key, Rc::clone(class));
            Ok(())
        }
    }

    /// Construct an instance of the service registered under `name`
    pub fn get_service(&self, name: &str) -> Option<Value> {
        let mirror = self.services.borrow().get(name).cloned()?;
        Some(mirror.construct().construct(&[]))
    }

    /// Names of all registered services
    pub fn service_names(&self) -> Vec<String> {
        self.services.borrow().keys().cloned().collect()
    }
}
