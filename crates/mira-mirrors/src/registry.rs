//! Mirror registry
//!
//! One-to-one association between a constructor and its class mirror:
//! created lazily on first sight, identity-stable for the registry's
//! lifetime. The registry is an explicit object scoped to a declaration
//! session and passed to the decoration pipeline; there is no process-wide
//! singleton.

use crate::class::ClassMirror;
use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{Mirror, MirrorState};
use mira_object::Value;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Registry of class mirrors for one declaration session
#[derive(Debug, Default)]
pub struct MirrorRegistry {
    /// Mirrors keyed by constructor identity
    classes: FxHashMap<u64, Rc<ClassMirror>>,
}

impl MirrorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the mirror for `constructor`, creating it on first sight.
    ///
    /// With `require_mutable`, resolving an already-initialized mirror is
    /// an error: mutation was requested on a frozen class.
    pub fn get_or_create(
        &mut self,
        constructor: &Value,
        require_mutable: bool,
    ) -> MirrorResult<Rc<ClassMirror>> {
        let Some(function) = constructor.as_function() else {
            return Err(MirrorError::invalid_argument(format!(
                "expected a constructor function, got {}",
                constructor.type_of()
            )));
        };

        if let Some(mirror) = self.classes.get(&function.id()) {
            if require_mutable && mirror.state() != MirrorState::Initializing {
                return Err(MirrorError::invalid_state(format!(
                    "class '{}' is already initialized",
                    mirror.name()
                )));
            }
            return Ok(Rc::clone(mirror));
        }

        let mirror = ClassMirror::new(constructor)?;
        self.classes.insert(function.id(), Rc::clone(&mirror));
        Ok(mirror)
    }

    /// Look up an existing mirror without creating one
    pub fn lookup(&self, constructor: &Value) -> Option<Rc<ClassMirror>> {
        let function = constructor.as_function()?;
        self.classes.get(&function.id()).cloned()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
