//! Positional parameter mirrors
//!
//! Parameters are derived once, at the construction of their function-like
//! parent (a class constructor, a method, or an accessor's setter), and are
//! never individually mutated afterward. The parent link is a non-owning
//! back-reference; the parent owns its parameters, not the other way round.

use crate::class::ClassMirror;
use crate::mirror::{Mirror, MirrorKind, MirrorState};
use crate::property::PropertyMirror;
use std::rc::{Rc, Weak};

/// Non-owning back-reference to the mirror that declared a parameter
#[derive(Debug, Clone)]
pub enum ParameterOwner {
    /// Parameter of a class constructor
    Class(Weak<ClassMirror>),
    /// Parameter of a method, or of an accessor's setter
    Member(Weak<PropertyMirror>),
}

/// Mirror for one positional parameter
#[derive(Debug)]
pub struct ParameterMirror {
    owner: ParameterOwner,
    index: usize,
}

impl ParameterMirror {
    /// Zero-based position of the parameter
    pub fn index(&self) -> usize {
        self.index
    }

    /// The declaring mirror
    pub fn owner(&self) -> &ParameterOwner {
        &self.owner
    }

    /// The owning class mirror, if still alive: directly for constructor
    /// parameters, through the member for member parameters
    pub fn owner_class(&self) -> Option<Rc<ClassMirror>> {
        match &self.owner {
            ParameterOwner::Class(class) => class.upgrade(),
            ParameterOwner::Member(member) => member.upgrade().and_then(|m| m.parent()),
        }
    }

    /// The owning member mirror, if the parameter belongs to one
    pub fn owner_member(&self) -> Option<Rc<PropertyMirror>> {
        match &self.owner {
            ParameterOwner::Class(_) => None,
            ParameterOwner::Member(member) => member.upgrade(),
        }
    }
}

impl Mirror for ParameterMirror {
    fn kind(&self) -> MirrorKind {
        MirrorKind::Parameter
    }

    fn state(&self) -> MirrorState {
        match self.owner_class() {
            Some(class) => class.state(),
            None => MirrorState::Initialized,
        }
    }
}

/// Derive the parameter list of a class constructor
pub(crate) fn for_class(class: Weak<ClassMirror>, arity: usize) -> Vec<Rc<ParameterMirror>> {
    (0..arity)
        .map(|index| {
            Rc::new(ParameterMirror {
                owner: ParameterOwner::Class(class.clone()),
                index,
            })
        })
        .collect()
}

/// Derive the parameter list of a member (a method's value, or an
/// accessor's setter)
pub(crate) fn for_member(member: Weak<PropertyMirror>, arity: usize) -> Vec<Rc<ParameterMirror>> {
    (0..arity)
        .map(|index| {
            Rc::new(ParameterMirror {
                owner: ParameterOwner::Member(member.clone()),
                index,
            })
        })
        .collect()
}
