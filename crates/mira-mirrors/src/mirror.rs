//! Mirror identity contract
//!
//! Every mirror reports a fixed `kind` and a lifecycle `state`. The state
//! belongs to the class declaration: member and parameter mirrors report
//! the stage of the class mirror that owns them.

use std::fmt;

/// The concrete kind of a mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKind {
    /// A class declaration
    Class,
    /// A method member
    Method,
    /// A data property member
    Data,
    /// An accessor member
    Accessor,
    /// A positional parameter
    Parameter,
}

impl fmt::Display for MirrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorKind::Class => write!(f, "class"),
            MirrorKind::Method => write!(f, "method"),
            MirrorKind::Data => write!(f, "data"),
            MirrorKind::Accessor => write!(f, "accessor"),
            MirrorKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// Lifecycle stage of a class declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    /// The mutation phase: decorators may rewrite the declaration
    Initializing,
    /// The terminal stage after freeze; the declaration is committed
    Initialized,
}

impl fmt::Display for MirrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorState::Initializing => write!(f, "initializing"),
            MirrorState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Common identity contract shared by every mirror
pub trait Mirror {
    /// The fixed kind of this mirror
    fn kind(&self) -> MirrorKind;

    /// The current lifecycle stage
    fn state(&self) -> MirrorState;
}
