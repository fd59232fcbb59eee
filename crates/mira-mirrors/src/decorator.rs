//! Decorator adaptation and dispatch
//!
//! Routes a generic transformation to the correct mirror. The decorators
//! proposal classified decoration calls by runtime argument shape (count
//! and types); here the call site constructs a tagged [`DecorationRequest`]
//! and the type system picks the handler. The transformation itself stays
//! generic: it receives a [`MirrorRef`] and decides what to do with it.
//!
//! Decorations run strictly in the order handed to the pipeline. The
//! distinguished [`finalize`] step — conventionally outermost, applied
//! last — freezes the class and returns the exported constructor; any
//! mutating decoration after it fails, because mutation-mode resolution
//! rejects a frozen mirror.

use crate::class::ClassMirror;
use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{Mirror, MirrorKind, MirrorState};
use crate::parameter::ParameterMirror;
use crate::property::PropertyMirror;
use crate::registry::MirrorRegistry;
use mira_object::Value;
use std::rc::Rc;

/// Identifies a named member within one scope of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberKey {
    /// Member name
    pub name: String,
    /// Whether the member lives on the static side
    pub is_static: bool,
}

impl MemberKey {
    /// A member key for the given scope
    pub fn new(name: &str, is_static: bool) -> Self {
        Self {
            name: name.to_string(),
            is_static,
        }
    }

    /// An instance-side member key
    pub fn instance(name: &str) -> Self {
        Self::new(name, false)
    }

    /// A static-side member key
    pub fn static_member(name: &str) -> Self {
        Self::new(name, true)
    }
}

/// Which declaration a decoration applies to
#[derive(Debug, Clone)]
pub enum DecorationRequest {
    /// The class itself
    Class,
    /// A named member
    Member(MemberKey),
    /// One positional parameter of a member's parameter list, or of the
    /// constructor's when no member is named
    Parameter {
        /// Owning member, or None for the constructor
        member: Option<MemberKey>,
        /// Zero-based parameter index
        index: usize,
    },
    /// A field declaration (reserved; the transformation is a no-op)
    Field(MemberKey),
}

/// The mirror handed to a transformation
#[derive(Debug, Clone)]
pub enum MirrorRef {
    /// A class mirror
    Class(Rc<ClassMirror>),
    /// A member mirror
    Property(Rc<PropertyMirror>),
    /// A parameter mirror
    Parameter(Rc<ParameterMirror>),
}

impl MirrorRef {
    /// View as a class mirror
    pub fn as_class(&self) -> Option<&Rc<ClassMirror>> {
        match self {
            MirrorRef::Class(class) => Some(class),
            _ => None,
        }
    }

    /// View as a member mirror
    pub fn as_property(&self) -> Option<&Rc<PropertyMirror>> {
        match self {
            MirrorRef::Property(property) => Some(property),
            _ => None,
        }
    }

    /// View as a parameter mirror
    pub fn as_parameter(&self) -> Option<&Rc<ParameterMirror>> {
        match self {
            MirrorRef::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }
}

impl Mirror for MirrorRef {
    fn kind(&self) -> MirrorKind {
        match self {
            MirrorRef::Class(class) => class.kind(),
            MirrorRef::Property(property) => property.kind(),
            MirrorRef::Parameter(parameter) => parameter.kind(),
        }
    }

    fn state(&self) -> MirrorState {
        match self {
            MirrorRef::Class(class) => class.state(),
            MirrorRef::Property(property) => property.state(),
            MirrorRef::Parameter(parameter) => parameter.state(),
        }
    }
}

/// One step of a decoration pipeline: a request plus the transformation
/// to run against the resolved mirror
pub struct Decoration {
    request: DecorationRequest,
    decorator: Box<dyn Fn(&MirrorRef) -> MirrorResult<()>>,
}

impl Decoration {
    /// A decoration for an arbitrary request
    pub fn new(
        request: DecorationRequest,
        decorator: impl Fn(&MirrorRef) -> MirrorResult<()> + 'static,
    ) -> Self {
        Self {
            request,
            decorator: Box::new(decorator),
        }
    }

    /// A class decoration
    pub fn class(decorator: impl Fn(&MirrorRef) -> MirrorResult<()> + 'static) -> Self {
        Self::new(DecorationRequest::Class, decorator)
    }

    /// A member decoration
    pub fn member(
        key: MemberKey,
        decorator: impl Fn(&MirrorRef) -> MirrorResult<()> + 'static,
    ) -> Self {
        Self::new(DecorationRequest::Member(key), decorator)
    }

    /// A parameter decoration
    pub fn parameter(
        member: Option<MemberKey>,
        index: usize,
        decorator: impl Fn(&MirrorRef) -> MirrorResult<()> + 'static,
    ) -> Self {
        Self::new(DecorationRequest::Parameter { member, index }, decorator)
    }

    /// The request this decoration targets
    pub fn request(&self) -> &DecorationRequest {
        &self.request
    }
}

fn scope_word(is_static: bool) -> &'static str {
    if is_static {
        "static"
    } else {
        "instance"
    }
}

fn resolve_member(
    class: &Rc<ClassMirror>,
    key: &MemberKey,
) -> MirrorResult<Rc<PropertyMirror>> {
    class.get_own_property(&key.name, key.is_static).ok_or_else(|| {
        MirrorError::invalid_argument(format!(
            "class '{}' has no {} member '{}'",
            class.name(),
            scope_word(key.is_static),
            key.name
        ))
    })
}

/// Resolve `request` against `constructor` in mutation mode and invoke
/// `decorator` with the resolved mirror.
pub fn apply_decorator(
    registry: &mut MirrorRegistry,
    constructor: &Value,
    request: &DecorationRequest,
    decorator: impl FnOnce(&MirrorRef) -> MirrorResult<()>,
) -> MirrorResult<()> {
    match request {
        DecorationRequest::Class => {
            let mirror = registry.get_or_create(constructor, true)?;
            decorator(&MirrorRef::Class(mirror))
        }
        DecorationRequest::Member(key) => {
            let class = registry.get_or_create(constructor, true)?;
            let member = resolve_member(&class, key)?;
            decorator(&MirrorRef::Property(member))
        }
        DecorationRequest::Parameter { member, index } => {
            let class = registry.get_or_create(constructor, true)?;
            let parameters = match member {
                None => class.parameters(),
                Some(key) => {
                    let property = resolve_member(&class, key)?;
                    property.parameters().ok_or_else(|| {
                        MirrorError::invalid_argument(format!(
                            "member '{}' of class '{}' has no parameters",
                            key.name,
                            class.name()
                        ))
                    })?
                }
            };
            let parameter = parameters.get(*index).cloned().ok_or_else(|| {
                MirrorError::invalid_argument(format!(
                    "parameter index {index} out of range ({} declared)",
                    parameters.len()
                ))
            })?;
            decorator(&MirrorRef::Parameter(parameter))
        }
        // Field decorations are reserved and not yet implemented
        DecorationRequest::Field(_) => Ok(()),
    }
}

/// Freeze the class and hand back its exported (possibly wrapped)
/// constructor. Must see the mirror in the initializing stage; a second
/// finalize, like any mutation after the first, fails.
pub fn finalize(registry: &mut MirrorRegistry, constructor: &Value) -> MirrorResult<Value> {
    let mirror = registry.get_or_create(constructor, true)?;
    mirror.freeze();
    Ok(Value::Function(mirror.construct()))
}

/// Apply `decorations` strictly in order, then finalize.
///
/// The first error aborts the remaining sequence with no rollback, leaving
/// the class mirror in whatever partially-mutated state it had reached.
pub fn decorate(
    registry: &mut MirrorRegistry,
    constructor: &Value,
    decorations: &[Decoration],
) -> MirrorResult<Value> {
    for decoration in decorations {
        apply_decorator(registry, constructor, &decoration.request, |mirror| {
            (decoration.decorator)(mirror)
        })?;
    }
    finalize(registry, constructor)
}
