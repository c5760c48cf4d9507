//! Class objects: extension, membership and construction.
//!
//! # Responsibility
//! - Define the class handle shared by composition, instances and callers.
//! - Keep superclass history append-only and member layering
//!   last-write-wins.
//!
//! # Invariants
//! - `id` is stable and never reused for another class.
//! - `name` and `version` are immutable after creation; member maps and
//!   `superclasses` only grow through composition.
//! - Static members flow to subclasses by replaying the base declaration,
//!   never by copying maps.

use crate::compose::builder::{Builder, ClassDef};
use crate::compose::composer::{ComposeResult, Composer};
use crate::compose::instance::Instance;
use crate::compose::member::{InstanceMember, MemberError, StaticMember};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{self, Formatter};
use std::rc::Rc;
use uuid::Uuid;

/// Stable identifier for every class object.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ClassId = Uuid;

const ROOT_CLASS_NAME: &str = "Mixable";

/// A composable class object.
///
/// `Class` is a cheap handle: cloning shares the underlying object, and
/// equality is object identity. All mutation happens synchronously within a
/// single call stack during extension or inclusion.
#[derive(Clone)]
pub struct Class {
    inner: Rc<ClassInner>,
}

struct ClassInner {
    id: ClassId,
    name: String,
    version: Option<String>,
    base: Option<Class>,
    builder: Option<Builder>,
    state: RefCell<ClassState>,
}

#[derive(Default)]
struct ClassState {
    superclasses: Vec<Class>,
    statics: BTreeMap<String, StaticMember>,
    members: BTreeMap<String, InstanceMember>,
}

/// Serializable lineage snapshot for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub id: ClassId,
    pub name: String,
    pub version: Option<String>,
    pub superclasses: Vec<String>,
}

impl Class {
    /// Returns a fresh root class carrying the crate's own name and version.
    ///
    /// The root has no base and no builder; it is the origin every lineage
    /// includes first.
    pub fn root() -> Class {
        Class::create(
            ROOT_CLASS_NAME.to_string(),
            Some(crate::core_version().to_string()),
            None,
            None,
        )
    }

    fn create(
        name: String,
        version: Option<String>,
        base: Option<Class>,
        builder: Option<Builder>,
    ) -> Class {
        Class {
            inner: Rc::new(ClassInner {
                id: Uuid::new_v4(),
                name,
                version,
                base,
                builder,
                state: RefCell::new(ClassState::default()),
            }),
        }
    }

    /// Extends this class into a new subclass described by `def`.
    ///
    /// The new class includes `self` first, so after self-build
    /// `superclasses()[0]` is this class and every static the base declares
    /// is replayed onto the subclass. The declared builder then runs with an
    /// empty inclusion context. A missing name derives `Sub<base name>`.
    ///
    /// The version string is not validated here; malformed input errors at
    /// first comparison.
    ///
    /// # Errors
    /// - Propagates version gating and builder failures from nested
    ///   inclusions.
    pub fn extend(&self, def: ClassDef) -> ComposeResult<Class> {
        let name = def
            .name
            .unwrap_or_else(|| format!("Sub{}", self.name()));
        let class = Class::create(name, def.version, Some(self.clone()), def.builder);
        let mut composer = Composer::new(&class);
        composer.apply_declaration(&class)?;
        debug!(
            "event=class_extended module=compose name={} version={} base={} superclasses={}",
            class.name(),
            class.version().unwrap_or("none"),
            self.name(),
            class.superclasses().len()
        );
        Ok(class)
    }

    /// Includes `other` directly into this class, outside any builder.
    ///
    /// Same gating rules as [`Composer::include`]. Returns `&self` for
    /// chaining.
    ///
    /// # Errors
    /// - Propagates version gating and builder failures.
    pub fn include(&self, other: &Class) -> ComposeResult<&Self> {
        let mut composer = Composer::new(self);
        composer.include(other)?;
        Ok(self)
    }

    pub fn id(&self) -> ClassId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The raw version string, if one was declared.
    pub fn version(&self) -> Option<&str> {
        self.inner.version.as_deref()
    }

    /// The class this one was extended from. `None` only for the root.
    pub fn base(&self) -> Option<&Class> {
        self.inner.base.as_ref()
    }

    pub(crate) fn builder(&self) -> Option<&Builder> {
        self.inner.builder.as_ref()
    }

    pub(crate) fn has_declaration(&self) -> bool {
        self.inner.base.is_some() || self.inner.builder.is_some()
    }

    /// The ordered inclusion history of this class.
    pub fn superclasses(&self) -> Vec<Class> {
        self.inner.state.borrow().superclasses.clone()
    }

    /// Superclass names in inclusion order.
    pub fn superclass_names(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .superclasses
            .iter()
            .map(|superclass| superclass.name().to_string())
            .collect()
    }

    pub(crate) fn push_superclass(&self, other: &Class) {
        self.inner
            .state
            .borrow_mut()
            .superclasses
            .push(other.clone());
    }

    /// Sets a data member on the static surface. Last write wins.
    pub fn set_static_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .state
            .borrow_mut()
            .statics
            .insert(name.into(), StaticMember::Value(value.into()));
    }

    /// Sets a callable member on the static surface. Last write wins.
    pub fn set_static_fn(
        &self,
        name: impl Into<String>,
        method: impl Fn(&Class, &[Value]) -> Value + 'static,
    ) {
        self.inner
            .state
            .borrow_mut()
            .statics
            .insert(name.into(), StaticMember::Method(Rc::new(method)));
    }

    /// Reads a data member from the static surface.
    ///
    /// `None` when missing or when the member is callable.
    pub fn static_value(&self, name: &str) -> Option<Value> {
        match self.inner.state.borrow().statics.get(name) {
            Some(StaticMember::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Reads any member from the static surface.
    pub fn static_member(&self, name: &str) -> Option<StaticMember> {
        self.inner.state.borrow().statics.get(name).cloned()
    }

    /// Invokes a callable static member with this class as receiver.
    ///
    /// # Errors
    /// - `MemberError::NotFound` when no member has this name.
    /// - `MemberError::NotCallable` when the member is a data value.
    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value, MemberError> {
        let member = self
            .static_member(name)
            .ok_or_else(|| MemberError::NotFound {
                class: self.name().to_string(),
                member: name.to_string(),
            })?;
        match member {
            StaticMember::Method(method) => Ok(method(self, args)),
            StaticMember::Value(_) => Err(MemberError::NotCallable {
                class: self.name().to_string(),
                member: name.to_string(),
            }),
        }
    }

    /// Sets a data member on the instance surface. Last write wins.
    pub fn set_member_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .state
            .borrow_mut()
            .members
            .insert(name.into(), InstanceMember::Value(value.into()));
    }

    /// Sets a callable member on the instance surface. Last write wins.
    pub fn set_member_fn(
        &self,
        name: impl Into<String>,
        method: impl Fn(&Instance, &[Value]) -> Value + 'static,
    ) {
        self.inner
            .state
            .borrow_mut()
            .members
            .insert(name.into(), InstanceMember::Method(Rc::new(method)));
    }

    /// Reads a data member from the instance surface.
    ///
    /// `None` when missing or when the member is callable.
    pub fn member_value(&self, name: &str) -> Option<Value> {
        match self.inner.state.borrow().members.get(name) {
            Some(InstanceMember::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Reads any member from the instance surface.
    pub fn instance_member(&self, name: &str) -> Option<InstanceMember> {
        self.inner.state.borrow().members.get(name).cloned()
    }

    /// Constructs a new instance sharing this class's instance-member
    /// surface.
    pub fn construct(&self) -> Instance {
        Instance::new(self.clone())
    }

    /// Serializable snapshot of identity, version and lineage.
    pub fn summary(&self) -> ClassSummary {
        ClassSummary {
            id: self.id(),
            name: self.name().to_string(),
            version: self.inner.version.clone(),
            superclasses: self.superclass_names(),
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("version", &self.inner.version)
            .finish_non_exhaustive()
    }
}
