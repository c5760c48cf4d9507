//! Constructed class instances.
//!
//! # Responsibility
//! - Share the owning class's instance-member surface.
//! - Hold per-instance fields that shadow shared members.
//!
//! # Invariants
//! - `id` is stable for the instance lifetime.
//! - Late member additions on the class are visible to existing instances.

use crate::compose::class::Class;
use crate::compose::member::{InstanceMember, MemberError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{self, Formatter};
use std::rc::Rc;
use uuid::Uuid;

/// Stable identifier for every constructed instance.
pub type InstanceId = Uuid;

/// An object constructed from a [`Class`].
///
/// Cloning shares the underlying instance.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

struct InstanceInner {
    id: InstanceId,
    class: Class,
    fields: RefCell<BTreeMap<String, Value>>,
}

impl Instance {
    pub(crate) fn new(class: Class) -> Self {
        Self {
            inner: Rc::new(InstanceInner {
                id: Uuid::new_v4(),
                class,
                fields: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Reads a field: own fields first, then data members on the class's
    /// instance surface.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.inner.fields.borrow().get(name) {
            return Some(value.clone());
        }
        self.inner.class.member_value(name)
    }

    /// Writes an own field, shadowing any shared member of the same name.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .fields
            .borrow_mut()
            .insert(name.into(), value.into());
    }

    /// Invokes a callable member from the class surface with this instance
    /// as receiver.
    ///
    /// # Errors
    /// - `MemberError::NotFound` when the class surface has no such member.
    /// - `MemberError::NotCallable` when the member is a data value.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, MemberError> {
        let member = self
            .inner
            .class
            .instance_member(name)
            .ok_or_else(|| MemberError::NotFound {
                class: self.class().name().to_string(),
                member: name.to_string(),
            })?;
        match member {
            InstanceMember::Method(method) => Ok(method(self, args)),
            InstanceMember::Value(_) => Err(MemberError::NotCallable {
                class: self.class().name().to_string(),
                member: name.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.inner.id)
            .field("class", &self.inner.class.name())
            .finish_non_exhaustive()
    }
}
