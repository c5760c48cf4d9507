//! Class member model.
//!
//! Members are either plain data values or callables. Statics receive the
//! owning class as receiver; instance members receive the instance.

use crate::compose::class::Class;
use crate::compose::instance::Instance;
use serde_json::Value;
use std::fmt::{self, Formatter};
use std::rc::Rc;
use thiserror::Error;

/// Callable static member: receives the owning class and call arguments.
pub type StaticFn = dyn Fn(&Class, &[Value]) -> Value;

/// Callable instance member: receives the receiver instance and call arguments.
pub type InstanceFn = dyn Fn(&Instance, &[Value]) -> Value;

/// One entry on a class's static surface.
#[derive(Clone)]
pub enum StaticMember {
    /// Plain data member.
    Value(Value),
    /// Callable member dispatched through [`Class::call_static`].
    Method(Rc<StaticFn>),
}

/// One entry on a class's instance-member surface.
#[derive(Clone)]
pub enum InstanceMember {
    /// Plain data member, readable through [`Instance::get`].
    Value(Value),
    /// Callable member dispatched through [`Instance::call`].
    Method(Rc<InstanceFn>),
}

impl fmt::Debug for StaticMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Method(_) => f.write_str("Method(..)"),
        }
    }
}

impl fmt::Debug for InstanceMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// Member lookup and dispatch errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    #[error("member not found: {class}.{member}")]
    NotFound { class: String, member: String },
    #[error("member is not callable: {class}.{member}")]
    NotCallable { class: String, member: String },
}
