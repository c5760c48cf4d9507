//! Class declaration records.
//!
//! # Responsibility
//! - Describe an extension before it runs: optional name, optional version,
//!   and the retained builder.
//! - Keep the builder inspectable so later inclusions can replay it.

use crate::compose::composer::{ComposeResult, Composer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Formatter};
use std::rc::Rc;

/// Programmatic builder body, run against the class under composition.
pub type DefineFn = dyn Fn(&mut Composer<'_>) -> ComposeResult<()>;

/// Retained builder of a class declaration.
#[derive(Clone)]
pub enum Builder {
    /// Programmatic body: sets members and performs nested inclusions.
    Define(Rc<DefineFn>),
    /// Declarative map, copied onto the instance-member surface.
    Members(BTreeMap<String, Value>),
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Define(_) => f.write_str("Define(..)"),
            Self::Members(members) => f.debug_tuple("Members").field(members).finish(),
        }
    }
}

/// Declaration consumed by [`Class::extend`](crate::Class::extend).
///
/// Every field is optional: a missing name derives a synthetic
/// `Sub<base name>`, a missing version means "unversioned, always
/// compatible", and a missing builder declares nothing beyond the base
/// inclusion.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    pub(crate) name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) builder: Option<Builder>,
}

impl ClassDef {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a declaration with an explicit class name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Attaches a semantic-version string.
    ///
    /// The string is not validated here; malformed input errors at first
    /// comparison.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Attaches a programmatic builder. Replaces any declarative members.
    pub fn define(
        mut self,
        build: impl Fn(&mut Composer<'_>) -> ComposeResult<()> + 'static,
    ) -> Self {
        self.builder = Some(Builder::Define(Rc::new(build)));
        self
    }

    /// Adds one declarative member, destined for the instance surface.
    /// Replaces a programmatic builder if one was set.
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut members = match self.builder.take() {
            Some(Builder::Members(members)) => members,
            _ => BTreeMap::new(),
        };
        members.insert(name.into(), value.into());
        self.builder = Some(Builder::Members(members));
        self
    }

    /// Replaces the builder with a full declarative member map.
    pub fn members(mut self, members: BTreeMap<String, Value>) -> Self {
        self.builder = Some(Builder::Members(members));
        self
    }
}
