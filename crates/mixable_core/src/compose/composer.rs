//! Version-aware class inclusion.
//!
//! # Responsibility
//! - Apply class declarations (base inclusion first, then builder) to a
//!   target class.
//! - Gate repeat inclusions: a same-named equal-or-newer superclass makes
//!   the operation a no-op.
//! - Track the in-progress inclusion stack for patch detection.
//!
//! # Invariants
//! - A same-named, equal-or-older inclusion never mutates the target and
//!   never re-runs a builder.
//! - A shared ancestor's builder runs at most once per composed class.
//! - The in-progress stack is restored after every inclusion, nested or not.

use crate::compose::builder::Builder;
use crate::compose::class::Class;
use crate::compose::instance::Instance;
use crate::compose::version::{parse_version, VersionError};
use log::debug;
use serde_json::Value;
use std::cmp::Ordering;
use std::rc::Rc;
use thiserror::Error;

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Composition errors raised by `extend` and `include`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Version gating failed while including a class.
    #[error(transparent)]
    Version(#[from] VersionError),
    /// A builder refused to apply its declaration.
    #[error("builder aborted: {0}")]
    Aborted(String),
}

/// Build context threaded through builders while a class is composed.
///
/// The composer carries the target class and the explicit stack of classes
/// whose declarations are currently being replayed; patch probes read the top
/// of that stack, so they are meaningful only inside an in-progress
/// inclusion.
pub struct Composer<'a> {
    target: &'a Class,
    including: Vec<Class>,
}

impl<'a> Composer<'a> {
    pub(crate) fn new(target: &'a Class) -> Self {
        Self {
            target,
            including: Vec::new(),
        }
    }

    /// The class currently being composed.
    pub fn target(&self) -> &Class {
        self.target
    }

    /// Includes `other` into the target class.
    ///
    /// No-op when the target already has a superclass that is the same as or
    /// newer than `other` (strict comparison, so same-named incompatible
    /// versions error). Otherwise replays `other`'s declaration against the
    /// target and appends `other` to the superclass history.
    pub fn include(&mut self, other: &Class) -> ComposeResult<&mut Self> {
        if has_same_or_newer_superclass(self.target, other)? {
            debug!(
                "event=include_skipped module=compose target={} source={}",
                self.target.name(),
                other.name()
            );
            return Ok(self);
        }

        if other.has_declaration() {
            self.including.push(other.clone());
            let applied = self.apply_declaration(other);
            self.including.pop();
            applied?;
        }

        self.target.push_superclass(other);
        debug!(
            "event=include_applied module=compose target={} source={} superclasses={}",
            self.target.name(),
            other.name(),
            self.target.superclasses().len()
        );
        Ok(self)
    }

    /// Replays `source`'s declaration against the target: the source's own
    /// base class is included first, then its builder runs.
    pub(crate) fn apply_declaration(&mut self, source: &Class) -> ComposeResult<()> {
        if let Some(base) = source.base() {
            let base = base.clone();
            self.include(&base)?;
        }
        match source.builder() {
            Some(Builder::Define(build)) => {
                let build = Rc::clone(build);
                build(self)?;
            }
            Some(Builder::Members(members)) => {
                for (name, value) in members {
                    self.target.set_member_value(name.clone(), value.clone());
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Sets a data member on the target's static surface.
    pub fn set_static_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.target.set_static_value(name, value);
        self
    }

    /// Sets a callable member on the target's static surface.
    pub fn set_static_fn(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&Class, &[Value]) -> Value + 'static,
    ) -> &mut Self {
        self.target.set_static_fn(name, method);
        self
    }

    /// Sets a data member on the target's instance surface.
    pub fn set_member_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.target.set_member_value(name, value);
        self
    }

    /// Sets a callable member on the target's instance surface.
    pub fn set_member_fn(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&Instance, &[Value]) -> Value + 'static,
    ) -> &mut Self {
        self.target.set_member_fn(name, method);
        self
    }

    /// Returns whether the class currently being included shares its name
    /// with a superclass the target already has.
    ///
    /// Outside an in-progress inclusion this is always `false`.
    pub fn is_patching(&self) -> bool {
        let Some(current) = self.including.last() else {
            return false;
        };
        self.target
            .superclasses()
            .iter()
            .any(|superclass| superclass.name() == current.name())
    }

    /// Returns whether the in-progress inclusion upgrades an already-present
    /// same-named superclass to `version`.
    ///
    /// True only when the newest known same-named superclass is strictly
    /// older than `version`; an unversioned newest counts as older.
    ///
    /// # Errors
    /// - `VersionError::Malformed` when `version` or a recorded superclass
    ///   version fails to parse.
    pub fn is_patching_to(&self, version: &str) -> Result<bool, VersionError> {
        let Some(current) = self.including.last() else {
            return Ok(false);
        };
        let Some(newest) = self.target.newest_superclass_named(current.name())? else {
            return Ok(false);
        };
        let Some(known_raw) = newest.version() else {
            return Ok(true);
        };
        let known = parse_version(newest.name(), known_raw)?;
        let probe = parse_version(current.name(), version)?;
        Ok(known.cmp_precedence(&probe) == Ordering::Less)
    }
}

/// Returns whether any recorded superclass is the same as or newer than
/// `other`, using strict comparison so incompatible same-named versions
/// propagate as errors.
fn has_same_or_newer_superclass(target: &Class, other: &Class) -> Result<bool, VersionError> {
    for superclass in target.superclasses() {
        if superclass.is_same_as_or_newer_than(other, true)? {
            return Ok(true);
        }
    }
    Ok(false)
}
