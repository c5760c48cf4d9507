//! Versioned class composition.
//!
//! # Responsibility
//! - Extend class objects into subclasses that inherit the base's statics.
//! - Compose classes with mixins through idempotent, version-gated inclusion.
//! - Construct instances sharing one accumulated member surface.
//!
//! # Invariants
//! - A class's superclass history is append-only and insertion-ordered.
//! - A same-named, equal-or-older inclusion never mutates the target.
//! - Version strings are validated lazily, at first comparison.

pub mod builder;
pub mod class;
pub mod composer;
pub mod instance;
pub mod member;
pub mod version;
