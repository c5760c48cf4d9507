//! Core composition runtime for Mixable.
//! This crate is the single source of truth for class extension and
//! version-gated mixin inclusion semantics.
//!
//! Composition is synchronous and single-threaded: class handles are
//! `Rc`-backed and all mutation happens within one call stack during
//! extension or inclusion.

pub mod compose;
pub mod logging;

pub use compose::builder::{Builder, ClassDef};
pub use compose::class::{Class, ClassId, ClassSummary};
pub use compose::composer::{ComposeError, ComposeResult, Composer};
pub use compose::instance::{Instance, InstanceId};
pub use compose::member::{InstanceMember, MemberError, StaticMember};
pub use compose::version::{CompareOp, VersionError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, Class};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn root_class_carries_crate_version() {
        let root = Class::root();
        assert_eq!(root.name(), "Mixable");
        assert_eq!(root.version(), Some(core_version()));
    }
}
