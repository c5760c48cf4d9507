//! Semantic-version comparison between same-named classes.
//!
//! # Responsibility
//! - Decide whether two class versions are tilde-compatible (same
//!   major.minor, patch level may differ).
//! - Apply relational operators on semver precedence.
//!
//! # Invariants
//! - Version strings are parsed lazily; malformed input errors at first
//!   comparison, never at declaration time.
//! - Comparisons are only meaningful within same-named lineages.
//! - A class without a version never blocks composition.

use crate::compose::class::Class;
use semver::{Comparator, Op, Version, VersionReq};
use std::cmp::Ordering;
use thiserror::Error;

/// Relational operator applied to two compatible versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Older,
    SameOrOlder,
    Same,
    SameOrNewer,
    Newer,
}

impl CompareOp {
    /// Returns whether `ordering` (left relative to right) satisfies the
    /// operator.
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Older => ordering == Ordering::Less,
            Self::SameOrOlder => ordering != Ordering::Greater,
            Self::Same => ordering == Ordering::Equal,
            Self::SameOrNewer => ordering != Ordering::Less,
            Self::Newer => ordering == Ordering::Greater,
        }
    }
}

/// Version comparison errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("class `{class}` has malformed version `{version}`: {reason}")]
    Malformed {
        class: String,
        version: String,
        reason: String,
    },
    #[error("class `{left_class}` v{left_version} is not compatible with class `{right_class}` v{right_version}")]
    Incompatible {
        left_class: String,
        left_version: String,
        right_class: String,
        right_version: String,
    },
}

pub(crate) fn parse_version(class: &str, raw: &str) -> Result<Version, VersionError> {
    Version::parse(raw).map_err(|err| VersionError::Malformed {
        class: class.to_string(),
        version: raw.to_string(),
        reason: err.to_string(),
    })
}

fn tilde_requirement(version: &Version) -> VersionReq {
    VersionReq {
        comparators: vec![Comparator {
            op: Op::Tilde,
            major: version.major,
            minor: Some(version.minor),
            patch: Some(version.patch),
            pre: version.pre.clone(),
        }],
    }
}

/// Two versions are compatible when either lies in the other's tilde range.
pub(crate) fn tilde_compatible(left: &Version, right: &Version) -> bool {
    tilde_requirement(right).matches(left) || tilde_requirement(left).matches(right)
}

impl Class {
    /// Compares this class with `other` under `op`.
    ///
    /// # Contract
    /// - Different names never compare: returns `false`.
    /// - If either side lacks a version, returns `true` for every operator:
    ///   unversioned classes never block composition.
    /// - Incompatible versions return `false`, or error when `strict`.
    /// - Otherwise the operator is applied to semver precedence.
    ///
    /// # Errors
    /// - `VersionError::Malformed` when either version string fails to parse
    ///   (strict or not).
    /// - `VersionError::Incompatible` when `strict` and the versions are not
    ///   tilde-compatible.
    pub fn compare_with(
        &self,
        other: &Class,
        op: CompareOp,
        strict: bool,
    ) -> Result<bool, VersionError> {
        if self.name() != other.name() {
            return Ok(false);
        }
        let (Some(left_raw), Some(right_raw)) = (self.version(), other.version()) else {
            return Ok(true);
        };
        let left = parse_version(self.name(), left_raw)?;
        let right = parse_version(other.name(), right_raw)?;
        if !tilde_compatible(&left, &right) {
            if strict {
                return Err(VersionError::Incompatible {
                    left_class: self.name().to_string(),
                    left_version: left.to_string(),
                    right_class: other.name().to_string(),
                    right_version: right.to_string(),
                });
            }
            return Ok(false);
        }
        Ok(op.matches(left.cmp_precedence(&right)))
    }

    /// `self < other` under [`Class::compare_with`] rules.
    pub fn is_older_than(&self, other: &Class, strict: bool) -> Result<bool, VersionError> {
        self.compare_with(other, CompareOp::Older, strict)
    }

    /// `self <= other` under [`Class::compare_with`] rules.
    pub fn is_same_as_or_older_than(
        &self,
        other: &Class,
        strict: bool,
    ) -> Result<bool, VersionError> {
        self.compare_with(other, CompareOp::SameOrOlder, strict)
    }

    /// `self == other` under [`Class::compare_with`] rules.
    pub fn is_same_as(&self, other: &Class, strict: bool) -> Result<bool, VersionError> {
        self.compare_with(other, CompareOp::Same, strict)
    }

    /// `self >= other` under [`Class::compare_with`] rules.
    pub fn is_same_as_or_newer_than(
        &self,
        other: &Class,
        strict: bool,
    ) -> Result<bool, VersionError> {
        self.compare_with(other, CompareOp::SameOrNewer, strict)
    }

    /// `self > other` under [`Class::compare_with`] rules.
    pub fn is_newer_than(&self, other: &Class, strict: bool) -> Result<bool, VersionError> {
        self.compare_with(other, CompareOp::Newer, strict)
    }

    /// Finds the newest already-included superclass named `name`.
    ///
    /// Versioned entries beat unversioned ones; among versioned entries the
    /// highest semver precedence wins.
    pub(crate) fn newest_superclass_named(
        &self,
        name: &str,
    ) -> Result<Option<Class>, VersionError> {
        let mut newest: Option<Class> = None;
        for superclass in self.superclasses() {
            if superclass.name() != name {
                continue;
            }
            let replace = match &newest {
                None => true,
                Some(current) => match (current.version(), superclass.version()) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(current_raw), Some(candidate_raw)) => {
                        let held = parse_version(current.name(), current_raw)?;
                        let candidate = parse_version(superclass.name(), candidate_raw)?;
                        candidate.cmp_precedence(&held) == Ordering::Greater
                    }
                },
            };
            if replace {
                newest = Some(superclass);
            }
        }
        Ok(newest)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_version, tilde_compatible, CompareOp, VersionError};
    use std::cmp::Ordering;

    #[test]
    fn compare_op_matches_expected_orderings() {
        assert!(CompareOp::Older.matches(Ordering::Less));
        assert!(!CompareOp::Older.matches(Ordering::Equal));
        assert!(CompareOp::SameOrOlder.matches(Ordering::Equal));
        assert!(!CompareOp::SameOrOlder.matches(Ordering::Greater));
        assert!(CompareOp::Same.matches(Ordering::Equal));
        assert!(!CompareOp::Same.matches(Ordering::Less));
        assert!(CompareOp::SameOrNewer.matches(Ordering::Greater));
        assert!(!CompareOp::SameOrNewer.matches(Ordering::Less));
        assert!(CompareOp::Newer.matches(Ordering::Greater));
        assert!(!CompareOp::Newer.matches(Ordering::Equal));
    }

    #[test]
    fn tilde_compatibility_tolerates_patch_level_only() {
        let v010 = parse_version("Class", "0.1.0").expect("0.1.0 should parse");
        let v015 = parse_version("Class", "0.1.5").expect("0.1.5 should parse");
        let v020 = parse_version("Class", "0.2.0").expect("0.2.0 should parse");
        let v123 = parse_version("Class", "1.2.3").expect("1.2.3 should parse");
        let v129 = parse_version("Class", "1.2.9").expect("1.2.9 should parse");
        let v130 = parse_version("Class", "1.3.0").expect("1.3.0 should parse");

        assert!(tilde_compatible(&v010, &v015));
        assert!(tilde_compatible(&v015, &v010));
        assert!(!tilde_compatible(&v010, &v020));
        assert!(tilde_compatible(&v123, &v129));
        assert!(!tilde_compatible(&v123, &v130));
    }

    #[test]
    fn parse_version_reports_class_and_input() {
        let err = parse_version("Class", "banana").expect_err("malformed input must fail");
        match err {
            VersionError::Malformed { class, version, .. } => {
                assert_eq!(class, "Class");
                assert_eq!(version, "banana");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
