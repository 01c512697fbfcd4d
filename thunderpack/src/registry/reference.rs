//! Dependency reference string parsing.
//!
//! Registry and manifest data encode dependencies as
//! `<author>-<name>-<version>` strings, e.g. `alice-ExampleMod-1.2.0`.
//! The grammar is deliberately explicit:
//!
//! - `version` is the trailing hyphen-delimited segment and must be a
//!   `major.minor.patch` triple of decimal numbers,
//! - `name` is the single segment before the version,
//! - `author` is everything before that and may itself contain hyphens.
//!
//! Package names therefore may not contain hyphens; author names may.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

/// Errors produced while parsing a dependency reference string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefParseError {
    /// Fewer than three hyphen-delimited segments.
    #[error("reference {0:?} must have the form <author>-<name>-<version>")]
    TooFewSegments(String),

    /// The trailing segment is not a `major.minor.patch` triple.
    #[error("reference {reference:?} has invalid version segment {segment:?}")]
    InvalidVersion { reference: String, segment: String },

    /// The author or name segment is empty.
    #[error("reference {0:?} has an empty author or name segment")]
    EmptySegment(String),
}

/// A parsed dependency reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Package author, possibly containing hyphens.
    pub author: String,

    /// Bare package name, never containing hyphens.
    pub name: String,

    /// Referenced version.
    pub version: Version,
}

impl PackageRef {
    /// Parse a `<author>-<name>-<version>` reference string.
    ///
    /// # Examples
    ///
    /// ```
    /// use thunderpack::registry::PackageRef;
    ///
    /// let r = PackageRef::parse("alice-ExampleMod-1.2.0").unwrap();
    /// assert_eq!(r.author, "alice");
    /// assert_eq!(r.name, "ExampleMod");
    /// assert_eq!(r.version.to_string(), "1.2.0");
    ///
    /// // Hyphenated authors bind greedily to the author segment.
    /// let r = PackageRef::parse("the-modding-crew-CoreLib-2.0.1").unwrap();
    /// assert_eq!(r.author, "the-modding-crew");
    /// assert_eq!(r.name, "CoreLib");
    /// ```
    pub fn parse(reference: &str) -> Result<Self, RefParseError> {
        let mut segments: Vec<&str> = reference.split('-').collect();
        if segments.len() < 3 {
            return Err(RefParseError::TooFewSegments(reference.to_string()));
        }

        // Unwraps are safe: length checked above.
        let version_segment = segments.pop().unwrap();
        let name = segments.pop().unwrap();
        let author = segments.join("-");

        let version = parse_version_triple(version_segment).ok_or_else(|| {
            RefParseError::InvalidVersion {
                reference: reference.to_string(),
                segment: version_segment.to_string(),
            }
        })?;

        if author.is_empty() || name.is_empty() {
            return Err(RefParseError::EmptySegment(reference.to_string()));
        }

        Ok(Self {
            author,
            name: name.to_string(),
            version,
        })
    }

    /// Author-qualified package name (`<author>-<name>`).
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.author, self.name)
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.author, self.name, self.version)
    }
}

impl FromStr for PackageRef {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a strict `major.minor.patch` triple of decimal numbers.
///
/// Stricter than [`Version::parse`]: pre-release and build metadata are
/// rejected because they never occur in reference strings.
fn parse_version_triple(segment: &str) -> Option<Version> {
    let mut parts = segment.split('.');
    let major = parse_number(parts.next()?)?;
    let minor = parse_number(parts.next()?)?;
    let patch = parse_number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Version::new(major, minor, patch))
}

fn parse_number(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
