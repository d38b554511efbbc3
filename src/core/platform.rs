//! Platform definitions - what can be cross-compiled to.
//!
//! A [`Platform`] is an OS/arch pair a Go toolchain can target. A
//! [`PlatformSet`] is the ordered, immutable list of platforms supported by
//! one Go release. Sets are cheap to clone and clones share storage, so a
//! release that changes nothing simply aliases its predecessor.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A combination of OS/arch that can be built against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Platform {
    /// Operating system (linux, darwin, windows, etc.)
    pub os: String,

    /// CPU architecture (amd64, arm64, etc.)
    pub arch: String,

    /// Included as a build target when no OS/arch is specified.
    ///
    /// Only popular or generally useful targets are defaults. Android, for
    /// example, is not: it is rare to cross-compile to Android and Linux
    /// in the same run.
    pub default: bool,
}

impl Platform {
    /// Create a new platform.
    pub fn new(os: &str, arch: &str, default: bool) -> Self {
        Platform {
            os: os.to_string(),
            arch: arch.to_string(),
            default,
        }
    }

    /// Whether this platform is the given OS/arch pair.
    ///
    /// The default flag is metadata and never part of identity.
    pub fn is(&self, os: &str, arch: &str) -> bool {
        self.os == os && self.arch == arch
    }

    /// Whether two platforms name the same OS/arch pair.
    pub fn same_target(&self, other: &Platform) -> bool {
        self.is(&other.os, &other.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Error parsing an `os/arch` string.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
#[error("invalid platform `{input}`: expected `os/arch`")]
#[diagnostic(code(gotargets::platform::parse), help("e.g. `linux/amd64`"))]
pub struct PlatformParseError {
    pub input: String,
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse `os/arch`. The result is not a default target.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PlatformParseError {
            input: s.to_string(),
        };

        let (os, arch) = s.split_once('/').ok_or_else(err)?;
        if os.is_empty() || arch.is_empty() || arch.contains('/') {
            return Err(err());
        }

        Ok(Platform::new(os, arch, false))
    }
}

/// Remove platforms by OS/arch identity, without touching `from`.
///
/// Each entry of `remove` drops at most one matching element, and the
/// relative order of the survivors is preserved. Entries that match
/// nothing are ignored.
pub fn remove_platforms(from: &[Platform], remove: &[(&str, &str)]) -> Vec<Platform> {
    let mut platforms = from.to_vec();

    for (os, arch) in remove {
        if let Some(idx) = platforms.iter().position(|p| p.is(os, arch)) {
            platforms.remove(idx);
        }
    }

    platforms
}

/// The ordered platforms supported by one Go release.
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformSet {
    platforms: Arc<[Platform]>,
}

impl PlatformSet {
    /// Create a set from an ordered list of platforms.
    pub fn new(platforms: Vec<Platform>) -> Self {
        PlatformSet {
            platforms: platforms.into(),
        }
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// View the platforms as a slice.
    pub fn as_slice(&self) -> &[Platform] {
        &self.platforms
    }

    /// Find a platform by OS/arch.
    pub fn find(&self, os: &str, arch: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.is(os, arch))
    }

    /// Check whether an OS/arch pair is supported.
    pub fn contains(&self, os: &str, arch: &str) -> bool {
        self.find(os, arch).is_some()
    }

    /// Platforms flagged as default build targets.
    pub fn defaults(&self) -> impl Iterator<Item = &Platform> + '_ {
        self.platforms.iter().filter(|p| p.default)
    }

    /// Platforms matching an optional OS and an optional arch.
    pub fn filter<'a>(
        &'a self,
        os: Option<&'a str>,
        arch: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Platform> + 'a {
        self.platforms.iter().filter(move |p| {
            os.map_or(true, |os| p.os == os) && arch.map_or(true, |arch| p.arch == arch)
        })
    }

    /// Copy of this set without the given OS/arch pairs.
    pub fn without(&self, remove: &[(&str, &str)]) -> PlatformSet {
        PlatformSet::new(remove_platforms(&self.platforms, remove))
    }

    /// Whether both sets share the same storage.
    pub fn ptr_eq(&self, other: &PlatformSet) -> bool {
        Arc::ptr_eq(&self.platforms, &other.platforms)
    }

    /// The first OS/arch pair that occurs more than once, if any.
    pub fn find_duplicate(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .enumerate()
            .find(|(i, p)| self.platforms[..*i].iter().any(|q| q.same_target(p)))
            .map(|(_, p)| p)
    }
}

impl Default for PlatformSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for PlatformSet {
    type Target = [Platform];

    fn deref(&self) -> &[Platform] {
        &self.platforms
    }
}

impl<'a> IntoIterator for &'a PlatformSet {
    type Item = &'a Platform;
    type IntoIter = std::slice::Iter<'a, Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.platforms.iter()
    }
}

impl fmt::Debug for PlatformSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.platforms.iter()).finish()
    }
}

impl Serialize for PlatformSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.platforms.iter())
    }
}
