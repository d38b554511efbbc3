//! Go version to platform resolution.
//!
//! The resolver is pure and never fails: anything it cannot make sense of
//! resolves to the latest platform set.

pub mod errors;
pub mod version;

pub use errors::VersionError;

use semver::Version;

use crate::core::platform::PlatformSet;
use crate::core::registry::{Registry, Release};

/// Prefix of Go toolchain version strings (`go1.17.3`).
pub const TOOLCHAIN_PREFIX: &str = "go";

/// Strip the toolchain prefix and parse the rest as a version.
pub fn parse_toolchain_version(s: &str) -> Result<Version, VersionError> {
    let number = s
        .strip_prefix(TOOLCHAIN_PREFIX)
        .ok_or_else(|| VersionError::MissingPrefix {
            version: s.to_string(),
        })?;

    version::parse_version_lenient(number)
}

/// Maps toolchain version strings onto a registry's releases.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a registry.
    pub fn new(registry: &'a Registry) -> Self {
        Resolver { registry }
    }

    /// The registry being resolved against.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Find the release rule covering a version string.
    ///
    /// `Ok(None)` means the version parsed but no rule covers it, e.g. a
    /// release newer than the registry or a pre-release.
    pub fn find_release(&self, version: &str) -> Result<Option<&'a Release>, VersionError> {
        let parsed = parse_toolchain_version(version)?;
        Ok(self.registry.find(&parsed))
    }

    /// Resolve a version string to its supported platforms.
    pub fn resolve(&self, version: &str) -> &'a PlatformSet {
        match self.find_release(version) {
            Ok(Some(release)) => {
                tracing::debug!("{} resolved to Go {} platforms", version, release.name);
                &release.platforms
            }
            Ok(None) => {
                tracing::debug!("No release rule covers {}, using latest", version);
                self.registry.latest()
            }
            Err(VersionError::MissingPrefix { .. }) => {
                tracing::debug!("Unrecognized version string {:?}, using latest", version);
                self.registry.latest()
            }
            Err(e) => {
                tracing::warn!("Unable to parse current go version: {}", e);
                self.registry.latest()
            }
        }
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Resolver::new(Registry::builtin())
    }
}

/// Supported platforms for a Go version string such as `go1.16.5`.
///
/// Unrecognized, malformed, and too-new versions all get the latest set.
pub fn resolve_platforms(version: &str) -> &'static PlatformSet {
    Resolver::default().resolve(version)
}
