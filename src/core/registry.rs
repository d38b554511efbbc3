//! The Go release platform registry.
//!
//! Each release's platform set is derived from the previous one by removing
//! the targets it dropped and appending the targets it introduced. Every set
//! is built once on first use and never changes afterwards; a release with
//! no changes shares its predecessor's storage.
//!
//! The registry pairs every set with the semver requirement selecting it.
//! Rules are ordered oldest first and must tile the version line without
//! gaps or overlaps. A registry that breaks this is a broken build, so the
//! built-in one panics on first use rather than resolving incorrectly.

use std::sync::LazyLock;

use pubgrub::Range;
use semver::{Version, VersionReq};
use thiserror::Error;

use crate::core::platform::{Platform, PlatformSet};
use crate::resolver::version::{exclusive_upper, version_req_to_range};

/// A platform added by a release: `(os, arch, default)`.
type Added = (&'static str, &'static str, bool);

/// A platform dropped by a release: `(os, arch)`.
type Removed = (&'static str, &'static str);

/// Error in the registry's own data.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum RegistryError {
    #[error("release {release}: invalid constraint `{constraint}`")]
    #[diagnostic(code(gotargets::registry::constraint))]
    InvalidConstraint {
        release: String,
        constraint: String,
        #[source]
        source: semver::Error,
    },

    #[error("release {release}: duplicate platform {platform}")]
    #[diagnostic(
        code(gotargets::registry::duplicate),
        help("remove the old entry before appending its replacement")
    )]
    DuplicatePlatform { release: String, platform: String },

    #[error("release {release}: constraint `{constraint}` matches no versions")]
    #[diagnostic(code(gotargets::registry::empty_range))]
    EmptyRange { release: String, constraint: String },

    #[error("release {release}: constraint `{constraint}` has no upper bound")]
    #[diagnostic(
        code(gotargets::registry::unbounded),
        help("versions past the newest rule fall back to the latest set")
    )]
    Unbounded { release: String, constraint: String },

    #[error("release {release}: constraint `{constraint}` overlaps an earlier release")]
    #[diagnostic(code(gotargets::registry::overlap))]
    Overlap { release: String, constraint: String },

    #[error("release {release}: constraint `{constraint}` leaves a gap below it")]
    #[diagnostic(
        code(gotargets::registry::gap),
        help("each rule must start where the previous one ends, and the first must be unbounded below")
    )]
    Gap { release: String, constraint: String },
}

/// Derive a release's platforms from its predecessor's.
///
/// Removals are applied first, then additions, so a target whose default
/// flag changes is removed and appended again. Appending a target that is
/// still present is an error.
pub fn derive_platforms(
    release: &str,
    base: &PlatformSet,
    removed: &[Removed],
    added: &[Added],
) -> Result<PlatformSet, RegistryError> {
    let mut platforms = base.without(removed).to_vec();

    for &(os, arch, default) in added {
        if platforms.iter().any(|p| p.is(os, arch)) {
            return Err(RegistryError::DuplicatePlatform {
                release: release.to_string(),
                platform: format!("{}/{}", os, arch),
            });
        }
        platforms.push(Platform::new(os, arch, default));
    }

    Ok(PlatformSet::new(platforms))
}

fn release(release: &str, base: &PlatformSet, removed: &[Removed], added: &[Added]) -> PlatformSet {
    derive_platforms(release, base, removed, added)
        .unwrap_or_else(|e| panic!("built-in platform registry is corrupt: {}", e))
}

pub static PLATFORMS_1_0: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.0",
        &PlatformSet::empty(),
        &[],
        &[
            ("darwin", "386", true),
            ("darwin", "amd64", true),
            ("linux", "386", true),
            ("linux", "amd64", true),
            ("linux", "arm", true),
            ("freebsd", "386", true),
            ("freebsd", "amd64", true),
            ("openbsd", "386", true),
            ("openbsd", "amd64", true),
            ("windows", "386", true),
            ("windows", "amd64", true),
        ],
    )
});

pub static PLATFORMS_1_1: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.1",
        &PLATFORMS_1_0,
        &[],
        &[
            ("freebsd", "arm", true),
            ("netbsd", "386", true),
            ("netbsd", "amd64", true),
            ("netbsd", "arm", true),
            ("plan9", "386", false),
        ],
    )
});

pub static PLATFORMS_1_3: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.3",
        &PLATFORMS_1_1,
        &[],
        &[
            ("dragonfly", "386", false),
            ("dragonfly", "amd64", false),
            ("nacl", "amd64", false),
            ("nacl", "amd64p32", false),
            ("nacl", "arm", false),
            ("solaris", "amd64", false),
        ],
    )
});

pub static PLATFORMS_1_4: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.4",
        &PLATFORMS_1_3,
        &[],
        &[("android", "arm", false), ("plan9", "amd64", false)],
    )
});

pub static PLATFORMS_1_5: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.5",
        &PLATFORMS_1_4,
        &[],
        &[
            ("darwin", "arm", false),
            ("darwin", "arm64", true),
            ("linux", "arm64", true),
            ("linux", "ppc64", false),
            ("linux", "ppc64le", false),
        ],
    )
});

pub static PLATFORMS_1_6: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.6",
        &PLATFORMS_1_5,
        &[],
        &[
            ("android", "386", false),
            ("linux", "mips64", false),
            ("linux", "mips64le", false),
        ],
    )
});

pub static PLATFORMS_1_7: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.7",
        &PLATFORMS_1_6,
        // Re-appended below, after the new 1.7 targets, with mips64 and
        // mips64le promoted to full support.
        &[
            ("android", "386"),
            ("linux", "mips64"),
            ("linux", "mips64le"),
        ],
        &[
            // While not fully supported s390x is generally useful
            ("linux", "s390x", true),
            ("plan9", "arm", false),
            ("android", "386", false),
            ("linux", "mips64", true),
            ("linux", "mips64le", true),
        ],
    )
});

pub static PLATFORMS_1_8: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.8",
        &PLATFORMS_1_7,
        &[],
        &[("linux", "mips", true), ("linux", "mipsle", true)],
    )
});

// no new platforms in 1.9
pub static PLATFORMS_1_9: LazyLock<PlatformSet> = LazyLock::new(|| PLATFORMS_1_8.clone());

// no new platforms in 1.10
pub static PLATFORMS_1_10: LazyLock<PlatformSet> = LazyLock::new(|| PLATFORMS_1_9.clone());

pub static PLATFORMS_1_11: LazyLock<PlatformSet> =
    LazyLock::new(|| release("1.11", &PLATFORMS_1_10, &[], &[("js", "wasm", true)]));

// no new platforms in 1.12
pub static PLATFORMS_1_12: LazyLock<PlatformSet> = LazyLock::new(|| PLATFORMS_1_11.clone());

// no new platforms in 1.13
pub static PLATFORMS_1_13: LazyLock<PlatformSet> = LazyLock::new(|| PLATFORMS_1_12.clone());

/// Native Client was removed in 1.14 (https://golang.org/doc/go1.14#nacl)
pub static PLATFORMS_1_14: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.14",
        &PLATFORMS_1_13,
        &[("nacl", "amd64"), ("nacl", "amd64p32"), ("nacl", "arm")],
        &[],
    )
});

/// darwin/386 and darwin/arm are unsupported from 1.15 (https://golang.org/doc/go1.15#darwin)
pub static PLATFORMS_1_15: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.15",
        &PLATFORMS_1_14,
        &[("darwin", "386"), ("darwin", "arm")],
        &[("linux", "riscv64", true)],
    )
});

pub static PLATFORMS_1_16: LazyLock<PlatformSet> = LazyLock::new(|| {
    release(
        "1.16",
        &PLATFORMS_1_15,
        &[],
        &[
            // iOS simulator on macOS devices with x86 CPU
            ("ios", "amd64", false),
            // regular iOS devices
            ("ios", "arm64", false),
        ],
    )
});

pub static PLATFORMS_1_17: LazyLock<PlatformSet> =
    LazyLock::new(|| release("1.17", &PLATFORMS_1_16, &[], &[("windows", "arm64", true)]));

/// The newest release's platforms; the fallback for anything unrecognized.
pub static PLATFORMS_LATEST: LazyLock<PlatformSet> = LazyLock::new(|| PLATFORMS_1_17.clone());

/// Built-in rules: release name, constraint, platforms.
fn builtin_rules() -> Vec<(&'static str, &'static str, PlatformSet)> {
    vec![
        ("1.0", "<=1.0", PLATFORMS_1_0.clone()),
        ("1.1", ">=1.1, <1.3", PLATFORMS_1_1.clone()),
        ("1.3", ">=1.3, <1.4", PLATFORMS_1_3.clone()),
        ("1.4", ">=1.4, <1.5", PLATFORMS_1_4.clone()),
        ("1.5", ">=1.5, <1.6", PLATFORMS_1_5.clone()),
        ("1.6", ">=1.6, <1.7", PLATFORMS_1_6.clone()),
        ("1.7", ">=1.7, <1.8", PLATFORMS_1_7.clone()),
        ("1.8", ">=1.8, <1.9", PLATFORMS_1_8.clone()),
        ("1.9", ">=1.9, <1.10", PLATFORMS_1_9.clone()),
        ("1.10", ">=1.10, <1.11", PLATFORMS_1_10.clone()),
        ("1.11", ">=1.11, <1.12", PLATFORMS_1_11.clone()),
        ("1.12", ">=1.12, <1.13", PLATFORMS_1_12.clone()),
        ("1.13", ">=1.13, <1.14", PLATFORMS_1_13.clone()),
        ("1.14", ">=1.14, <1.15", PLATFORMS_1_14.clone()),
        ("1.15", ">=1.15, <1.16", PLATFORMS_1_15.clone()),
        ("1.16", ">=1.16, <1.17", PLATFORMS_1_16.clone()),
        ("1.17", ">=1.17, <1.18", PLATFORMS_1_17.clone()),
    ]
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    Registry::new(builtin_rules(), PLATFORMS_LATEST.clone())
        .unwrap_or_else(|e| panic!("built-in platform registry is corrupt: {}", e))
});

/// One release rule: the versions it covers and their platforms.
#[derive(Debug, Clone)]
pub struct Release {
    /// Release name, e.g. `1.14`
    pub name: &'static str,

    /// Constraint as written
    pub constraint_text: &'static str,

    /// Parsed constraint
    pub constraint: VersionReq,

    /// Supported platforms
    pub platforms: PlatformSet,
}

impl Release {
    /// Check whether this release covers a version.
    pub fn matches(&self, version: &Version) -> bool {
        self.constraint.matches(version)
    }
}

/// Ordered release rules plus the latest set.
#[derive(Debug, Clone)]
pub struct Registry {
    releases: Vec<Release>,
    latest: PlatformSet,
}

impl Registry {
    /// The built-in Go registry.
    ///
    /// Panics on first use if the built-in data is inconsistent.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Build and validate a registry from `(name, constraint, platforms)`
    /// rules, oldest first.
    pub fn new(
        rules: Vec<(&'static str, &'static str, PlatformSet)>,
        latest: PlatformSet,
    ) -> Result<Self, RegistryError> {
        let mut releases = Vec::with_capacity(rules.len());

        for (name, constraint_text, platforms) in rules {
            let constraint = VersionReq::parse(constraint_text).map_err(|source| {
                RegistryError::InvalidConstraint {
                    release: name.to_string(),
                    constraint: constraint_text.to_string(),
                    source,
                }
            })?;

            if let Some(dup) = platforms.find_duplicate() {
                return Err(RegistryError::DuplicatePlatform {
                    release: name.to_string(),
                    platform: dup.to_string(),
                });
            }

            releases.push(Release {
                name,
                constraint_text,
                constraint,
                platforms,
            });
        }

        check_contiguous(&releases)?;

        tracing::debug!("Loaded platform registry with {} releases", releases.len());

        Ok(Registry { releases, latest })
    }

    /// All release rules, oldest first.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Look up a release rule by name.
    pub fn release(&self, name: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.name == name)
    }

    /// The newest release's platforms.
    pub fn latest(&self) -> &PlatformSet {
        &self.latest
    }

    /// The first release whose constraint covers `version`.
    pub fn find(&self, version: &Version) -> Option<&Release> {
        self.releases.iter().find(|r| r.matches(version))
    }
}

/// Check that the rules cover one contiguous, non-overlapping span of the
/// version line, starting unbounded below.
fn check_contiguous(releases: &[Release]) -> Result<(), RegistryError> {
    let mut covered: Range<Version> = Range::empty();

    for release in releases {
        let err_parts = || (release.name.to_string(), release.constraint_text.to_string());
        let range = version_req_to_range(&release.constraint);

        if range == Range::empty() {
            let (release, constraint) = err_parts();
            return Err(RegistryError::EmptyRange { release, constraint });
        }

        if covered.intersection(&range) != Range::empty() {
            let (release, constraint) = err_parts();
            return Err(RegistryError::Overlap { release, constraint });
        }

        let Some(upper) = exclusive_upper(&release.constraint) else {
            let (release, constraint) = err_parts();
            return Err(RegistryError::Unbounded { release, constraint });
        };

        covered = covered.union(&range);
        if covered != Range::strictly_lower_than(upper) {
            let (release, constraint) = err_parts();
            return Err(RegistryError::Gap { release, constraint });
        }
    }

    Ok(())
}
