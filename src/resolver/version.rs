//! Go version parsing and semver range handling.
//!
//! Go release names (`1.14`, `1.16beta1`, `1.17.3`) are not strict semver,
//! so they are parsed leniently here. Registry constraints are ordinary
//! semver requirements; they are lowered to PubGrub ranges so the registry
//! can check its own coverage with range algebra.

use pubgrub::Range;
use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};

use crate::resolver::errors::VersionError;

/// Parse a Go version number, allowing for incomplete versions.
///
/// Accepts one to three numeric components, an optional pre-release tag
/// either attached (`1.14rc1`) or hyphenated (`1.14.0-rc.1`), and optional
/// `+build` metadata. Missing components are zero.
pub fn parse_version_lenient(s: &str) -> Result<Version, VersionError> {
    // Try exact parse first
    if let Ok(v) = s.parse() {
        return Ok(v);
    }

    let (rest, build) = match s.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (s, None),
    };

    let numeric_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (numbers, tail) = rest.split_at(numeric_end);

    if numbers.is_empty() {
        return Err(VersionError::malformed(s, "no version number"));
    }

    let parts: Vec<&str> = numbers.split('.').collect();
    if parts.len() > 3 {
        return Err(VersionError::malformed(s, "too many version components"));
    }

    let mut components = [0u64; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        if part.is_empty() {
            return Err(VersionError::malformed(s, "empty version component"));
        }
        *slot = part
            .parse()
            .map_err(|_| VersionError::malformed(s, format!("invalid number `{}`", part)))?;
    }

    let mut version = Version::new(components[0], components[1], components[2]);

    if !tail.is_empty() {
        let pre = tail.strip_prefix('-').unwrap_or(tail);
        if pre.is_empty() {
            return Err(VersionError::malformed(s, "empty pre-release tag"));
        }
        version.pre = Prerelease::new(pre)
            .map_err(|e| VersionError::malformed(s, format!("pre-release `{}`: {}", pre, e)))?;
    }

    if let Some(build) = build {
        if build.is_empty() {
            return Err(VersionError::malformed(s, "empty build metadata"));
        }
        version.build = BuildMetadata::new(build)
            .map_err(|e| VersionError::malformed(s, format!("build `{}`: {}", build, e)))?;
    }

    Ok(version)
}

/// Convert a semver VersionReq to a PubGrub Range.
pub fn version_req_to_range(req: &VersionReq) -> Range<Version> {
    if req.comparators.is_empty() {
        return Range::full();
    }

    let mut range = Range::full();

    for comp in &req.comparators {
        let comp_range = comparator_to_range(comp);
        range = range.intersection(&comp_range);
    }

    range
}

/// Convert a single semver Comparator to a PubGrub Range.
///
/// Partial comparators follow semver: `<=1.0` covers every `1.0.x`, and
/// `>1.2` starts at `1.3.0`.
fn comparator_to_range(comp: &Comparator) -> Range<Version> {
    let version = lower_version(comp);

    match comp.op {
        Op::Exact => Range::between(version, next_version(comp)),

        Op::Greater => Range::higher_than(next_version(comp)),

        Op::GreaterEq => Range::higher_than(version),

        Op::Less => Range::strictly_lower_than(version),

        Op::LessEq => Range::strictly_lower_than(next_version(comp)),

        Op::Tilde => {
            // ~1.2.3 means >=1.2.3 <1.3.0
            let upper = if comp.minor.is_some() {
                Version::new(comp.major, version.minor + 1, 0)
            } else {
                Version::new(comp.major + 1, 0, 0)
            };

            Range::between(version, upper)
        }

        Op::Caret => {
            // ^1.2.3 means >=1.2.3 <2.0.0
            // ^0.2.3 means >=0.2.3 <0.3.0
            // ^0.0.3 means >=0.0.3 <0.0.4
            // ^0.0 means >=0.0.0 <0.1.0, ^0 means >=0.0.0 <1.0.0
            let upper = match (comp.minor, comp.patch) {
                _ if comp.major > 0 => Version::new(comp.major + 1, 0, 0),
                (None, _) => Version::new(1, 0, 0),
                (Some(minor), None) => Version::new(0, minor + 1, 0),
                (Some(minor), Some(_)) if minor > 0 => Version::new(0, minor + 1, 0),
                (Some(_), Some(patch)) => Version::new(0, 0, patch + 1),
            };

            Range::between(version, upper)
        }

        Op::Wildcard => Range::between(version, next_version(comp)),

        _ => Range::full(),
    }
}

/// Exclusive upper bound of a requirement, if it has one.
pub fn exclusive_upper(req: &VersionReq) -> Option<Version> {
    req.comparators
        .iter()
        .filter_map(|comp| match comp.op {
            Op::Less => Some(lower_version(comp)),
            Op::LessEq | Op::Exact | Op::Wildcard => Some(next_version(comp)),
            _ => None,
        })
        .min()
}

/// The smallest version a comparator names, with missing components zeroed.
fn lower_version(comp: &Comparator) -> Version {
    Version::new(
        comp.major,
        comp.minor.unwrap_or(0),
        comp.patch.unwrap_or(0),
    )
}

/// The first version past everything a comparator's version names.
fn next_version(comp: &Comparator) -> Version {
    match (comp.minor, comp.patch) {
        (None, _) => Version::new(comp.major + 1, 0, 0),
        (Some(minor), None) => Version::new(comp.major, minor + 1, 0),
        (Some(minor), Some(patch)) => Version::new(comp.major, minor, patch + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_lenient() {
        assert_eq!(parse_version_lenient("1"), Ok(Version::new(1, 0, 0)));
        assert_eq!(parse_version_lenient("1.2"), Ok(Version::new(1, 2, 0)));
        assert_eq!(parse_version_lenient("1.2.3"), Ok(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_attached_prerelease() {
        let v = parse_version_lenient("1.14rc1").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 14, 0));
        assert_eq!(v.pre.as_str(), "rc1");

        let v = parse_version_lenient("1.16beta1").unwrap();
        assert_eq!(v.pre.as_str(), "beta1");
    }

    #[test]
    fn test_parse_hyphenated_prerelease_and_build() {
        let v = parse_version_lenient("1.14-rc.1+abc").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 14, 0));
        assert_eq!(v.pre.as_str(), "rc.1");
        assert_eq!(v.build.as_str(), "abc");

        let v = parse_version_lenient("1.17.3").unwrap();
        assert!(v.pre.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "BADVERSION",
            "1.",
            ".1",
            "1..2",
            "1.2.3.4",
            "1.14-",
            "1.14+",
            "1.14rc 1",
            "99999999999999999999",
        ] {
            assert!(
                matches!(
                    parse_version_lenient(input),
                    Err(VersionError::Malformed { .. })
                ),
                "expected `{}` to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_comparison_range() {
        let req: VersionReq = ">=1.14, <1.15".parse().unwrap();
        let range = version_req_to_range(&req);

        assert!(range.contains(&Version::new(1, 14, 0)));
        assert!(range.contains(&Version::new(1, 14, 15)));
        assert!(!range.contains(&Version::new(1, 15, 0)));
        assert!(!range.contains(&Version::new(1, 13, 9)));
    }

    #[test]
    fn test_partial_less_eq_covers_patches() {
        let req: VersionReq = "<=1.0".parse().unwrap();
        let range = version_req_to_range(&req);

        assert!(range.contains(&Version::new(0, 9, 0)));
        assert!(range.contains(&Version::new(1, 0, 3)));
        assert!(!range.contains(&Version::new(1, 1, 0)));
        assert_eq!(range, Range::strictly_lower_than(Version::new(1, 1, 0)));

        // semver itself agrees
        assert!(req.matches(&Version::new(1, 0, 3)));
    }

    #[test]
    fn test_caret_and_tilde_ranges() {
        let caret = version_req_to_range(&"^0.2.3".parse().unwrap());
        assert!(caret.contains(&Version::new(0, 2, 9)));
        assert!(!caret.contains(&Version::new(0, 3, 0)));

        // partial carets widen like semver does
        for (text, inside, outside) in [
            ("^0.0", Version::new(0, 0, 5), Version::new(0, 1, 0)),
            ("^0", Version::new(0, 9, 1), Version::new(1, 0, 0)),
            ("^0.0.3", Version::new(0, 0, 3), Version::new(0, 0, 4)),
            ("^1.2", Version::new(1, 9, 0), Version::new(2, 0, 0)),
        ] {
            let req: VersionReq = text.parse().unwrap();
            let range = version_req_to_range(&req);
            assert!(range.contains(&inside), "{} should contain {}", text, inside);
            assert!(req.matches(&inside));
            assert!(!range.contains(&outside), "{} should not contain {}", text, outside);
            assert!(!req.matches(&outside));
        }

        let tilde = version_req_to_range(&"~1.2.3".parse().unwrap());
        assert!(tilde.contains(&Version::new(1, 2, 9)));
        assert!(!tilde.contains(&Version::new(1, 3, 0)));
    }

    #[test]
    fn test_exclusive_upper() {
        let upper = |s: &str| exclusive_upper(&s.parse().unwrap());

        assert_eq!(upper(">=1.1, <1.3"), Some(Version::new(1, 3, 0)));
        assert_eq!(upper("<=1.0"), Some(Version::new(1, 1, 0)));
        assert_eq!(upper("<=1.0.4"), Some(Version::new(1, 0, 5)));
        assert_eq!(upper(">=1.17"), None);
    }
}
