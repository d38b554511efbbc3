//! Version parsing errors.
//!
//! None of these ever reach callers of `resolve_platforms`: every failure
//! degrades to the latest platform set. They are exposed for callers that
//! want to report why a version string was not recognized.

use miette::Diagnostic;
use thiserror::Error;

/// Error turning a toolchain version string into a semver version.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum VersionError {
    #[error("unrecognized toolchain version `{version}`: expected a `go` prefix")]
    #[diagnostic(
        code(gotargets::version::prefix),
        help("Go versions look like `go1.16` or `go1.17.3`")
    )]
    MissingPrefix { version: String },

    #[error("malformed go version `{version}`: {reason}")]
    #[diagnostic(code(gotargets::version::malformed))]
    Malformed { version: String, reason: String },
}

impl VersionError {
    /// Build a `Malformed` error.
    pub fn malformed(version: &str, reason: impl Into<String>) -> Self {
        VersionError::Malformed {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}
