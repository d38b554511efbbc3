//! Core data structures for gotargets.
//!
//! - Platforms and per-release platform sets
//! - The release registry mapping version constraints to platform sets

pub mod platform;
pub mod registry;

pub use platform::{Platform, PlatformParseError, PlatformSet};
pub use registry::{Registry, RegistryError, Release};
