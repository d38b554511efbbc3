//! gotargets - supported Go cross-compilation targets per Go release
//!
//! This crate maps a Go toolchain version string such as `go1.16.5` to the
//! OS/arch pairs that release can cross-compile to. The table is static and
//! built once; resolution is a pure lookup that falls back to the newest
//! release for anything it does not recognize.

pub mod core;
pub mod resolver;
pub mod util;

pub use crate::core::{Platform, PlatformSet, Registry, Release};
pub use resolver::{resolve_platforms, Resolver};
