//! toolchain
//!
//! Capability interfaces for the external tools a measurement drives.
//!
//! # Architecture
//!
//! The engine never runs a program directly. It talks to three narrow
//! traits, each with one production adapter:
//!
//! | Capability  | Adapter                   | Tool          |
//! |-------------|---------------------------|---------------|
//! | [`Vcs`]       | [`crate::git::GitVcs`]    | libgit2       |
//! | [`BuildTool`] | [`Cargo`]                 | `cargo`       |
//! | [`Stripper`]  | [`Strip`]                 | `strip`       |
//!
//! # Modules
//!
//! - `traits`: The capability traits, [`Toolchain`] and [`ToolError`]
//! - `cargo`: Cargo adapter and `cargo metadata` parsing
//! - `strip`: Strip adapter
//! - [`mock`]: In-memory fake for deterministic testing

mod cargo;
pub mod mock;
mod process;
mod strip;
mod traits;

pub use cargo::{Cargo, CargoMetadata, Package, Target};
pub use strip::Strip;
pub use traits::*;
