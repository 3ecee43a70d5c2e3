//! core
//!
//! Core domain types and configuration for revsize.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RevisionRef, Oid
//! - [`units`] - The reporting unit table
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
pub mod units;
