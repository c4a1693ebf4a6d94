//! Core data types for the depman dependency-management engine.
//!
//! This crate defines the types shared by the management engine and its
//! collaborators: module coordinates, BOM references and descriptors,
//! managed dependency entries, policy flags, and the declarative TOML
//! configuration a host build file embeds.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod bom;
pub mod config;
pub mod coordinate;
pub mod errors;
pub mod policy;
