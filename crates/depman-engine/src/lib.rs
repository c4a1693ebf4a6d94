//! Management resolution engine: Maven-style dependency management layered
//! on top of a host build tool's own resolver.
//!
//! Declarations flow in one direction: the configuration surface fills a
//! [`store::DeclarationStore`] (direct versions, direct exclusions, BOM
//! imports), the [`importer`] expands imported BOMs recursively, and
//! [`snapshot::ManagementSnapshot::build`] merges everything into a frozen,
//! concurrently-queryable mapping that answers, per coordinate: what version
//! is managed, which exclusions apply, and whether an explicit version on
//! the dependency itself wins.

pub mod exclusion;
pub mod importer;
pub mod precedence;
pub mod snapshot;
pub mod store;
