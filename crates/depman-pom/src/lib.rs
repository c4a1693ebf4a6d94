//! POM/BOM descriptor handling for depman.
//!
//! Turns an already-fetched POM document into a [`depman_core::bom::BomDescriptor`]:
//! dependency-management entries, exclusions, `${property}` interpolation,
//! and `scope=import, type=pom` entries split out as nested BOM references.
//! Also provides [`loader::DescriptorSet`], an in-memory loader over
//! pre-parsed descriptors.

pub mod loader;
pub mod pom;
