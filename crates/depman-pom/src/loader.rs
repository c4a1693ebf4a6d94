//! An in-memory `BomLoader` over pre-parsed descriptors.

use std::collections::HashMap;

use depman_core::bom::{BomDescriptor, BomLoader, BomReference};
use depman_core::errors::{DepmanError, DepmanResult};

use crate::pom::parse_bom;

/// A set of already-fetched, parsed BOM descriptors, keyed by reference.
///
/// This is the delivery boundary the engine assumes: whatever fetched the
/// documents (repository client, local cache, test fixture) parks them here
/// and hands the set to snapshot construction as the loader.
#[derive(Debug, Default)]
pub struct DescriptorSet {
    descriptors: HashMap<BomReference, BomDescriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parsed descriptor under its own reference.
    pub fn insert(&mut self, descriptor: BomDescriptor) {
        self.descriptors
            .insert(descriptor.reference.clone(), descriptor);
    }

    /// Parse a POM XML document and register the resulting descriptor.
    pub fn insert_xml(&mut self, xml: &str) -> DepmanResult<()> {
        let descriptor = parse_bom(xml)?.into_descriptor()?;
        tracing::debug!("Registered BOM descriptor {}", descriptor.reference);
        self.insert(descriptor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl BomLoader for DescriptorSet {
    fn load(&self, reference: &BomReference) -> DepmanResult<BomDescriptor> {
        self.descriptors.get(reference).cloned().ok_or_else(|| {
            miette::Report::from(DepmanError::UnresolvableBom {
                reference: reference.to_string(),
                message: "descriptor was never fetched".to_string(),
            })
        })
    }
}
