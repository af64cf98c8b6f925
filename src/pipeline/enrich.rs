//! Enrichment seam between the two validation phases.

use crate::product::Product;

/// Adds derived fields (computed labels, changelog links, ...) to a product.
///
/// Runs after authored fields are validated and before URLs are checked, so
/// generated URLs go through the reachability checks too.
pub trait Enrich: Sync {
    fn enrich(&self, product: &mut Product);
}

/// Leaves products as authored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl Enrich for NoEnrichment {
    fn enrich(&self, _product: &mut Product) {}
}
