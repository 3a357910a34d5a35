//! Registry cache keyed by resolution context

use parking_lot::RwLock;
use sheetmeta_core::error::Result;
use sheetmeta_core::types::ResolutionContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::EntityObjectRegistry;

/// Memoizes one immutable registry per resolution context
#[derive(Debug, Default)]
pub struct RegistryCache {
    registries: RwLock<HashMap<ResolutionContext, Arc<EntityObjectRegistry>>>,
}

impl RegistryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached registry for `context`, built on first use
    ///
    /// # Errors
    ///
    /// Propagates registry build errors; failed builds are not cached.
    pub fn get_or_build(&self, context: &ResolutionContext) -> Result<Arc<EntityObjectRegistry>> {
        {
            let cache = self.registries.read();
            if let Some(registry) = cache.get(context) {
                return Ok(Arc::clone(registry));
            }
        }

        let registry = Arc::new(EntityObjectRegistry::build(context)?);
        let mut cache = self.registries.write();
        let cached = Arc::clone(
            cache
                .entry(context.clone())
                .or_insert_with(|| Arc::clone(&registry)),
        );
        debug!(cached = cache.len(), "registry cache updated");
        Ok(cached)
    }

    /// Number of cached registries
    pub fn len(&self) -> usize {
        self.registries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.read().is_empty()
    }

    /// Drop every cached registry
    pub fn clear(&self) {
        self.registries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmeta_core::types::ProvenanceType;

    #[test]
    fn test_registry_reused_per_context() -> Result<()> {
        let cache = RegistryCache::new();
        let ctx = ResolutionContext::default();
        let first = cache.get_or_build(&ctx)?;
        let second = cache.get_or_build(&ctx)?;
        assert!(Arc::ptr_eq(&first, &second));

        let summary = ctx.clone().with_provenance(ProvenanceType::Summary);
        let third = cache.get_or_build(&summary)?;
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }
}
