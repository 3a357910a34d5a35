//! Entity object registry
//!
//! Maps `(sheet, discriminator column, discriminator value)` to the composed
//! attribute sets registered by every active package. The registry is built
//! once per resolution context and is immutable afterwards.

pub mod cache;
pub mod compose;
pub mod fragments;

use indexmap::IndexMap;
use sheetmeta_core::discriminators::PackageScoped;
use sheetmeta_core::error::{Result, SheetMetaError};
use sheetmeta_core::types::{EntityObject, Package, ResolutionContext, SheetKind};
use tracing::{debug, trace};

pub use cache::RegistryCache;
pub use compose::{EntityKey, Fragment, compose_fragments};

use crate::sheets;

type RegistryKey = (SheetKind, String, String);

/// Composed entity objects of one resolution context
#[derive(Debug, Clone)]
pub struct EntityObjectRegistry {
    context: ResolutionContext,
    entries: IndexMap<RegistryKey, Vec<EntityObject>>,
}

impl EntityObjectRegistry {
    /// Build the registry for a resolution context
    ///
    /// Every sheet schema registers its entities; inactive packages are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid composition or duplicate key.
    pub fn build(context: &ResolutionContext) -> Result<Self> {
        let mut builder = RegistryBuilder::new(context);
        for kind in SheetKind::all() {
            let schema = sheets::schema(kind);
            schema.register(&mut builder.sheet(kind))?;
        }
        let registry = builder.finish();
        debug!(
            entities = registry.len(),
            packages = ?context.packages,
            provenance = ?context.provenance,
            "built entity object registry"
        );
        Ok(registry)
    }

    /// Context the registry was built for
    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// First registered match for a discriminator value
    pub fn resolve(&self, sheet: SheetKind, column: &str, value: &str) -> Option<&EntityObject> {
        self.resolve_matches(sheet, column, value).into_iter().next()
    }

    /// Matches of every active package, in registration order
    pub fn resolve_matches(&self, sheet: SheetKind, column: &str, value: &str) -> Vec<&EntityObject> {
        self.entries
            .get(&(sheet, column.to_string(), value.to_string()))
            .map(|objects| objects.iter().collect())
            .unwrap_or_default()
    }

    /// Resolve each element of a discriminator path and union the matches
    pub fn resolve_chain<C, V>(&self, sheet: SheetKind, path: &[(C, V)]) -> Vec<&EntityObject>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        path.iter()
            .flat_map(|(column, value)| self.resolve_matches(sheet, column.as_ref(), value.as_ref()))
            .collect()
    }

    /// Every entity of one sheet
    pub fn entities(&self, sheet: SheetKind) -> impl Iterator<Item = &EntityObject> {
        self.entries
            .iter()
            .filter(move |((kind, _, _), _)| *kind == sheet)
            .flat_map(|(_, objects)| objects.iter())
    }

    /// Number of entity objects
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations while a registry is built
#[derive(Debug)]
pub struct RegistryBuilder<'c> {
    context: &'c ResolutionContext,
    entries: IndexMap<RegistryKey, Vec<EntityObject>>,
}

impl<'c> RegistryBuilder<'c> {
    pub fn new(context: &'c ResolutionContext) -> Self {
        Self {
            context,
            entries: IndexMap::new(),
        }
    }

    /// Registration handle for one sheet
    pub fn sheet(&mut self, sheet: SheetKind) -> SheetRegistrar<'_, 'c> {
        SheetRegistrar {
            builder: self,
            sheet,
        }
    }

    pub fn finish(self) -> EntityObjectRegistry {
        EntityObjectRegistry {
            context: self.context.clone(),
            entries: self.entries,
        }
    }
}

/// Registers the entities of one sheet
#[derive(Debug)]
pub struct SheetRegistrar<'b, 'c> {
    builder: &'b mut RegistryBuilder<'c>,
    sheet: SheetKind,
}

impl SheetRegistrar<'_, '_> {
    /// Resolution context being built
    pub fn context(&self) -> &ResolutionContext {
        self.builder.context
    }

    /// Register an entity of `package`; ignored when the package is inactive
    ///
    /// # Errors
    ///
    /// Returns an error when composition fails or the key is already
    /// registered by the same package.
    pub fn entity(
        &mut self,
        package: Package,
        column: &str,
        value: &str,
        fragments: &[Fragment],
    ) -> Result<()> {
        if !self.builder.context.packages.contains(package) {
            trace!(sheet = %self.sheet.as_ref(), column, value, %package, "package inactive, skipping");
            return Ok(());
        }

        let object = compose_fragments(
            EntityKey {
                sheet: self.sheet,
                package,
                column,
                value,
            },
            fragments,
        )?;

        let slot = self
            .builder
            .entries
            .entry((self.sheet, column.to_string(), value.to_string()))
            .or_default();
        if slot.iter().any(|existing| existing.package == package) {
            return Err(SheetMetaError::DuplicateEntity {
                sheet: self.sheet.sheet_name().to_string(),
                column: column.to_string(),
                value: value.to_string(),
            });
        }
        slot.push(object);
        Ok(())
    }

    /// Register a core entity
    pub fn core(&mut self, column: &str, value: impl AsRef<str>, fragments: &[Fragment]) -> Result<()> {
        self.entity(Package::Core, column, value.as_ref(), fragments)
    }

    /// Register an entity under the package that owns the discriminator value
    pub fn scoped<V>(&mut self, column: &str, value: V, fragments: &[Fragment]) -> Result<()>
    where
        V: PackageScoped + AsRef<str> + Copy,
    {
        self.entity(value.package(), column, value.as_ref(), fragments)
    }
}
