//! Attribute fragment composition
//!
//! An entity object is the ordered union of the attribute maps produced by
//! its fragments. Fragments may overlap only where they agree.

use sheetmeta_core::error::{Result, SheetMetaError};
use sheetmeta_core::types::{AttributeMap, AttributeRequirement, EntityObject, Package, SheetKind};
use std::fmt;

/// A named, reusable producer of a partial attribute map
#[derive(Clone, Copy)]
pub struct Fragment {
    name: &'static str,
    build: fn() -> AttributeMap,
}

impl Fragment {
    /// Create a fragment from its builder function
    pub const fn new(name: &'static str, build: fn() -> AttributeMap) -> Self {
        Self { name, build }
    }

    /// Fragment name, used in composition errors
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the fragment's attributes
    pub fn attributes(&self) -> AttributeMap {
        (self.build)()
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fragment").field(&self.name).finish()
    }
}

/// Build an attribute map from literal entries
pub fn attributes<const N: usize>(entries: [(&str, AttributeRequirement); N]) -> AttributeMap {
    entries
        .into_iter()
        .map(|(name, requirement)| (name.to_string(), requirement))
        .collect()
}

/// Target of a composition, used to name the entity in errors
#[derive(Debug, Clone, Copy)]
pub struct EntityKey<'a> {
    pub sheet: SheetKind,
    pub package: Package,
    pub column: &'a str,
    pub value: &'a str,
}

impl fmt::Display for EntityKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}={} ({})",
            self.sheet.as_ref(),
            self.column,
            self.value,
            self.package
        )
    }
}

/// Compose an entity object from fragments
///
/// # Errors
///
/// Returns [`SheetMetaError::InvalidComposition`] when two fragments define
/// the same attribute with different requirements, when a dependency points
/// at an attribute that is absent or single-valued, or when the composed
/// attribute set is empty.
pub fn compose_fragments(key: EntityKey<'_>, fragments: &[Fragment]) -> Result<EntityObject> {
    let mut composed = AttributeMap::new();

    for fragment in fragments {
        for (name, requirement) in fragment.attributes() {
            match composed.get(&name) {
                Some(existing) if *existing == requirement => {}
                Some(existing) => {
                    return Err(SheetMetaError::invalid_composition(
                        key.to_string(),
                        name,
                        format!(
                            "fragment '{}' defines it as {requirement}, already composed as {existing}",
                            fragment.name()
                        ),
                    ));
                }
                None => {
                    composed.insert(name, requirement);
                }
            }
        }
    }

    if composed.is_empty() {
        return Err(SheetMetaError::invalid_composition(
            key.to_string(),
            "",
            "entity has no attributes",
        ));
    }

    for (name, requirement) in &composed {
        let Some(target) = requirement.depends_on_column_name() else {
            continue;
        };
        match composed.get(target) {
            Some(target_req) if target_req.supports_multiple_values() => {}
            Some(_) => {
                return Err(SheetMetaError::invalid_composition(
                    key.to_string(),
                    name.clone(),
                    format!("depends on single-valued attribute '{target}'"),
                ));
            }
            None => {
                return Err(SheetMetaError::invalid_composition(
                    key.to_string(),
                    name.clone(),
                    format!("depends on missing attribute '{target}'"),
                ));
            }
        }
    }

    Ok(EntityObject {
        sheet: key.sheet,
        package: key.package,
        discriminator_column_name: key.column.to_string(),
        discriminator_value: key.value.to_string(),
        attributes: composed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key() -> EntityKey<'static> {
        EntityKey {
            sheet: SheetKind::Concept,
            package: Package::Core,
            column: "concept_type",
            value: "person",
        }
    }

    fn contact() -> AttributeMap {
        attributes([
            ("email", AttributeRequirement::single(true)),
            ("phone", AttributeRequirement::single(false)),
        ])
    }

    fn contact_again() -> AttributeMap {
        attributes([
            ("phone", AttributeRequirement::single(false)),
            ("orcid", AttributeRequirement::single(false)),
        ])
    }

    fn conflicting_phone() -> AttributeMap {
        attributes([("phone", AttributeRequirement::multi(false))])
    }

    fn dangling() -> AttributeMap {
        attributes([(
            "component_cas",
            AttributeRequirement::multi_depending_on(false, "component_common_name"),
        )])
    }

    fn empty() -> AttributeMap {
        AttributeMap::new()
    }

    #[test]
    fn test_union_keeps_fragment_order() -> Result<()> {
        let entity = compose_fragments(
            key(),
            &[
                Fragment::new("contact", contact),
                Fragment::new("contact_again", contact_again),
            ],
        )?;
        let names: Vec<_> = entity.attribute_names().collect();
        assert_eq!(names, vec!["email", "phone", "orcid"]);
        assert_eq!(entity.discriminator_value, "person");
        Ok(())
    }

    #[test]
    fn test_conflicting_requirements_rejected() {
        let result = compose_fragments(
            key(),
            &[
                Fragment::new("contact", contact),
                Fragment::new("conflicting_phone", conflicting_phone),
            ],
        );
        match result {
            Err(SheetMetaError::InvalidComposition { attribute, .. }) => {
                assert_eq!(attribute, "phone");
            }
            other => panic!("expected composition error, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_dependency_rejected() {
        let result = compose_fragments(key(), &[Fragment::new("dangling", dangling)]);
        assert!(matches!(
            result,
            Err(SheetMetaError::InvalidComposition { .. })
        ));
    }

    #[test]
    fn test_empty_entity_rejected() {
        let result = compose_fragments(key(), &[Fragment::new("empty", empty)]);
        assert!(result.is_err());
    }
}
