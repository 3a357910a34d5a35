//! Declarative column rule specifications
//!
//! Sheet schemas describe each column's rule with a [`RuleSpec`]; the
//! compiler turns it into a concrete descriptor against current table
//! contents.

use sheetmeta_core::discriminators::{ConceptType, MaterialType, PackageScoped, RegistrationType};
use sheetmeta_core::types::{ResolutionContext, SheetKind};
use sheetmeta_core::validation::ValidationRuleDescriptor;
use strum::IntoEnumIterator;

/// How a column's validation rule is obtained
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// Rule independent of table contents
    Fixed(ValidationRuleDescriptor),
    /// Inline list of closed-domain values, filtered by the context
    Choices(fn(&ResolutionContext) -> Vec<String>),
    /// Dropdown reading a column of another sheet directly
    Range {
        sheet: SheetKind,
        column: &'static str,
    },
    /// Dropdown computed from other sheets' rows
    Query(OptionQuery),
}

/// Foreign-key option list queries
#[derive(Debug, Clone, PartialEq)]
pub enum OptionQuery {
    /// Rows of `sheet` where `filter_column` equals (or differs from)
    /// `filter_value`
    Where {
        sheet: SheetKind,
        filter_column: &'static str,
        filter_value: String,
        source_columns: &'static [&'static str],
        equals: bool,
    },
    /// Every row of `sheet`
    Distinct {
        sheet: SheetKind,
        source_columns: &'static [&'static str],
    },
    /// Lot numbers from the material sheet
    Lots {
        /// Material subtype the lot's catalog item must have
        subtype: Option<MaterialType>,
        /// Registration types offered
        allowed: &'static [RegistrationType],
        /// Only lots carrying the configured in-house prefix
        internal_only: bool,
    },
}

/// Every registration type
pub const ANY_LOT: &[RegistrationType] = &[
    RegistrationType::Orphan,
    RegistrationType::Derived,
    RegistrationType::Composed,
    RegistrationType::External,
];

impl RuleSpec {
    pub const fn text(max_len: usize) -> Self {
        Self::Fixed(ValidationRuleDescriptor::text(max_len))
    }

    pub const fn fixed(descriptor: ValidationRuleDescriptor) -> Self {
        Self::Fixed(descriptor)
    }

    /// Ids of concept rows of one concept type
    pub fn concept_ids(concept_type: ConceptType) -> Self {
        Self::concept_columns(concept_type, &["concept_id"])
    }

    /// Columns of the concept rows of one type
    pub fn concept_columns(concept_type: ConceptType, source_columns: &'static [&'static str]) -> Self {
        Self::Query(OptionQuery::Where {
            sheet: SheetKind::Concept,
            filter_column: "concept_type",
            filter_value: concept_type.as_ref().to_string(),
            source_columns,
            equals: true,
        })
    }

    /// Every value of a column on another sheet
    pub const fn distinct(sheet: SheetKind, source_columns: &'static [&'static str]) -> Self {
        Self::Query(OptionQuery::Distinct {
            sheet,
            source_columns,
        })
    }

    /// Lot number picker
    pub const fn lots(
        subtype: Option<MaterialType>,
        allowed: &'static [RegistrationType],
        internal_only: bool,
    ) -> Self {
        Self::Query(OptionQuery::Lots {
            subtype,
            allowed,
            internal_only,
        })
    }
}

/// Values of a package-scoped domain offered under `context`
pub fn scoped_choices<E>(context: &ResolutionContext) -> Vec<String>
where
    E: IntoEnumIterator + PackageScoped + AsRef<str> + Copy,
{
    E::iter()
        .filter(|value| context.packages.contains(value.package()))
        .map(|value| value.as_ref().to_string())
        .collect()
}

/// Every value of a closed domain
pub fn all_choices<E>(_context: &ResolutionContext) -> Vec<String>
where
    E: IntoEnumIterator + AsRef<str>,
{
    E::iter().map(|value| value.as_ref().to_string()).collect()
}

/// Registration types chosen on in-house lots
pub fn inhouse_registration_choices(_context: &ResolutionContext) -> Vec<String> {
    RegistrationType::inhouse()
        .map(|value| value.as_ref().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetmeta_core::discriminators::Flag;
    use sheetmeta_core::types::{ActivePackages, Package};

    #[test]
    fn test_scoped_choices_follow_packages() {
        let core = ResolutionContext::default();
        let options = scoped_choices::<MaterialType>(&core);
        assert!(options.contains(&"chemical".to_string()));
        assert!(!options.contains(&"organism".to_string()));

        let organisms = ResolutionContext::new(ActivePackages::core(), None)
            .with_package(Package::OrganismItems);
        let options = scoped_choices::<MaterialType>(&organisms);
        assert!(options.contains(&"organism".to_string()));
        assert!(!options.contains(&"biospecimen".to_string()));
    }

    #[test]
    fn test_flag_and_registration_choices() {
        let ctx = ResolutionContext::default();
        assert_eq!(all_choices::<Flag>(&ctx), vec!["TRUE", "FALSE"]);
        assert_eq!(
            inhouse_registration_choices(&ctx),
            vec!["orphan", "derived", "composed"]
        );
    }
}
