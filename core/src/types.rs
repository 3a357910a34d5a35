//! Core type definitions for entity/attribute schemas

use crate::error::{Result, SheetMetaError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed set of tables the tool manages
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SheetKind {
    /// Concept definitions (people, organizations, material kinds, ...)
    #[strum(to_string = "Concept definitions", serialize = "concept")]
    Concept,
    /// Material lot registrations
    #[strum(to_string = "Material definitions", serialize = "material")]
    Material,
    /// Process definitions
    #[strum(to_string = "Process definitions", serialize = "process")]
    Process,
    /// Workflow definitions
    #[strum(to_string = "Workflow definitions", serialize = "workflow")]
    Workflow,
    /// Process and workflow executions
    #[strum(to_string = "Process executions", serialize = "execution")]
    Execution,
}

impl SheetKind {
    /// Name of the host sheet backing this kind
    #[must_use]
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Concept => "Concept definitions",
            Self::Material => "Material definitions",
            Self::Process => "Process definitions",
            Self::Workflow => "Workflow definitions",
            Self::Execution => "Process executions",
        }
    }

    /// Resolve a host sheet name or short name into a kind
    pub fn from_name(name: &str) -> Result<Self> {
        name.trim()
            .parse()
            .map_err(|_| SheetMetaError::UnknownSheet(name.to_string()))
    }

    /// All sheet kinds in provisioning order
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Configuration packages that extend the core registry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum Package {
    /// Always active
    #[serde(rename = "core")]
    #[strum(serialize = "core")]
    Core,
    /// Organisms, strains and cell lines
    #[serde(rename = "organism items")]
    #[strum(serialize = "organism items")]
    OrganismItems,
    /// Clinical trial and biospecimen items
    #[serde(rename = "CIDC")]
    #[strum(serialize = "CIDC")]
    Cidc,
}

/// How material lineage is tracked
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProvenanceType {
    /// Step-by-step lineage through process executions
    Activity,
    /// Free-text lineage summary per lot
    Summary,
}

/// Set of active packages; `core` is always a member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActivePackages(BTreeSet<Package>);

impl ActivePackages {
    /// Only the core package
    #[must_use]
    pub fn core() -> Self {
        Self(BTreeSet::from([Package::Core]))
    }

    /// Every known package
    #[must_use]
    pub fn all() -> Self {
        Self(Package::iter().collect())
    }

    /// Build from packages, adding `core`
    pub fn new(packages: impl IntoIterator<Item = Package>) -> Self {
        let mut set: BTreeSet<Package> = packages.into_iter().collect();
        set.insert(Package::Core);
        Self(set)
    }

    /// Parse host package names such as `"organism items"` or `"CIDC"`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut packages = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let package = name
                .parse::<Package>()
                .map_err(|_| SheetMetaError::UnknownPackage(name.to_string()))?;
            packages.push(package);
        }
        Ok(Self::new(packages))
    }

    /// Whether a package is active
    #[must_use]
    pub fn contains(&self, package: Package) -> bool {
        self.0.contains(&package)
    }

    /// Active packages, `core` first
    pub fn iter(&self) -> impl Iterator<Item = Package> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ActivePackages {
    fn default() -> Self {
        Self::core()
    }
}

/// Read-only configuration inputs for one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ResolutionContext {
    /// Active configuration packages
    pub packages: ActivePackages,
    /// Provenance tracking mode, if configured
    pub provenance: Option<ProvenanceType>,
}

impl ResolutionContext {
    /// Create a context
    #[must_use]
    pub fn new(packages: ActivePackages, provenance: Option<ProvenanceType>) -> Self {
        Self {
            packages,
            provenance,
        }
    }

    /// Set the provenance mode
    #[must_use]
    pub fn with_provenance(mut self, provenance: ProvenanceType) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Add a package
    #[must_use]
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.0.insert(package);
        self
    }
}

/// Requirement metadata for one attribute of an entity
///
/// A same-row dependency implies multiple values, so the only way to set
/// `depends_on_column_name` is [`AttributeRequirement::multi_depending_on`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeRequirement {
    is_required: bool,
    supports_multiple_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    depends_on_column_name: Option<String>,
}

impl AttributeRequirement {
    /// Single-valued attribute
    #[must_use]
    pub const fn single(is_required: bool) -> Self {
        Self {
            is_required,
            supports_multiple_values: false,
            depends_on_column_name: None,
        }
    }

    /// Multi-valued attribute
    #[must_use]
    pub const fn multi(is_required: bool) -> Self {
        Self {
            is_required,
            supports_multiple_values: true,
            depends_on_column_name: None,
        }
    }

    /// Multi-valued attribute filled row by row together with `column`
    #[must_use]
    pub fn multi_depending_on(is_required: bool, column: impl Into<String>) -> Self {
        Self {
            is_required,
            supports_multiple_values: true,
            depends_on_column_name: Some(column.into()),
        }
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    #[must_use]
    pub const fn supports_multiple_values(&self) -> bool {
        self.supports_multiple_values
    }

    #[must_use]
    pub fn depends_on_column_name(&self) -> Option<&str> {
        self.depends_on_column_name.as_deref()
    }
}

impl fmt::Display for AttributeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_required { "required" } else { "optional" })?;
        if self.supports_multiple_values {
            f.write_str(", multivalued")?;
        }
        if let Some(column) = &self.depends_on_column_name {
            write!(f, ", with {column}")?;
        }
        Ok(())
    }
}

/// Ordered attribute name → requirement map
pub type AttributeMap = IndexMap<String, AttributeRequirement>;

/// Fully composed attribute set selected by one discriminator value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityObject {
    /// Sheet the entity belongs to
    pub sheet: SheetKind,
    /// Package that registered the entity
    pub package: Package,
    /// Column holding the discriminator
    pub discriminator_column_name: String,
    /// Value selecting this entity
    pub discriminator_value: String,
    /// Composed attributes, in fragment order
    pub attributes: AttributeMap,
}

impl EntityObject {
    /// Attribute names in composition order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Requirement for one attribute
    #[must_use]
    pub fn requirement(&self, attribute: &str) -> Option<&AttributeRequirement> {
        self.attributes.get(attribute)
    }

    /// Whether the entity carries an attribute
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Human-readable registry key
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}/{}={}",
            self.sheet.as_ref(),
            self.discriminator_column_name,
            self.discriminator_value
        )
    }
}
