//! Closed value domains of the discriminator columns
//!
//! The string form of each variant is exactly what the host sheet stores in
//! the discriminator cell and what dropdowns offer.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::types::Package;

/// Values of `concept_type`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum ConceptType {
    #[strum(serialize = "person")]
    Person,
    #[strum(serialize = "organization")]
    Organization,
    #[strum(serialize = "material")]
    Material,
    #[strum(serialize = "instrument")]
    Instrument,
    #[strum(serialize = "software")]
    Software,
    #[strum(serialize = "property")]
    Property,
    #[strum(serialize = "unit")]
    Unit,
    #[strum(serialize = "clinical trial")]
    ClinicalTrial,
}

/// Values of `material_type`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum MaterialType {
    #[strum(serialize = "chemical")]
    Chemical,
    #[strum(serialize = "culture medium")]
    CultureMedium,
    #[strum(serialize = "buffer")]
    Buffer,
    #[strum(serialize = "consumable")]
    Consumable,
    #[strum(serialize = "organism")]
    Organism,
    #[strum(serialize = "cell line")]
    CellLine,
    #[strum(serialize = "biospecimen")]
    Biospecimen,
}

/// Values of `action` on the material sheet
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum MaterialAction {
    #[strum(serialize = "Register internally generated material")]
    RegisterInternal,
    #[strum(serialize = "Register externally sourced material")]
    RegisterExternal,
}

/// How a lot came to exist
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegistrationType {
    /// Generated in house without recorded parents
    Orphan,
    /// Generated in house from parent lots
    Derived,
    /// Generated in house by combining component lots
    Composed,
    /// Bought from a supplier
    External,
}

impl RegistrationType {
    /// Types registered through `inhouse_material_registration_type`
    pub fn inhouse() -> impl Iterator<Item = Self> {
        Self::iter().filter(|t| *t != Self::External)
    }

    /// Derived and composed lots carry lineage
    #[must_use]
    pub const fn has_lineage(self) -> bool {
        matches!(self, Self::Derived | Self::Composed)
    }
}

/// Values of `process_type`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum ProcessType {
    #[strum(serialize = "measurement")]
    Measurement,
    #[strum(serialize = "transformation")]
    Transformation,
    #[strum(serialize = "incubation")]
    Incubation,
    #[strum(serialize = "mixing")]
    Mixing,
    #[strum(serialize = "cultivation")]
    Cultivation,
}

/// Values of `step_type` on the workflow sheet
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum StepType {
    #[strum(serialize = "process")]
    Process,
    #[strum(serialize = "sub-workflow")]
    SubWorkflow,
    #[strum(serialize = "decision")]
    Decision,
}

/// Values of `parameter_source` on the workflow sheet
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum ParameterSource {
    #[strum(serialize = "fixed")]
    Fixed,
    #[strum(serialize = "from execution")]
    FromExecution,
}

/// Values of `execution_type`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum ExecutionType {
    #[strum(serialize = "process execution")]
    ProcessExecution,
    #[strum(serialize = "workflow execution")]
    WorkflowExecution,
    #[strum(serialize = "specimen collection")]
    SpecimenCollection,
}

/// Boolean switches stored as spreadsheet checkbox text
///
/// Parsing is exact, like registry lookups: only `TRUE` and `FALSE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum Flag {
    #[strum(serialize = "TRUE")]
    True,
    #[strum(serialize = "FALSE")]
    False,
}

/// Which package introduces a discriminator value
pub trait PackageScoped {
    /// Package that must be active for the value to be offered
    fn package(self) -> Package;
}

impl PackageScoped for ConceptType {
    fn package(self) -> Package {
        match self {
            Self::ClinicalTrial => Package::Cidc,
            _ => Package::Core,
        }
    }
}

impl PackageScoped for MaterialType {
    fn package(self) -> Package {
        match self {
            Self::Organism | Self::CellLine => Package::OrganismItems,
            Self::Biospecimen => Package::Cidc,
            _ => Package::Core,
        }
    }
}

impl PackageScoped for ProcessType {
    fn package(self) -> Package {
        match self {
            Self::Cultivation => Package::OrganismItems,
            _ => Package::Core,
        }
    }
}

impl PackageScoped for ExecutionType {
    fn package(self) -> Package {
        match self {
            Self::SpecimenCollection => Package::Cidc,
            _ => Package::Core,
        }
    }
}
