//! # `SheetMeta` Core
//!
//! Core types and traits for schema-driven metadata entry on a spreadsheet
//! host.
//!
//! This crate provides the data model shared by the resolution engines:
//! attribute requirements and composed entity objects, table snapshots,
//! validation rule descriptors, configuration and the host interfaces.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // Documentation is covered by module-level docs

/// Core error types
pub mod error;

/// Entity, attribute and context types
pub mod types;

/// Closed discriminator value domains
pub mod discriminators;

/// In-memory table snapshots
pub mod table;

/// Validation rule descriptors
pub mod validation;

/// Configuration types
pub mod config;

/// Host collaborator traits
pub mod traits;

// Re-export commonly used types
pub use config::SheetMetaConfig;
pub use error::{Result, SheetMetaError};
pub use table::{Row, Table};
pub use traits::{CellSink, Host, TableSource, ValidationSink, VisibilitySink};
pub use types::{
    ActivePackages, AttributeMap, AttributeRequirement, EntityObject, Package, ProvenanceType,
    ResolutionContext, SheetKind,
};
pub use validation::ValidationRuleDescriptor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::discriminators::*;
    pub use crate::error::{Result, SheetMetaError};
    pub use crate::table::*;
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use crate::validation::*;
}
