//! # `SheetMeta` Service
//!
//! Entity/attribute schema resolution for metadata entry on a spreadsheet
//! host.
//!
//! ## Overview
//!
//! Users register concepts, material lots, processes, workflows and process
//! executions in a fixed set of sheets. For every row this crate decides:
//!
//! - **Visibility**: which attribute columns apply, driven by chained
//!   discriminator columns such as `concept_type` → `material_type`
//! - **Requirements**: whether an attribute is required and whether it
//!   accepts several values (mini-tables)
//! - **Validation**: which rule governs a column's values, including
//!   foreign-key dropdowns computed from other sheets
//! - **Mini-tables**: group ids and header flags for multi-valued
//!   attributes spread over consecutive rows
//!
//! ## Quick Start
//!
//! ```rust
//! use sheetmeta_core::prelude::*;
//! use sheetmeta_service::registry::EntityObjectRegistry;
//! use sheetmeta_service::visibility::VisibilityResolver;
//!
//! # fn main() -> sheetmeta_core::Result<()> {
//! let ctx = ResolutionContext::default();
//! let registry = EntityObjectRegistry::build(&ctx)?;
//! let resolver = VisibilityResolver::new(&registry);
//!
//! let change = resolver.compute_visibility(SheetKind::Concept, "concept_type", "person", None);
//! assert!(change.to_show.contains("email"));
//! assert!(change.to_hide_candidates.contains("cas_number"));
//! # Ok(())
//! # }
//! ```
//!
//! The [`service::SheetMetaService`] facade ties the pieces together for a
//! host that implements [`sheetmeta_core::Host`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

/// Entity object registry and attribute fragment composition
pub mod registry;

/// Per-sheet discriminators, entity registrations and column rules
pub mod sheets;

/// Discriminator chain walk and show/hide computation
pub mod visibility;

/// Dependent dropdown option lists
pub mod options;

/// Column to validation rule compilation
pub mod rules;

/// Mini-table group bookkeeping
pub mod minitable;

/// Multi-sheet table snapshots
pub mod snapshot;

/// Edit handling facade
pub mod service;

/// Configuration loading
pub mod config;

/// Command line interface
pub mod cli;

/// Prelude module for convenient imports
pub mod prelude;

pub use registry::{EntityObjectRegistry, RegistryCache};
pub use service::{CellEdit, EditOutcome, SheetMetaService};
pub use sheetmeta_core::{Result, SheetMetaError};
