//! Commonly used service types

pub use crate::minitable::{MiniTableGroup, MiniTableOutcome, MiniTableTracker};
pub use crate::options::{LotFilter, OptionListResolver, SelectOptions};
pub use crate::registry::{EntityObjectRegistry, Fragment, RegistryCache};
pub use crate::rules::ValidationRuleCompiler;
pub use crate::service::{CellEdit, EditOutcome, SheetMetaService};
pub use crate::sheets::{SheetSchema, schema};
pub use crate::snapshot::TableSnapshot;
pub use crate::visibility::{RowContext, VisibilityChange, VisibilityResolver};
pub use sheetmeta_core::prelude::*;
