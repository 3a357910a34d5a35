//! Configuration types for `SheetMeta` services

use crate::error::{Result, SheetMetaError};
use crate::types::{ActivePackages, ProvenanceType, ResolutionContext};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetMetaConfig {
    /// Packages and provenance mode
    pub resolution: ResolutionConfig,

    /// Sheet layout limits
    pub sheets: SheetLayoutConfig,

    /// Dropdown option list behavior
    pub options: OptionListConfig,
}

impl SheetMetaConfig {
    /// Resolution context described by this configuration
    pub fn context(&self) -> Result<ResolutionContext> {
        self.resolution.context()
    }

    /// Check value ranges and package names
    pub fn validate(&self) -> Result<()> {
        self.resolution.context()?;
        if self.sheets.max_rows == 0 {
            return Err(SheetMetaError::config("sheets.max_rows must be at least 1"));
        }
        if self.sheets.data_start_row < 2 {
            return Err(SheetMetaError::config(
                "sheets.data_start_row must be below the header row (>= 2)",
            ));
        }
        if let Some(prefix) = &self.options.internal_lot_prefix
            && prefix.trim().is_empty()
        {
            return Err(SheetMetaError::config(
                "options.internal_lot_prefix must not be blank when set",
            ));
        }
        Ok(())
    }
}

/// Configuration flags the host normally keeps in its property storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Active package names (`core`, `organism items`, `CIDC`)
    pub packages: Vec<String>,

    /// Provenance tracking mode
    pub provenance: Option<ProvenanceType>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            packages: vec!["core".to_string()],
            provenance: None,
        }
    }
}

impl ResolutionConfig {
    /// Parse into a resolution context
    pub fn context(&self) -> Result<ResolutionContext> {
        let packages = ActivePackages::from_names(&self.packages)?;
        Ok(ResolutionContext::new(packages, self.provenance))
    }
}

/// Sheet layout limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayoutConfig {
    /// Working rows per sheet
    pub max_rows: usize,

    /// First data row (one-based, below the header)
    pub data_start_row: u32,
}

impl Default for SheetLayoutConfig {
    fn default() -> Self {
        Self {
            max_rows: 50,
            data_start_row: 2,
        }
    }
}

/// Dropdown option list behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionListConfig {
    /// Prefix of lot numbers assigned in house; output lot pickers only
    /// offer matching lots when set
    pub internal_lot_prefix: Option<String>,
}
