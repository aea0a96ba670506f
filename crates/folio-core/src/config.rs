//! Pipeline configuration overrides
//!
//! The compiled-in defaults match the documented upload schema; a TOML
//! file can override the categorizer rule order and any subset of the
//! column map without code changes:
//!
//! ```toml
//! [columns]
//! description = 2
//! proceeds_local = 11
//!
//! [[rules]]
//! pattern = "withholding"
//! category = "tax"
//!
//! [[rules]]
//! pattern = "dividend"
//! category = "dividend"
//! ```
//!
//! When a `[[rules]]` array is present it replaces the default table
//! wholesale — rule order is the precedence, so partial patching would
//! be ambiguous.

use std::path::Path;

use serde::Deserialize;

use crate::categorize::{Rule, RuleSet};
use crate::error::{Error, Result};
use crate::models::Category;
use crate::orchestrator::PipelineOptions;
use crate::transform::ColumnMap;

/// One configured categorizer rule
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub category: Category,
}

/// Partial column map: unset fields keep their defaults
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnOverrides {
    pub description: Option<usize>,
    pub date: Option<usize>,
    pub symbol: Option<usize>,
    pub quantity: Option<usize>,
    pub unit_price: Option<usize>,
    pub currency: Option<usize>,
    pub transaction_fee: Option<usize>,
    pub proceeds_foreign: Option<usize>,
    pub proceeds_local: Option<usize>,
}

impl ColumnOverrides {
    fn apply(&self, mut columns: ColumnMap) -> ColumnMap {
        if let Some(v) = self.description {
            columns.description = v;
        }
        if let Some(v) = self.date {
            columns.date = v;
        }
        if let Some(v) = self.symbol {
            columns.symbol = v;
        }
        if let Some(v) = self.quantity {
            columns.quantity = v;
        }
        if let Some(v) = self.unit_price {
            columns.unit_price = v;
        }
        if let Some(v) = self.currency {
            columns.currency = v;
        }
        if let Some(v) = self.transaction_fee {
            columns.transaction_fee = v;
        }
        if let Some(v) = self.proceeds_foreign {
            columns.proceeds_foreign = v;
        }
        if let Some(v) = self.proceeds_local {
            columns.proceeds_local = v;
        }
        columns
    }
}

/// Deserialized pipeline configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub columns: ColumnOverrides,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl PipelineConfig {
    /// Load a configuration file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.rules.iter().any(|r| r.pattern.trim().is_empty()) {
            return Err(Error::Config("rule pattern must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Resolve into pipeline options, defaulting anything unspecified
    pub fn into_options(self) -> PipelineOptions {
        let rules = if self.rules.is_empty() {
            RuleSet::default()
        } else {
            RuleSet::new(
                self.rules
                    .into_iter()
                    .map(|r| Rule::new(r.pattern, r.category))
                    .collect(),
            )
        };

        PipelineOptions {
            rules,
            columns: self.columns.apply(ColumnMap::default()),
        }
    }
}
