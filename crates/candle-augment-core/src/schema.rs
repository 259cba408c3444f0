use crate::config::AugmentConfig;
use crate::model::{DerivedColumn, HeaderIndex};

pub const OPEN_COLUMN: &str = "open";
pub const CLOSE_COLUMN: &str = "close";
pub const LOW_COLUMN: &str = "low";
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const PCT_CHANGE_PREV_CLOSE_COLUMN: &str = "pct_change_prev_close";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputColumn {
    /// Copied from the input column of the same name.
    Passthrough(String),
    Derived(DerivedColumn),
}

impl OutputColumn {
    pub fn name(&self) -> &str {
        match self {
            OutputColumn::Passthrough(name) => name,
            OutputColumn::Derived(column) => column.canonical_name(),
        }
    }
}

/// Output field list, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<OutputColumn>,
}

impl OutputSchema {
    /// Input columns minus the derived ones (and `timestamp` when it is being
    /// replaced), followed by `percentage`, `lower_wick_pct` and, when enabled,
    /// `time_utc`.
    pub fn build(header: &HeaderIndex, config: &AugmentConfig) -> Self {
        let mut columns: Vec<OutputColumn> = header
            .names()
            .iter()
            .filter(|name| DerivedColumn::from_name(name).is_none())
            .filter(|name| !(config.replace_timestamp && name.as_str() == TIMESTAMP_COLUMN))
            .map(|name| OutputColumn::Passthrough(name.clone()))
            .collect();

        columns.push(OutputColumn::Derived(DerivedColumn::Percentage));
        columns.push(OutputColumn::Derived(DerivedColumn::LowerWickPct));
        if config.add_time_utc {
            columns.push(OutputColumn::Derived(DerivedColumn::TimeUtc));
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(OutputColumn::name).collect()
    }
}
