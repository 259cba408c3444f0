use std::collections::HashMap;

use csv::StringRecord;

/// Name to position lookup for the input header, built once per run.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(header: &StringRecord) -> Self {
        let names: Vec<String> = header.iter().map(str::to_string).collect();
        // Later duplicates overwrite earlier ones, so the last column of a name wins.
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One candle as read from the input. Lookups never fail: a column the
/// header lacks, or a short record, reads as the empty string.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    header: &'a HeaderIndex,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub fn new(header: &'a HeaderIndex, record: &'a StringRecord) -> Self {
        Self { header, record }
    }

    pub fn get(&self, name: &str) -> &'a str {
        self.header
            .position(name)
            .and_then(|idx| self.record.get(idx))
            .unwrap_or("")
    }
}

/// Columns the tool always computes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedColumn {
    Percentage,
    LowerWickPct,
    TimeUtc,
}

impl DerivedColumn {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DerivedColumn::Percentage => "percentage",
            DerivedColumn::LowerWickPct => "lower_wick_pct",
            DerivedColumn::TimeUtc => "time_utc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "percentage" => Some(DerivedColumn::Percentage),
            "lower_wick_pct" => Some(DerivedColumn::LowerWickPct),
            "time_utc" => Some(DerivedColumn::TimeUtc),
            _ => None,
        }
    }
}

/// Derived values for one row, ready to be projected onto the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub percentage: String,
    pub lower_wick_pct: String,
    pub time_utc: String,
}

impl DerivedFields {
    pub fn get(&self, column: DerivedColumn) -> &str {
        match column {
            DerivedColumn::Percentage => &self.percentage,
            DerivedColumn::LowerWickPct => &self.lower_wick_pct,
            DerivedColumn::TimeUtc => &self.time_utc,
        }
    }
}
